pub mod error;
pub mod frame;
pub mod nbt;
pub mod primitive;
pub mod varint;

pub use error::{CodecError, Result};
pub use frame::{ByteSink, FrameBuffer};
