use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("varint is longer than 5 bytes")]
    MalformedVarInt,
    #[error("frame length {0} is out of bounds")]
    FrameTooLarge(i32),
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    #[error("string is not valid utf-8")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, CodecError>;
