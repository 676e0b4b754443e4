use mc_binary::{FrameBuffer, Result};
use num_enum::TryFromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum PacketId {
    Intention = 0x00,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Status,
    Login,
}

#[derive(Debug)]
pub struct Intention {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: Option<NextState>,
}

impl Intention {
    pub fn read(buf: &mut FrameBuffer) -> Result<Self> {
        let protocol_version = buf.read_varint()?;
        let server_address = buf.read_string(255)?;
        let server_port = buf.read_u16()?;
        let next_state = match buf.read_varint()? {
            1 => Some(NextState::Status),
            2 => Some(NextState::Login),
            _ => None,
        };
        Ok(Self { protocol_version, server_address, server_port, next_state })
    }
}
