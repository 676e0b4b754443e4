use mc_binary::{FrameBuffer, Result};
use num_enum::TryFromPrimitive;

use crate::ClientboundPacket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ServerboundId {
    LoginStart = 0x00,
    LoginAcknowledged = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ClientboundId {
    LoginSuccess = 0x02,
}

#[derive(Debug)]
pub struct LoginStart {
    pub username: String,
    pub uuid: u128,
}

impl LoginStart {
    pub fn read(buf: &mut FrameBuffer) -> Result<Self> {
        let username = buf.read_string(16)?;
        let uuid = buf.read_u128()?;
        Ok(Self { username, uuid })
    }
}

#[derive(Debug)]
pub struct LoginSuccess {
    pub uuid: u128,
    pub username: String,
}

impl ClientboundPacket for LoginSuccess {
    const ID: u8 = ClientboundId::LoginSuccess as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut body = Vec::new();
        mc_binary::primitive::write_u128(&mut body, self.uuid);
        mc_binary::primitive::write_string(&mut body, &self.username, 16);
        mc_binary::varint::encode_i32(0, &mut body); // property count
        out.push(&body);
    }
}
