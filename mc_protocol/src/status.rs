use mc_binary::{FrameBuffer, Result};
use num_enum::TryFromPrimitive;

use crate::ClientboundPacket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ServerboundId {
    StatusRequest = 0x00,
    PingRequest = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ClientboundId {
    StatusResponse = 0x00,
    PongResponse = 0x01,
}

#[derive(Debug)]
pub struct PingRequest {
    pub payload: i64,
}

impl PingRequest {
    pub fn read(buf: &mut FrameBuffer) -> Result<Self> {
        Ok(Self { payload: buf.read_i64()? })
    }
}

#[derive(Debug)]
pub struct StatusResponse {
    pub json: String,
}

impl ClientboundPacket for StatusResponse {
    const ID: u8 = ClientboundId::StatusResponse as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut body = Vec::new();
        mc_binary::primitive::write_string(&mut body, &self.json, usize::MAX);
        out.push(&body);
    }
}

#[derive(Debug)]
pub struct PongResponse {
    pub payload: i64,
}

impl ClientboundPacket for PongResponse {
    const ID: u8 = ClientboundId::PongResponse as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        out.push(&self.payload.to_be_bytes());
    }
}
