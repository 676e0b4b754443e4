use mc_binary::{FrameBuffer, Result};
use num_enum::TryFromPrimitive;

use crate::ClientboundPacket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ServerboundId {
    SetPlayerPosition = 0x1C,
    SetPlayerPositionAndRotation = 0x1D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ClientboundId {
    KeepAlive = 0x27,
    ChunkDataAndUpdateLight = 0x28,
    LoginPlay = 0x2C,
    GameEvent = 0x23,
    SynchronizePlayerPosition = 0x42,
    SetDefaultSpawnPosition = 0x5B,
    SetCenterChunk = 0x58,
}

/// Both 0x1C and 0x1D carry x/y/z first; the play loop only needs the column the player is
/// standing in, so rotation fields (present in 0x1D) are never read.
#[derive(Debug)]
pub struct PlayerPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlayerPosition {
    pub fn read(buf: &mut FrameBuffer) -> Result<Self> {
        let x = buf.read_f64()?;
        let y = buf.read_f64()?;
        let z = buf.read_f64()?;
        Ok(Self { x, y, z })
    }
}

pub struct LoginPlay<'a> {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub dimension_name: &'a str,
    pub max_players: i32,
    pub view_distance: i32,
    pub sim_distance: i32,
    pub dimension_type_id: i32,
    pub hashed_seed: i64,
    pub gamemode: u8,
    pub previous_gamemode: u8,
    pub is_flat: bool,
    pub sea_level: i32,
}

impl ClientboundPacket for LoginPlay<'_> {
    const ID: u8 = ClientboundId::LoginPlay as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut b = Vec::new();
        b.extend_from_slice(&self.entity_id.to_be_bytes());
        b.push(self.is_hardcore as u8);
        mc_binary::varint::encode_i32(1, &mut b); // dimension count
        mc_binary::primitive::write_string(&mut b, self.dimension_name, 256);
        mc_binary::varint::encode_i32(self.max_players, &mut b);
        mc_binary::varint::encode_i32(self.view_distance, &mut b);
        mc_binary::varint::encode_i32(self.sim_distance, &mut b);
        b.push(0); // reduced debug info = false
        b.push(1); // enable respawn screen = true
        b.push(0); // limited crafting = false
        mc_binary::varint::encode_i32(self.dimension_type_id, &mut b);
        mc_binary::primitive::write_string(&mut b, self.dimension_name, 256);
        b.extend_from_slice(&self.hashed_seed.to_be_bytes());
        b.push(self.gamemode);
        b.push(self.previous_gamemode);
        b.push(0); // is debug = false
        b.push(self.is_flat as u8);
        b.push(0); // death location present = false
        mc_binary::varint::encode_i32(0, &mut b); // portal cooldown
        mc_binary::varint::encode_i32(self.sea_level, &mut b);
        b.push(0); // enforce secure chat = false
        out.push(&b);
    }
}

pub struct GameEvent {
    pub event: u8,
    pub value: f32,
}

impl ClientboundPacket for GameEvent {
    const ID: u8 = ClientboundId::GameEvent as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut b = Vec::new();
        b.push(self.event);
        b.extend_from_slice(&self.value.to_be_bytes());
        out.push(&b);
    }
}

pub struct SetCenterChunk {
    pub chunk_x: i32,
    pub chunk_z: i32,
}

impl ClientboundPacket for SetCenterChunk {
    const ID: u8 = ClientboundId::SetCenterChunk as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut b = Vec::new();
        mc_binary::varint::encode_i32(self.chunk_x, &mut b);
        mc_binary::varint::encode_i32(self.chunk_z, &mut b);
        out.push(&b);
    }
}

pub struct SetDefaultSpawnPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub angle: f32,
}

impl ClientboundPacket for SetDefaultSpawnPosition {
    const ID: u8 = ClientboundId::SetDefaultSpawnPosition as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut b = Vec::new();
        let packed = mc_binary::primitive::encode_position(self.x, self.y, self.z);
        b.extend_from_slice(&packed.to_be_bytes());
        b.extend_from_slice(&self.angle.to_be_bytes());
        out.push(&b);
    }
}

pub struct SynchronizePlayerPosition {
    pub teleport_id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ClientboundPacket for SynchronizePlayerPosition {
    const ID: u8 = ClientboundId::SynchronizePlayerPosition as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut b = Vec::new();
        mc_binary::varint::encode_i32(self.teleport_id, &mut b);
        b.extend_from_slice(&self.x.to_be_bytes());
        b.extend_from_slice(&self.y.to_be_bytes());
        b.extend_from_slice(&self.z.to_be_bytes());
        b.extend_from_slice(&0f64.to_be_bytes()); // dx
        b.extend_from_slice(&0f64.to_be_bytes()); // dy
        b.extend_from_slice(&0f64.to_be_bytes()); // dz
        b.extend_from_slice(&0f32.to_be_bytes()); // yaw
        b.extend_from_slice(&0f32.to_be_bytes()); // pitch
        b.extend_from_slice(&0i32.to_be_bytes()); // flags
        out.push(&b);
    }
}

pub struct KeepAlive {
    pub id: i64,
}

impl ClientboundPacket for KeepAlive {
    const ID: u8 = ClientboundId::KeepAlive as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        out.push(&self.id.to_be_bytes());
    }
}

/// Chunk payload assembly (heightmap NBT, paletted sections, light arrays) is a world-data
/// concern owned by `mc_server`; this type only carries the already-assembled bytes onto the
/// wire under the right packet id.
pub struct ChunkDataAndUpdateLight<'a> {
    pub payload: &'a [u8],
}

impl ClientboundPacket for ChunkDataAndUpdateLight<'_> {
    const ID: u8 = ClientboundId::ChunkDataAndUpdateLight as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        out.push(self.payload);
    }
}
