use mc_binary::FrameBuffer;
use num_enum::TryFromPrimitive;

use crate::ClientboundPacket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ServerboundId {
    FinishConfiguration = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ClientboundId {
    FinishConfiguration = 0x03,
    RegistryData = 0x07,
    FeatureFlags = 0x0C,
    KnownPacks = 0x0E,
}

pub struct KnownPacks;

impl ClientboundPacket for KnownPacks {
    const ID: u8 = ClientboundId::KnownPacks as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut body = Vec::new();
        mc_binary::varint::encode_i32(0, &mut body); // server shares no data packs
        out.push(&body);
    }
}

/// A single Registry Data packet. `entries` is the already-assembled sequence of
/// `<string id><bool true><nbt compound>` entries — registry content is a domain concern of
/// the server, framing is a protocol concern of this crate.
pub struct RegistryData<'a> {
    pub registry_id: &'a str,
    pub entry_count: i32,
    pub entries: &'a [u8],
}

impl ClientboundPacket for RegistryData<'_> {
    const ID: u8 = ClientboundId::RegistryData as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut body = Vec::new();
        mc_binary::primitive::write_string(&mut body, self.registry_id, 256);
        mc_binary::varint::encode_i32(self.entry_count, &mut body);
        body.extend_from_slice(self.entries);
        out.push(&body);
    }
}

pub struct FeatureFlags<'a> {
    pub flags: &'a [&'a str],
}

impl ClientboundPacket for FeatureFlags<'_> {
    const ID: u8 = ClientboundId::FeatureFlags as u8;

    fn write_payload(&self, out: &mut FrameBuffer) {
        let mut body = Vec::new();
        mc_binary::varint::encode_i32(self.flags.len() as i32, &mut body);
        for flag in self.flags {
            mc_binary::primitive::write_string(&mut body, flag, 256);
        }
        out.push(&body);
    }
}

pub struct FinishConfiguration;

impl ClientboundPacket for FinishConfiguration {
    const ID: u8 = ClientboundId::FinishConfiguration as u8;

    fn write_payload(&self, _out: &mut FrameBuffer) {}
}
