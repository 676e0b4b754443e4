pub mod configuration;
pub mod handshake;
pub mod login;
pub mod play;
pub mod status;

/// A packet that can be written into an outbound [`mc_binary::FrameBuffer`]. `ID` is the
/// packet's VarInt id within whichever connection phase the implementing type belongs to —
/// ids are positional per phase, not globally unique.
pub trait ClientboundPacket {
    const ID: u8;

    fn write_payload(&self, out: &mut mc_binary::FrameBuffer);

    fn write_framed(&self, out: &mut mc_binary::FrameBuffer) {
        out.reset();
        let mut id_buf = Vec::with_capacity(1);
        mc_binary::varint::encode_i32(Self::ID as i32, &mut id_buf);
        out.push(&id_buf);
        self.write_payload(out);
    }
}
