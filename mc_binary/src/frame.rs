//! A growable byte buffer with an independent write length and read cursor, and the
//! length-prefixed framing that rides on top of it.

use std::io::{Read, Write};

use crate::error::{CodecError, Result};
use crate::varint;

const MAX_FRAME_LEN: i32 = 65536;

/// Owned, resizable byte region: `capacity` (bytes allocated), `length` (bytes valid, the
/// write position) and `position` (read position, always `<= length`). `reset` drops length
/// and position to zero while keeping capacity, so steady-state reuse across frames never
/// reallocates.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    length: usize,
    position: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: vec![0u8; capacity], length: 0, position: 0 }
    }

    pub fn reset(&mut self) {
        self.length = 0;
        self.position = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn written(&self) -> &[u8] {
        &self.buf[..self.length]
    }

    pub fn remaining_to_read(&self) -> &[u8] {
        &self.buf[self.position..self.length]
    }

    fn ensure_capacity(&mut self, additional: usize) {
        let needed = self.length + additional;
        if needed > self.buf.len() {
            let mut new_cap = self.buf.len().max(1);
            while new_cap < needed {
                new_cap *= 2;
            }
            self.buf.resize(new_cap, 0);
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        self.buf[self.length..self.length + bytes.len()].copy_from_slice(bytes);
        self.length += bytes.len();
    }

    /// Grows to fit `len` more bytes and returns a mutable slice to write directly into,
    /// without advancing `length` — callers must follow up with `advance`.
    pub fn reserve_mut(&mut self, len: usize) -> &mut [u8] {
        self.ensure_capacity(len);
        &mut self.buf[self.length..self.length + len]
    }

    pub fn advance(&mut self, len: usize) {
        self.length += len;
    }

    pub fn read_exact_bytes(&mut self, n: usize) -> Result<&[u8]> {
        if self.position + n > self.length {
            return Err(CodecError::UnexpectedEof);
        }
        let slice = &self.buf[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    pub fn read_varint(&mut self) -> Result<i32> {
        let (value, consumed) = varint::decode_i32(&self.buf[self.position..self.length])?;
        self.position += consumed;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes: [u8; 2] = self.read_exact_bytes(2)?.try_into().unwrap();
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes: [u8; 8] = self.read_exact_bytes(8)?.try_into().unwrap();
        Ok(i64::from_be_bytes(bytes))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    pub fn read_u128(&mut self) -> Result<u128> {
        let hi = self.read_i64()? as u64;
        let lo = self.read_i64()? as u64;
        Ok(((hi as u128) << 64) | lo as u128)
    }

    pub fn read_string(&mut self, max_len: usize) -> Result<String> {
        let len = self.read_varint()?;
        if len < 0 || len as usize > max_len {
            return Err(CodecError::UnexpectedEof);
        }
        let bytes = self.read_exact_bytes(len as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

/// Something bytes can be appended to — implemented for both the scratch `Vec<u8>`s used by
/// the NBT writer and `FrameBuffer` itself, so packet-assembly code does not care which one
/// it is writing into.
pub trait ByteSink {
    fn push_bytes(&mut self, bytes: &[u8]);
}

impl ByteSink for Vec<u8> {
    fn push_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl ByteSink for FrameBuffer {
    fn push_bytes(&mut self, bytes: &[u8]) {
        self.push(bytes);
    }
}

/// Reads one length-prefixed frame from `stream` into `buf`. Returns `Ok(false)` (not an
/// error) on EOF or a malformed/out-of-bounds length, since both are ordinary session-ending
/// conditions, not exceptional ones.
pub fn recv_frame(stream: &mut impl Read, buf: &mut FrameBuffer) -> Result<bool> {
    let len = match varint::read_from_stream(stream) {
        Ok(len) => len,
        Err(_) => return Ok(false),
    };
    if len <= 0 || len > MAX_FRAME_LEN {
        return Ok(false);
    }
    buf.reset();
    let slice = buf.reserve_mut(len as usize);
    if stream.read_exact(slice).is_err() {
        return Ok(false);
    }
    buf.advance(len as usize);
    Ok(true)
}

/// Like [`recv_frame`], but returns `Ok(None)` instead of blocking when no frame has started
/// arriving within the stream's read timeout — for a play loop polling a socket once a second
/// between keep-alive ticks instead of blocking on it indefinitely.
pub fn try_recv_frame(stream: &mut impl Read, buf: &mut FrameBuffer) -> Result<Option<bool>> {
    let len = match varint::try_read_from_stream(stream) {
        Ok(Some(len)) => len,
        Ok(None) => return Ok(None),
        Err(_) => return Ok(Some(false)),
    };
    if len <= 0 || len > MAX_FRAME_LEN {
        return Ok(Some(false));
    }
    buf.reset();
    let slice = buf.reserve_mut(len as usize);
    if stream.read_exact(slice).is_err() {
        return Ok(Some(false));
    }
    buf.advance(len as usize);
    Ok(Some(true))
}

/// Writes `buf`'s valid bytes to `stream` as one length-prefixed frame.
pub fn send_frame(stream: &mut impl Write, buf: &FrameBuffer) -> Result<bool> {
    let mut len_prefix = Vec::with_capacity(5);
    varint::encode_i32(buf.length() as i32, &mut len_prefix);
    if stream.write_all(&len_prefix).is_err() {
        return Ok(false);
    }
    Ok(stream.write_all(buf.written()).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_and_resets() {
        let mut buf = FrameBuffer::with_capacity(4);
        buf.push(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.length(), 6);
        assert!(buf.capacity() >= 6);
        assert_eq!(buf.position(), 0);

        buf.reset();
        assert_eq!(buf.length(), 0);
        assert_eq!(buf.position(), 0);
        assert!(buf.capacity() >= 6);
    }

    #[test]
    fn recv_frame_rejects_oversized_length() {
        let mut payload = Vec::new();
        varint::encode_i32(MAX_FRAME_LEN + 1, &mut payload);
        let mut cursor = std::io::Cursor::new(payload);
        let mut buf = FrameBuffer::new();
        assert!(!recv_frame(&mut cursor, &mut buf).unwrap());
    }

    #[test]
    fn recv_frame_rejects_zero_length() {
        let mut payload = Vec::new();
        varint::encode_i32(0, &mut payload);
        let mut cursor = std::io::Cursor::new(payload);
        let mut buf = FrameBuffer::new();
        assert!(!recv_frame(&mut cursor, &mut buf).unwrap());
    }

    #[test]
    fn round_trips_through_a_stream() {
        let mut wire = Vec::new();
        let mut out = FrameBuffer::new();
        out.push(b"hello");
        send_frame(&mut wire, &out).unwrap();

        let mut cursor = std::io::Cursor::new(wire);
        let mut inbound = FrameBuffer::new();
        assert!(recv_frame(&mut cursor, &mut inbound).unwrap());
        assert_eq!(inbound.written(), b"hello");
    }

    struct WouldBlockThenEmpty;

    impl Read for WouldBlockThenEmpty {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::WouldBlock, "no data"))
        }
    }

    #[test]
    fn try_recv_frame_reports_timeout_as_none() {
        let mut stream = WouldBlockThenEmpty;
        let mut buf = FrameBuffer::new();
        assert!(try_recv_frame(&mut stream, &mut buf).unwrap().is_none());
    }

    #[test]
    fn try_recv_frame_reads_a_frame_once_it_starts() {
        let mut wire = Vec::new();
        let mut out = FrameBuffer::new();
        out.push(b"hi");
        send_frame(&mut wire, &out).unwrap();

        let mut cursor = std::io::Cursor::new(wire);
        let mut inbound = FrameBuffer::new();
        assert_eq!(try_recv_frame(&mut cursor, &mut inbound).unwrap(), Some(true));
        assert_eq!(inbound.written(), b"hi");
    }
}
