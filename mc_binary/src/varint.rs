//! Little-endian group-varint encoding of 32-bit two's-complement integers, as used for
//! every length prefix and packet id on the wire.

use std::io::Read;

use crate::error::{CodecError, Result};

const CONTINUE_BIT: u8 = 0x80;
const SEGMENT_BITS: u32 = 0x7F;

/// Appends the VarInt encoding of `value` to `out`, returning the number of bytes written.
/// The loop always runs at least once, so `0` still produces one byte.
pub fn encode_i32(value: i32, out: &mut Vec<u8>) -> usize {
    let mut uval = value as u32;
    let start = out.len();
    loop {
        let mut byte = (uval & SEGMENT_BITS) as u8;
        uval >>= 7;
        if uval != 0 {
            byte |= CONTINUE_BIT;
        }
        out.push(byte);
        if uval == 0 {
            break;
        }
    }
    out.len() - start
}

/// Number of bytes `encode_i32` would produce for `value`, without allocating.
pub fn size_of_i32(value: i32) -> usize {
    let mut uval = value as u32;
    let mut size = 0;
    loop {
        uval >>= 7;
        size += 1;
        if uval == 0 {
            break;
        }
    }
    size
}

/// Decodes a VarInt from the start of `buf`, returning the value and the number of bytes
/// consumed. Fails if a fifth byte still carries the continuation bit.
pub fn decode_i32(buf: &[u8]) -> Result<(i32, usize)> {
    let mut value: i32 = 0;
    for (i, &byte) in buf.iter().take(5).enumerate() {
        value |= ((byte & SEGMENT_BITS as u8) as i32) << (7 * i);
        if byte & CONTINUE_BIT == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(CodecError::MalformedVarInt)
}

/// Peels a VarInt one byte at a time directly off a socket, the way the frame-length prefix
/// must be read before the rest of the frame is known to be available.
pub fn read_from_stream(stream: &mut impl Read) -> Result<i32> {
    let mut value: i32 = 0;
    let mut shift = 0;
    for _ in 0..5 {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte).map_err(|_| CodecError::UnexpectedEof)?;
        value |= ((byte[0] & SEGMENT_BITS as u8) as i32) << shift;
        if byte[0] & CONTINUE_BIT == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(CodecError::MalformedVarInt)
}

/// Like [`read_from_stream`], but distinguishes "nothing arrived before the read timeout" from
/// an actual failure. Only the first byte is allowed to time out — once a frame has started
/// arriving the play loop blocks until the rest of it lands, matching a `select()`-then-`recv`
/// poll rather than a fully non-blocking read.
pub fn try_read_from_stream(stream: &mut impl Read) -> Result<Option<i32>> {
    let mut value: i32 = 0;
    let mut shift = 0;
    for i in 0..5 {
        let mut byte = [0u8; 1];
        match stream.read_exact(&mut byte) {
            Ok(()) => {}
            Err(e) if i == 0 && matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {
                return Ok(None);
            }
            Err(_) => return Err(CodecError::UnexpectedEof),
        }
        value |= ((byte[0] & SEGMENT_BITS as u8) as i32) << shift;
        if byte[0] & CONTINUE_BIT == 0 {
            return Ok(Some(value));
        }
        shift += 7;
    }
    Err(CodecError::MalformedVarInt)
}
