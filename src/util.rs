//! Basic functions.

use crate::binary::MAX_VARINT_SIZE;
use crate::engine::{EngineError, EngineResult};
use crate::vec::VecExt;

#[inline]
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.push_u8(value as u8);
}

#[inline]
pub fn decode_varint(buf: &[u8], index: usize) -> EngineResult<(u64, usize)> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_SIZE {
        // Get the next 7 bits of the value.
        let byte = buf.get(index + i).map_or_else(
            || {
                Err(EngineError::IndexOutOfBounds {
                    len: buf.len(),
                    index: index + i,
                })
            },
            |v| Ok(*v),
        )?;
        let bits = (byte & 0x7f) as u64;
        if i == MAX_VARINT_SIZE - 1 && bits > 1 {
            return Err(EngineError::VarintOverflow);
        }
        value |= bits << (7 * i);
        if (byte & 0x80) == 0 {
            // This was the last byte. Return successfully.
            return Ok((value, i + 1));
        }
    }
    Err(EngineError::VarintOverflow)
}

#[inline]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
