//! Push-style event decoder.

use crate::binary::{FLOAT_SIZE, MAX_NESTED_DEPTH};
use crate::data_type::WireTag;
use crate::engine::{EngineError, EngineResult, EventVisitor};
use crate::util::{decode_varint, zigzag_decode};

/// Replays `buf` as events on `visitor` until the end-of-data marker, returning the number of
/// bytes consumed.
pub fn decode<V: EventVisitor>(buf: &[u8], visitor: &mut V) -> Result<usize, V::Error> {
    let mut reader = Reader::new(buf);
    let mut depth = 0usize;

    loop {
        match reader.read_tag()? {
            WireTag::EndOfData => {
                visitor.on_end_data()?;
                return Ok(reader.pos);
            }
            WireTag::BeginObject | WireTag::BeginArray if depth >= MAX_NESTED_DEPTH => {
                return Err(EngineError::NestedTooDeeply.into());
            }
            WireTag::BeginObject => {
                depth += 1;
                visitor.on_begin_object()?;
            }
            WireTag::BeginArray => {
                depth += 1;
                visitor.on_begin_array()?;
            }
            WireTag::EndContainer => {
                depth = depth.saturating_sub(1);
                visitor.on_end_container()?;
            }
            WireTag::Null => visitor.on_null()?,
            WireTag::False => visitor.on_boolean(false)?,
            WireTag::True => visitor.on_boolean(true)?,
            WireTag::Signed => {
                let value = reader.read_varint()?;
                visitor.on_signed_integer(zigzag_decode(value))?;
            }
            WireTag::Unsigned => {
                let value = reader.read_varint()?;
                visitor.on_unsigned_integer(value)?;
            }
            WireTag::Float => {
                let value = reader.read_f64()?;
                visitor.on_float(value)?;
            }
            WireTag::BigNumber => {
                let negative = reader.read_u8()? != 0;
                let significand = reader.read_varint()?;
                let exponent = zigzag_decode(reader.read_varint()?);
                let exponent = i32::try_from(exponent).map_err(|_| EngineError::ExponentOverflow(exponent))?;
                visitor.on_big_number(significand, exponent, negative)?;
            }
            WireTag::String => {
                let bytes = reader.read_data()?;
                let value = std::str::from_utf8(bytes).map_err(EngineError::InvalidUtf8)?;
                visitor.on_string(value)?;
            }
            WireTag::StringChunk => {
                let is_last = reader.read_u8()? != 0;
                let part = reader.read_data()?;
                visitor.on_string_chunk(part, is_last)?;
            }
            WireTag::Binary => {
                let bytes = reader.read_data()?;
                visitor.on_binary(bytes)?;
            }
        }
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn read_u8(&mut self) -> EngineResult<u8> {
        let byte = self.buf.get(self.pos).copied().ok_or(EngineError::IndexOutOfBounds {
            len: self.buf.len(),
            index: self.pos,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    fn read_tag(&mut self) -> EngineResult<WireTag> {
        let tag = self.read_u8()?;
        Ok(WireTag::try_from(tag)?)
    }

    #[inline]
    fn read_varint(&mut self) -> EngineResult<u64> {
        let (value, len) = decode_varint(self.buf, self.pos)?;
        self.pos += len;
        Ok(value)
    }

    #[inline]
    fn read_slice(&mut self, len: usize) -> EngineResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(EngineError::LengthOverflow(len as u64))?;
        let bytes = self.buf.get(self.pos..end).ok_or(EngineError::IndexOutOfBounds {
            len: self.buf.len(),
            index: end,
        })?;
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    fn read_f64(&mut self) -> EngineResult<f64> {
        let bytes = self.read_slice(FLOAT_SIZE)?;
        let mut raw = [0u8; FLOAT_SIZE];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    #[inline]
    fn read_data(&mut self) -> EngineResult<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| EngineError::LengthOverflow(len))?;
        self.read_slice(len)
    }
}
