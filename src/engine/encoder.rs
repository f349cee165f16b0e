//! Streaming event encoder.

use crate::binary::{
    BOOL_SIZE, FLOAT_SIZE, LAST_CHUNK_FLAG_SIZE, MAX_NESTED_DEPTH, MAX_STRING_CHUNK_SIZE, MAX_VARINT_SIZE, SIGN_SIZE,
    TAG_SIZE,
};
use crate::data_type::WireTag;
use crate::engine::{EngineError, EngineResult};
use crate::vec::VecExt;

const DEFAULT_SIZE: usize = 128;

/// Appends events to a growable buffer. Containers are open-ended: a begin event is closed by
/// the next unmatched [`end_container`](RawEncoder::end_container), so no element count has to
/// be known up front.
pub struct RawEncoder {
    bytes: Vec<u8>,
    depth: usize,
    root_count: usize,
    event_count: usize,
}

impl RawEncoder {
    #[inline]
    pub fn try_new() -> EngineResult<Self> {
        let bytes = Vec::try_with_capacity(DEFAULT_SIZE)?;
        Ok(Self {
            bytes,
            depth: 0,
            root_count: 0,
            event_count: 0,
        })
    }

    /// Number of events written so far.
    #[inline]
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn begin_object(&mut self) -> EngineResult<()> {
        self.begin_container(WireTag::BeginObject)
    }

    #[inline]
    pub fn begin_array(&mut self) -> EngineResult<()> {
        self.begin_container(WireTag::BeginArray)
    }

    #[inline]
    pub fn end_container(&mut self) -> EngineResult<()> {
        if self.depth == 0 {
            return Err(EngineError::UnbalancedContainer);
        }
        self.bytes.try_reserve(TAG_SIZE)?;
        self.bytes.push_tag(WireTag::EndContainer);
        self.depth -= 1;
        self.finish_event();
        Ok(())
    }

    #[inline]
    pub fn add_null(&mut self) -> EngineResult<()> {
        self.write_scalar(TAG_SIZE, |bytes| bytes.push_tag(WireTag::Null))
    }

    #[inline]
    pub fn add_boolean(&mut self, value: bool) -> EngineResult<()> {
        let tag = if value { WireTag::True } else { WireTag::False };
        self.write_scalar(TAG_SIZE + BOOL_SIZE, |bytes| bytes.push_tag(tag))
    }

    #[inline]
    pub fn add_signed_integer(&mut self, value: i64) -> EngineResult<()> {
        self.write_scalar(TAG_SIZE + MAX_VARINT_SIZE, |bytes| {
            bytes.push_tag(WireTag::Signed);
            bytes.push_signed_varint(value);
        })
    }

    #[inline]
    pub fn add_unsigned_integer(&mut self, value: u64) -> EngineResult<()> {
        self.write_scalar(TAG_SIZE + MAX_VARINT_SIZE, |bytes| {
            bytes.push_tag(WireTag::Unsigned);
            bytes.push_varint(value);
        })
    }

    #[inline]
    pub fn add_float(&mut self, value: f64) -> EngineResult<()> {
        self.write_scalar(TAG_SIZE + FLOAT_SIZE, |bytes| {
            bytes.push_tag(WireTag::Float);
            bytes.push_f64(value);
        })
    }

    #[inline]
    pub fn add_big_number(&mut self, significand: u64, exponent: i32, negative: bool) -> EngineResult<()> {
        self.write_scalar(TAG_SIZE + SIGN_SIZE + 2 * MAX_VARINT_SIZE, |bytes| {
            bytes.push_tag(WireTag::BigNumber);
            bytes.push_big_number(significand, exponent, negative);
        })
    }

    /// Writes a string, splitting it into chunks when it exceeds the single event limit.
    #[inline]
    pub fn add_string(&mut self, value: &str) -> EngineResult<()> {
        let bytes = value.as_bytes();
        if bytes.len() <= MAX_STRING_CHUNK_SIZE {
            return self.write_scalar(TAG_SIZE + MAX_VARINT_SIZE + bytes.len(), |buf| {
                buf.push_tag(WireTag::String);
                buf.push_data(bytes);
            });
        }

        let chunk_count = (bytes.len() + MAX_STRING_CHUNK_SIZE - 1) / MAX_STRING_CHUNK_SIZE;
        let size = chunk_count * (TAG_SIZE + LAST_CHUNK_FLAG_SIZE + MAX_VARINT_SIZE) + bytes.len();
        self.write_scalar(size, |buf| {
            let mut chunks = bytes.chunks(MAX_STRING_CHUNK_SIZE).peekable();
            while let Some(chunk) = chunks.next() {
                buf.push_tag(WireTag::StringChunk);
                buf.push_chunk(chunk, chunks.peek().is_none());
            }
        })
    }

    #[inline]
    pub fn add_binary(&mut self, value: &[u8]) -> EngineResult<()> {
        self.write_scalar(TAG_SIZE + MAX_VARINT_SIZE + value.len(), |buf| {
            buf.push_tag(WireTag::Binary);
            buf.push_data(value);
        })
    }

    /// Closes the stream and yields the encoded bytes.
    #[inline]
    pub fn end_encode(mut self) -> EngineResult<Vec<u8>> {
        if self.depth != 0 {
            return Err(EngineError::UnclosedContainer(self.depth));
        }
        if self.root_count == 0 {
            return Err(EngineError::NoRootValue);
        }
        self.bytes.try_reserve(TAG_SIZE)?;
        self.bytes.push_tag(WireTag::EndOfData);
        Ok(self.bytes)
    }

    #[inline]
    fn begin_container(&mut self, tag: WireTag) -> EngineResult<()> {
        if self.depth >= MAX_NESTED_DEPTH {
            return Err(EngineError::NestedTooDeeply);
        }
        self.check_root()?;
        self.bytes.try_reserve(TAG_SIZE)?;
        self.bytes.push_tag(tag);
        self.depth += 1;
        self.event_count += 1;
        Ok(())
    }

    #[inline]
    fn write_scalar<F>(&mut self, size: usize, f: F) -> EngineResult<()>
    where
        F: FnOnce(&mut Vec<u8>),
    {
        self.check_root()?;
        self.bytes.try_reserve(size)?;
        f(&mut self.bytes);
        self.finish_event();
        Ok(())
    }

    #[inline]
    fn check_root(&self) -> EngineResult<()> {
        if self.depth == 0 && self.root_count > 0 {
            return Err(EngineError::MultipleRootValues);
        }
        Ok(())
    }

    #[inline]
    fn finish_event(&mut self) {
        self.event_count += 1;
        if self.depth == 0 {
            self.root_count += 1;
        }
    }
}
