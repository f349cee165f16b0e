//! Vec extension.

use crate::binary::{LAST_CHUNK_FLAG_SIZE, MAX_VARINT_SIZE, SIGN_SIZE};
use crate::data_type::WireTag;
use crate::util::{encode_varint, zigzag_encode};
use std::collections::TryReserveError;
use std::mem::size_of;

pub trait VecExt: Sized {
    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError>;
    fn push_u8(&mut self, val: u8);
    fn push_f64(&mut self, val: f64);
    fn push_tag(&mut self, tag: WireTag);
    fn push_bytes(&mut self, bytes: &[u8]);
    fn push_varint(&mut self, val: u64);
    fn push_signed_varint(&mut self, val: i64);
    fn push_data(&mut self, bytes: &[u8]);
    fn push_chunk(&mut self, bytes: &[u8], is_last: bool);
    fn push_big_number(&mut self, significand: u64, exponent: i32, negative: bool);
}

impl VecExt for Vec<u8> {
    #[inline]
    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut vec = Vec::new();
        vec.try_reserve(capacity)?;
        Ok(vec)
    }

    #[inline]
    fn push_u8(&mut self, val: u8) {
        debug_assert!(size_of::<u8>() <= self.capacity() - self.len());
        self.push(val);
    }

    #[inline]
    fn push_f64(&mut self, val: f64) {
        debug_assert!(size_of::<f64>() <= self.capacity() - self.len());
        self.extend_from_slice(&val.to_le_bytes());
    }

    #[inline]
    fn push_tag(&mut self, tag: WireTag) {
        self.push_u8(tag as u8);
    }

    #[inline]
    fn push_bytes(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.capacity() - self.len());
        self.extend_from_slice(bytes)
    }

    #[inline]
    fn push_varint(&mut self, val: u64) {
        debug_assert!(MAX_VARINT_SIZE <= self.capacity() - self.len());
        encode_varint(val, self);
    }

    #[inline]
    fn push_signed_varint(&mut self, val: i64) {
        self.push_varint(zigzag_encode(val));
    }

    #[inline]
    fn push_data(&mut self, bytes: &[u8]) {
        self.push_varint(bytes.len() as u64);
        self.push_bytes(bytes);
    }

    #[inline]
    fn push_chunk(&mut self, bytes: &[u8], is_last: bool) {
        debug_assert!(LAST_CHUNK_FLAG_SIZE <= self.capacity() - self.len());
        self.push_u8(is_last as u8);
        self.push_data(bytes);
    }

    #[inline]
    fn push_big_number(&mut self, significand: u64, exponent: i32, negative: bool) {
        debug_assert!(SIGN_SIZE <= self.capacity() - self.len());
        self.push_u8(negative as u8);
        self.push_varint(significand);
        self.push_signed_varint(exponent as i64);
    }
}
