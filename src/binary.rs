//! Binary stream layout.

use crate::data_type::WireTag;
use std::mem::size_of;

pub const TAG_SIZE: usize = size_of::<WireTag>();
pub const BOOL_SIZE: usize = size_of::<u8>();
pub const FLOAT_SIZE: usize = size_of::<f64>();
pub const SIGN_SIZE: usize = size_of::<u8>();
pub const LAST_CHUNK_FLAG_SIZE: usize = size_of::<u8>();
pub const MAX_VARINT_SIZE: usize = 10; // ceil(64 / 7)
pub const MAX_STRING_CHUNK_SIZE: usize = 4096;
pub const MAX_NESTED_DEPTH: usize = 128;
