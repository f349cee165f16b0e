//! Low-level codec engine.
//!
//! The engine knows nothing about Rust types: [`RawEncoder`] appends primitive and container
//! events to a byte buffer, and [`decode`] replays a buffer as callbacks on an
//! [`EventVisitor`]. Every operation reports a status; failures carry a human-readable
//! description through [`EngineError`].

mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::RawEncoder;

use crate::data_type::InvalidDataType;
use std::collections::TryReserveError;
use std::error::Error;
use std::fmt;
use std::str::Utf8Error;

/// Possible errors that can arise inside the engine.
#[derive(Debug)]
pub enum EngineError {
    TryReserveError(TryReserveError),
    IndexOutOfBounds { len: usize, index: usize },
    InvalidDataType(u8),
    InvalidUtf8(Utf8Error),
    VarintOverflow,
    ExponentOverflow(i64),
    LengthOverflow(u64),
    NestedTooDeeply,
    UnbalancedContainer,
    UnclosedContainer(usize),
    MultipleRootValues,
    NoRootValue,
}

impl fmt::Display for EngineError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::TryReserveError(e) => write!(f, "{}", e),
            EngineError::IndexOutOfBounds { len, index } => {
                write!(f, "index out of bounds: the len is {} but the index is {}", len, index)
            }
            EngineError::InvalidDataType(v) => write!(f, "invalid data type value '{}'", v),
            EngineError::InvalidUtf8(e) => write!(f, "invalid utf-8 string: {}", e),
            EngineError::VarintOverflow => write!(f, "varint does not fit in 64 bits"),
            EngineError::ExponentOverflow(e) => write!(f, "big number exponent {} does not fit in 32 bits", e),
            EngineError::LengthOverflow(len) => write!(f, "data length {} exceeds addressable memory", len),
            EngineError::NestedTooDeeply => write!(f, "containers nested too deeply"),
            EngineError::UnbalancedContainer => write!(f, "end of container without matching begin"),
            EngineError::UnclosedContainer(depth) => write!(f, "{} container(s) left open at end of encoding", depth),
            EngineError::MultipleRootValues => write!(f, "multiple values cannot be encoded without a container"),
            EngineError::NoRootValue => write!(f, "no value was encoded"),
        }
    }
}

impl Error for EngineError {}

impl From<TryReserveError> for EngineError {
    #[inline]
    fn from(e: TryReserveError) -> Self {
        EngineError::TryReserveError(e)
    }
}

impl From<InvalidDataType> for EngineError {
    #[inline]
    fn from(e: InvalidDataType) -> Self {
        EngineError::InvalidDataType(e.0)
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Push-style callbacks invoked by [`decode`], one per event in stream order.
///
/// Returning an error from any callback stops decoding immediately and the error is returned
/// from [`decode`] unchanged.
pub trait EventVisitor {
    type Error: From<EngineError>;

    fn on_begin_array(&mut self) -> Result<(), Self::Error>;

    fn on_begin_object(&mut self) -> Result<(), Self::Error>;

    fn on_end_container(&mut self) -> Result<(), Self::Error>;

    fn on_null(&mut self) -> Result<(), Self::Error>;

    fn on_boolean(&mut self, value: bool) -> Result<(), Self::Error>;

    fn on_signed_integer(&mut self, value: i64) -> Result<(), Self::Error>;

    fn on_unsigned_integer(&mut self, value: u64) -> Result<(), Self::Error>;

    fn on_float(&mut self, value: f64) -> Result<(), Self::Error>;

    fn on_big_number(&mut self, significand: u64, exponent: i32, negative: bool) -> Result<(), Self::Error>;

    fn on_string(&mut self, value: &str) -> Result<(), Self::Error>;

    /// A piece of a string too long for a single event. Chunks are not guaranteed to end on a
    /// character boundary; only their concatenation is valid UTF-8.
    fn on_string_chunk(&mut self, part: &[u8], is_last: bool) -> Result<(), Self::Error>;

    fn on_binary(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    fn on_end_data(&mut self) -> Result<(), Self::Error>;
}
