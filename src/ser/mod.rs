//! Encoding of `Serialize` values.

mod scalar;
mod serializer;
mod tracking;

pub use serializer::{Compound, Serializer, StructCompound};

pub(crate) use serializer::SYSTEM_TIME_STRUCT;

use crate::error::Result;
use crate::policy::{DataEncodingStrategy, DateEncodingStrategy, NonConformingFloatStrategy, UserInfo};
use crate::Value;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Options consulted while encoding.
#[derive(Clone, Default)]
pub struct EncoderOptions {
    date_strategy: DateEncodingStrategy,
    data_strategy: DataEncodingStrategy,
    float_strategy: NonConformingFloatStrategy,
    user_info: UserInfo,
}

impl EncoderOptions {
    #[inline]
    pub fn date_strategy(&self) -> &DateEncodingStrategy {
        &self.date_strategy
    }

    #[inline]
    pub fn data_strategy(&self) -> &DataEncodingStrategy {
        &self.data_strategy
    }

    #[inline]
    pub fn float_strategy(&self) -> &NonConformingFloatStrategy {
        &self.float_strategy
    }

    #[inline]
    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }
}

impl fmt::Debug for EncoderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderOptions")
            .field("date_strategy", &self.date_strategy)
            .field("data_strategy", &self.data_strategy)
            .field("float_strategy", &self.float_strategy)
            .field("user_info", &self.user_info.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Reusable encoder configuration.
///
/// ```
/// use bjson::{DateEncodingStrategy, Encoder};
/// use std::time::UNIX_EPOCH;
///
/// let encoder = Encoder::new().with_date_strategy(DateEncodingStrategy::Iso8601);
/// let bytes = encoder.encode(&UNIX_EPOCH).unwrap();
/// assert_eq!(bjson::decode_value(&bytes).unwrap().as_str(), Some("1970-01-01T00:00:00Z"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    options: EncoderOptions,
}

impl Encoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_date_strategy(mut self, strategy: DateEncodingStrategy) -> Self {
        self.options.date_strategy = strategy;
        self
    }

    #[inline]
    pub fn with_data_strategy(mut self, strategy: DataEncodingStrategy) -> Self {
        self.options.data_strategy = strategy;
        self
    }

    #[inline]
    pub fn with_float_strategy(mut self, strategy: NonConformingFloatStrategy) -> Self {
        self.options.float_strategy = strategy;
        self
    }

    #[inline]
    pub fn with_user_info(mut self, user_info: UserInfo) -> Self {
        self.options.user_info = user_info;
        self
    }

    #[inline]
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes `value` into a new buffer.
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: ?Sized + Serialize,
    {
        let mut serializer = Serializer::new(&self.options)?;
        value.serialize(&mut serializer)?;
        let bytes = serializer.into_bytes()?;
        debug!("encoded value into {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Encodes `value` and decodes the result into a [`Value`].
    #[inline]
    pub fn to_value<T>(&self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let bytes = self.encode(value)?;
        crate::de::decode_value(&bytes)
    }
}

/// Encodes `value` with the default options.
#[inline]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    Encoder::new().encode(value)
}
