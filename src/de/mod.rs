//! Decoding into `Deserialize` values.

mod deserializer;
mod parser;
mod unbox;
mod view;

pub use deserializer::ValueDeserializer;
pub use view::{CodingKey, IndexedView, KeyedView, SingleValueView};

use crate::engine;
use crate::error::{Error, Result};
use crate::policy::{DateDecodingStrategy, NonConformingFloatStrategy, UserInfo};
use crate::Value;
use log::debug;
use parser::EventParser;
use serde::de::DeserializeOwned;
use std::fmt;

/// Options consulted while decoding.
#[derive(Clone, Default)]
pub struct DecoderOptions {
    date_strategy: DateDecodingStrategy,
    float_strategy: NonConformingFloatStrategy,
    user_info: UserInfo,
}

impl DecoderOptions {
    #[inline]
    pub fn date_strategy(&self) -> &DateDecodingStrategy {
        &self.date_strategy
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

impl fmt::Debug for DecoderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderOptions")
            .field("date_strategy", &self.date_strategy)
            .field("float_strategy", &self.float_strategy)
            .field("user_info", &self.user_info.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Reusable decoder configuration.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    options: DecoderOptions,
}

impl Decoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_date_strategy(mut self, strategy: DateDecodingStrategy) -> Self {
        self.options.date_strategy = strategy;
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
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes a `T` from `bytes`.
    #[inline]
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let value = decode_value(bytes)?;
        self.decode_from(&value)
    }

    /// Reconstructs a `T` from an already decoded value using these options.
    #[inline]
    pub fn decode_from<T: DeserializeOwned>(&self, value: &Value) -> Result<T> {
        T::deserialize(ValueDeserializer::new(value, &self.options))
    }
}

/// Decodes `bytes` into the generic value model. Every byte must belong to the value.
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    let mut parser = EventParser::new();
    let consumed = engine::decode(bytes, &mut parser)?;
    if consumed != bytes.len() {
        return Err(Error::data_corrupted(format_args!(
            "{} trailing byte(s) after the end of data",
            bytes.len() - consumed
        )));
    }
    let value = parser.finish()?;
    debug!("decoded {} bytes into {}", consumed, value.data_type());
    Ok(value)
}

/// Decodes a `T` from `bytes` with the default options.
#[inline]
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Decoder::new().decode(bytes)
}
