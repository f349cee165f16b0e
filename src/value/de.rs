//! Deserialize a `Value`.

use crate::de::{DecoderOptions, ValueDeserializer};
use crate::error::Result;
use crate::value::{BigNumber, BIG_NUMBER_TOKEN, VALUE_TOKEN};
use crate::Value;
use serde::de::{Error, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

impl<'de> Deserialize<'de> for Value {
    #[inline]
    fn deserialize<D>(deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(VALUE_TOKEN, ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    #[inline]
    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid value")
    }

    #[inline]
    fn visit_bool<E: Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn visit_i64<E: Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Signed(v))
    }

    #[inline]
    fn visit_u64<E: Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::Unsigned(v))
    }

    #[inline]
    fn visit_f64<E: Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    #[inline]
    fn visit_str<E: Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    #[inline]
    fn visit_string<E: Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    #[inline]
    fn visit_bytes<E: Error>(self, v: &[u8]) -> std::result::Result<Value, E> {
        Ok(Value::Binary(v.to_vec()))
    }

    #[inline]
    fn visit_byte_buf<E: Error>(self, v: Vec<u8>) -> std::result::Result<Value, E> {
        Ok(Value::Binary(v))
    }

    #[inline]
    fn visit_unit<E: Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_none<E: Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    /// Reached when the deserializer does not know the value token and forwards the newtype.
    #[inline]
    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        match map.next_key::<String>()? {
            Some(key) if key == BIG_NUMBER_TOKEN => {
                let text: String = map.next_value()?;
                let number = text.parse::<BigNumber>().map_err(A::Error::custom)?;
                return Ok(Value::BigNumber(number));
            }
            Some(key) => {
                let value = map.next_value()?;
                pairs.push((key, value));
            }
            None => return Ok(Value::Object(pairs)),
        }
        while let Some((key, value)) = map.next_entry()? {
            pairs.push((key, value));
        }
        Ok(Value::Object(pairs))
    }
}

/// Reconstructs a typed value from a [`Value`] using the default decoder options.
#[inline]
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    let options = DecoderOptions::default();
    T::deserialize(ValueDeserializer::new(value, &options))
}
