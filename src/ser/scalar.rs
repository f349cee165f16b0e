//! Captures a single scalar as a [`Value`] without touching the output stream.

use crate::error::{Error, Result};
use crate::Value;
use serde::ser::{Impossible, Serialize};

/// Serializer for the places where a scalar must be inspected before anything is written:
/// object keys, the payload of internal newtype tokens and the fields of `SystemTime`.
pub(crate) struct ScalarSerializer;

#[inline]
fn not_scalar() -> Error {
    Error::data_corrupted("expected a scalar value")
}

impl serde::Serializer for ScalarSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = Impossible<Value, Error>;
    type SerializeStruct = Impossible<Value, Error>;
    type SerializeStructVariant = Impossible<Value, Error>;

    #[inline]
    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Signed(v.into()))
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Signed(v.into()))
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Signed(v.into()))
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Signed(v))
    }

    #[inline]
    fn serialize_i128(self, v: i128) -> Result<Value> {
        if let Ok(v) = i64::try_from(v) {
            Ok(Value::Signed(v))
        } else if let Ok(v) = u64::try_from(v) {
            Ok(Value::Unsigned(v))
        } else {
            Err(Error::data_corrupted(format_args!("integer {} does not fit in 64 bits", v)))
        }
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Unsigned(v.into()))
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Unsigned(v.into()))
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Unsigned(v.into()))
    }

    #[inline]
    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Unsigned(v))
    }

    #[inline]
    fn serialize_u128(self, v: u128) -> Result<Value> {
        u64::try_from(v)
            .map(Value::Unsigned)
            .map_err(|_| Error::data_corrupted(format_args!("integer {} does not fit in 64 bits", v)))
    }

    #[inline]
    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v.into()))
    }

    #[inline]
    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    #[inline]
    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Binary(v.to_vec()))
    }

    #[inline]
    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    #[inline]
    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value> {
        Err(not_scalar())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_scalar())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_scalar())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
        Err(not_scalar())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(not_scalar())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(not_scalar())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(not_scalar())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(not_scalar())
    }
}

/// Object keys are strings on the wire; integers, booleans and characters are written as
/// their text.
pub(crate) fn key_to_string(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Signed(v) => Ok(v.to_string()),
        Value::Unsigned(v) => Ok(v.to_string()),
        Value::Bool(v) => Ok(v.to_string()),
        other => Err(Error::data_corrupted(format_args!(
            "object key must be a string, but found {}",
            other.data_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture() {
        assert_eq!(1u8.serialize(ScalarSerializer).unwrap(), Value::Unsigned(1));
        assert_eq!((-1i128).serialize(ScalarSerializer).unwrap(), Value::Signed(-1));
        assert_eq!(u128::from(u64::MAX).serialize(ScalarSerializer).unwrap(), Value::Unsigned(u64::MAX));
        assert!(u128::MAX.serialize(ScalarSerializer).is_err());
        assert_eq!(Some('x').serialize(ScalarSerializer).unwrap(), Value::String("x".to_string()));
        assert!(vec![1, 2].serialize(ScalarSerializer).is_err());
    }

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(Value::Signed(-3)).unwrap(), "-3");
        assert_eq!(key_to_string(Value::Bool(true)).unwrap(), "true");
        assert!(key_to_string(Value::Float(1.5)).is_err());
        assert!(key_to_string(Value::Null).is_err());
    }
}
