//! Serialize a `Value`.

use crate::error::Result;
use crate::value::{BIG_NUMBER_TOKEN, RAW_BINARY_TOKEN};
use crate::{Encoder, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Signed(v) => serializer.serialize_i64(*v),
            Value::Unsigned(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::BigNumber(v) => serializer.serialize_newtype_struct(BIG_NUMBER_TOKEN, &v.to_string()),
            Value::String(v) => serializer.serialize_str(v),
            Value::Binary(v) => serializer.serialize_newtype_struct(RAW_BINARY_TOKEN, &RawBytes(v)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Bytes serialized with `serialize_bytes` instead of as a sequence.
struct RawBytes<'a>(&'a [u8]);

impl Serialize for RawBytes<'_> {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self.0)
    }
}

/// Converts any serializable value into a [`Value`] using the default encoder options.
///
/// The result is exactly what decoding the encoded bytes would produce: byte buffers become
/// Base64 text under the default blob policy, dates become seconds since the Unix epoch.
#[inline]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    Encoder::new().to_value(value)
}

#[cfg(test)]
mod tests {
    use crate::value::{to_value, BigNumber, Value};

    #[test]
    fn test_value_to_value() {
        let value = Value::Object(vec![
            ("n".to_string(), Value::BigNumber(BigNumber::new(31415, -4, false))),
            ("b".to_string(), Value::Binary(vec![0, 1, 2])),
            ("dup".to_string(), Value::Signed(1)),
            ("dup".to_string(), Value::Signed(2)),
            ("a".to_string(), Value::Array(vec![])),
        ]);
        assert_eq!(to_value(&value).unwrap(), value);
    }
}
