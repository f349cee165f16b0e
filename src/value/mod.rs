//! Generic value model.

mod big_number;
mod de;
mod ser;

pub use big_number::{BigNumber, NumberError};
pub use de::from_value;
pub use ser::to_value;

use crate::DataType;

/// Newtype name under which a [`BigNumber`] travels through serde as its decimal text.
pub(crate) const BIG_NUMBER_TOKEN: &str = "$bjson::private::BigNumber";
/// Newtype name marking bytes that bypass the blob policy.
pub(crate) const RAW_BINARY_TOKEN: &str = "$bjson::private::Binary";
/// Newtype name under which a whole [`Value`] asks to be deserialized.
pub(crate) const VALUE_TOKEN: &str = "$bjson::private::Value";

/// Every unit a binary document can hold.
///
/// `Object` is an ordered list of pairs, not a map: duplicate keys are kept in the order
/// they were decoded, and [`Value::get`] returns the first match.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    BigNumber(BigNumber),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    #[inline]
    pub const fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::Signed(_) => DataType::Signed,
            Value::Unsigned(_) => DataType::Unsigned,
            Value::Float(_) => DataType::Float,
            Value::BigNumber(_) => DataType::BigNumber,
            Value::String(_) => DataType::String,
            Value::Binary(_) => DataType::Binary,
            Value::Array(_) => DataType::Array,
            Value::Object(_) => DataType::Object,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Signed(v) => Some(*v),
            Value::Unsigned(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is an integer that fits.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Signed(v) => u64::try_from(*v).ok(),
            Value::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any numeric value as `f64`.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Signed(v) => Some(*v as f64),
            Value::Unsigned(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::BigNumber(v) => Some(v.to_f64()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the first value associated with `key` if this is an object.
    #[inline]
    pub fn get<T: AsRef<str>>(&self, key: T) -> Option<&Value> {
        let key = key.as_ref();
        self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the element at `index` if this is an array.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array()?.get(index)
    }
}

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Value::Null
    }
}

macro_rules! impl_from {
    ($($ty: ty => $variant: ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Signed,
    i16 => Signed,
    i32 => Signed,
    i64 => Signed,
    u8 => Unsigned,
    u16 => Unsigned,
    u32 => Unsigned,
    u64 => Unsigned,
    f32 => Float,
    f64 => Float,
    BigNumber => BigNumber,
    String => String,
    &str => String,
    Vec<Value> => Array,
    Vec<(String, Value)> => Object,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_lookup() {
        let value = Value::Object(vec![
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::Null),
            ("a".to_string(), Value::from(2)),
        ]);
        assert_eq!(value.get("a"), Some(&Value::Signed(1)));
        assert_eq!(value.get("b"), Some(&Value::Null));
        assert_eq!(value.get("c"), None);
        assert_eq!(Value::Null.get("a"), None);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Unsigned(u64::MAX).as_i64(), None);
        assert_eq!(Value::Signed(-1).as_u64(), None);
        assert_eq!(Value::Signed(7).as_u64(), Some(7));
        assert_eq!(Value::BigNumber(BigNumber::new(5, -1, false)).as_f64(), Some(0.5));
        assert_eq!(Value::from(vec![Value::Null]).get_index(0), Some(&Value::Null));
        assert_eq!(Value::from("s").data_type(), DataType::String);
    }
}
