//! Serde data format reading typed values out of a decoded [`Value`].

use crate::de::unbox::{
    mismatch, unbox_bool, unbox_bytes, unbox_date, unbox_f32, unbox_f64, unbox_integer, unbox_str,
};
use crate::de::{DecoderOptions, IndexedView, KeyedView};
use crate::error::{Error, Result};
use crate::ser::SYSTEM_TIME_STRUCT;
use crate::value::{BIG_NUMBER_TOKEN, VALUE_TOKEN};
use crate::{DataType, Value};
use serde::de::value::{BorrowedStrDeserializer, MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use std::borrow::Cow;
use std::collections::HashSet;
use std::time::UNIX_EPOCH;

/// Deserializer over one decoded value.
///
/// Structs and maps are read through a [`KeyedView`], sequences through an [`IndexedView`],
/// everything else directly. Errors carry the path below this value.
#[derive(Clone, Copy, Debug)]
pub struct ValueDeserializer<'de, 'o> {
    value: &'de Value,
    options: &'o DecoderOptions,
}

impl<'de, 'o> ValueDeserializer<'de, 'o> {
    #[inline]
    pub fn new(value: &'de Value, options: &'o DecoderOptions) -> Self {
        Self { value, options }
    }

    fn visit_array<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let view = IndexedView::new(self.value, self.options).map_err(|_| mismatch(DataType::Array, self.value))?;
        visitor.visit_seq(ArrayAccess { view })
    }

    fn visit_object<V: Visitor<'de>>(self, visitor: V, first_match: bool) -> Result<V::Value> {
        let view = KeyedView::new(self.value, self.options).map_err(|_| mismatch(DataType::Object, self.value))?;
        visitor.visit_map(ObjectAccess::new(view, first_match))
    }
}

macro_rules! deserialize_integer {
    ($($method: ident => $visit: ident : $ty: ty),* $(,)?) => {
        $(
            #[inline]
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(unbox_integer::<$ty>(self.value, stringify!($ty))?)
            }
        )*
    };
}

impl<'de, 'o> de::Deserializer<'de> for ValueDeserializer<'de, 'o> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(*v),
            Value::Signed(v) => visitor.visit_i64(*v),
            Value::Unsigned(v) => visitor.visit_u64(*v),
            Value::Float(v) => visitor.visit_f64(*v),
            Value::BigNumber(n) => match n.to_i128() {
                Some(v) if i64::try_from(v).is_ok() => visitor.visit_i64(v as i64),
                Some(v) if u64::try_from(v).is_ok() => visitor.visit_u64(v as u64),
                _ => visitor.visit_f64(n.to_f64()),
            },
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Binary(bytes) => visitor.visit_borrowed_bytes(bytes),
            Value::Array(_) => self.visit_array(visitor),
            Value::Object(_) => self.visit_object(visitor, false),
        }
    }

    #[inline]
    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(unbox_bool(self.value)?)
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    #[inline]
    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(unbox_f32(self.value, self.options.float_strategy())?)
    }

    #[inline]
    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(unbox_f64(self.value, self.options.float_strategy())?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let s = unbox_str(self.value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::data_corrupted(format_args!("{:?} is not a single character", s))),
        }
    }

    #[inline]
    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::String(s) => visitor.visit_borrowed_str(s),
            other => Err(mismatch(DataType::String, other)),
        }
    }

    #[inline]
    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    #[inline]
    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match unbox_bytes(self.value)? {
            Cow::Borrowed(bytes) => visitor.visit_borrowed_bytes(bytes),
            Cow::Owned(bytes) => visitor.visit_byte_buf(bytes),
        }
    }

    #[inline]
    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    #[inline]
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    #[inline]
    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            other => Err(Error::type_mismatch(DataType::Null, other.data_type())),
        }
    }

    #[inline]
    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, name: &'static str, visitor: V) -> Result<V::Value> {
        match (name, self.value) {
            (VALUE_TOKEN, Value::BigNumber(n)) => {
                let entry = std::iter::once((BIG_NUMBER_TOKEN, n.to_string()));
                visitor.visit_map(MapDeserializer::<_, Error>::new(entry))
            }
            (BIG_NUMBER_TOKEN, Value::BigNumber(n)) => visitor.visit_string(n.to_string()),
            (VALUE_TOKEN | BIG_NUMBER_TOKEN, _) => self.deserialize_any(visitor),
            _ => visitor.visit_newtype_struct(self),
        }
    }

    #[inline]
    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_array(visitor)
    }

    #[inline]
    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.visit_array(visitor)
    }

    #[inline]
    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.visit_array(visitor)
    }

    #[inline]
    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_object(visitor, true)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        if name == SYSTEM_TIME_STRUCT && fields.len() == 2 {
            let date = unbox_date(self.value, self.options)?;
            let since = date
                .duration_since(UNIX_EPOCH)
                .map_err(|_| Error::data_corrupted("dates before 1970 cannot be represented"))?;
            let parts = [since.as_secs(), u64::from(since.subsec_nanos())];
            return visitor.visit_seq(SeqDeserializer::<_, Error>::new(parts.into_iter()));
        }
        self.visit_object(visitor, true)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumAccess {
                variant,
                value: None,
                options: self.options,
            }),
            Value::Object(pairs) if pairs.len() == 1 => {
                let (variant, value) = &pairs[0];
                visitor.visit_enum(EnumAccess {
                    variant,
                    value: Some(value),
                    options: self.options,
                })
            }
            other => Err(Error::type_mismatch(
                "string or single-entry object",
                other.data_type(),
            )),
        }
    }

    #[inline]
    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    #[inline]
    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

struct ArrayAccess<'de, 'o> {
    view: IndexedView<'de, 'o>,
}

impl<'de, 'o> de::SeqAccess<'de> for ArrayAccess<'de, 'o> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.view.next_value() {
            Some((index, value)) => seed
                .deserialize(ValueDeserializer::new(value, self.view.options()))
                .map(Some)
                .map_err(|e| e.prepend(index)),
            None => Ok(None),
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.view.count() - self.view.current_index())
    }
}

/// Map access over an object. With `first_match`, later pairs repeating an earlier key are
/// skipped, so struct fields see the same value a keyed lookup would.
struct ObjectAccess<'de, 'o> {
    pairs: std::slice::Iter<'de, (String, Value)>,
    remaining: usize,
    seen: Option<HashSet<&'de str>>,
    current: Option<(&'de str, &'de Value)>,
    options: &'o DecoderOptions,
}

impl<'de, 'o> ObjectAccess<'de, 'o> {
    #[inline]
    fn new(view: KeyedView<'de, 'o>, first_match: bool) -> Self {
        let pairs = view.pairs();
        Self {
            pairs: pairs.iter(),
            remaining: pairs.len(),
            seen: first_match.then(HashSet::new),
            current: None,
            options: view.options(),
        }
    }
}

impl<'de, 'o> de::MapAccess<'de> for ObjectAccess<'de, 'o> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        for (key, value) in self.pairs.by_ref() {
            self.remaining -= 1;
            if let Some(seen) = &mut self.seen {
                if !seen.insert(key.as_str()) {
                    continue;
                }
            }
            self.current = Some((key.as_str(), value));
            return seed
                .deserialize(KeyDeserializer { key: key.as_str() })
                .map(Some)
                .map_err(|e| e.prepend(key.as_str()));
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (key, value) = self
            .current
            .take()
            .ok_or_else(|| Error::data_corrupted("value requested before key"))?;
        seed.deserialize(ValueDeserializer::new(value, self.options))
            .map_err(|e| e.prepend(key))
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Deserializer for object keys. Keys are always strings; typed keys are parsed from them.
struct KeyDeserializer<'de> {
    key: &'de str,
}

impl<'de> KeyDeserializer<'de> {
    #[inline]
    fn parse<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        self.key
            .parse()
            .map_err(|_| Error::data_corrupted(format_args!("key {:?} cannot be converted to {}", self.key, expected)))
    }
}

macro_rules! deserialize_key {
    ($($method: ident => $visit: ident : $ty: ty),* $(,)?) => {
        $(
            #[inline]
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    #[inline]
    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.key)
    }

    deserialize_key! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_char => visit_char: char,
    }

    #[inline]
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    #[inline]
    fn deserialize_newtype_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    #[inline]
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(self.key.into_deserializer())
    }

    forward_to_deserialize_any! {
        f32 f64 str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct EnumAccess<'de, 'o> {
    variant: &'de str,
    value: Option<&'de Value>,
    options: &'o DecoderOptions,
}

impl<'de, 'o> de::EnumAccess<'de> for EnumAccess<'de, 'o> {
    type Error = Error;
    type Variant = VariantAccess<'de, 'o>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.variant))?;
        let access = VariantAccess {
            variant: self.variant,
            value: self.value,
            options: self.options,
        };
        Ok((variant, access))
    }
}

struct VariantAccess<'de, 'o> {
    variant: &'de str,
    value: Option<&'de Value>,
    options: &'o DecoderOptions,
}

impl<'de, 'o> VariantAccess<'de, 'o> {
    #[inline]
    fn payload(&self, expected: &str) -> Result<ValueDeserializer<'de, 'o>> {
        match self.value {
            Some(value) => Ok(ValueDeserializer::new(value, self.options)),
            None => Err(Error::type_mismatch(expected, DataType::String)),
        }
    }
}

impl<'de, 'o> de::VariantAccess<'de> for VariantAccess<'de, 'o> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(Error::type_mismatch(DataType::Null, other.data_type()).prepend(self.variant)),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        let payload = self.payload("single-entry object")?;
        seed.deserialize(payload).map_err(|e| e.prepend(self.variant))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        let payload = self.payload("single-entry object holding an array")?;
        de::Deserializer::deserialize_seq(payload, visitor).map_err(|e| e.prepend(self.variant))
    }

    fn struct_variant<V: Visitor<'de>>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        let payload = self.payload("single-entry object holding an object")?;
        de::Deserializer::deserialize_struct(payload, "", fields, visitor).map_err(|e| e.prepend(self.variant))
    }
}
