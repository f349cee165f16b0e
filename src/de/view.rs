//! Keyed, indexed and single-value views over a decoded [`Value`].

use crate::de::{DecoderOptions, ValueDeserializer};
use crate::error::{Error, Result};
use crate::policy::UserInfo;
use crate::{DataType, Value};
use serde::Deserialize;
use std::any::type_name;

/// A key type that can be built from a decoded object key or an array position.
pub trait CodingKey: Sized {
    /// Returns `None` when `key` does not name a valid key of this type.
    fn from_string(key: &str) -> Option<Self>;

    fn from_index(index: usize) -> Self;
}

impl CodingKey for String {
    #[inline]
    fn from_string(key: &str) -> Option<Self> {
        Some(key.to_string())
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        index.to_string()
    }
}

macro_rules! impl_integer_key {
    ($($ty: ty),*) => {
        $(
            impl CodingKey for $ty {
                #[inline]
                fn from_string(key: &str) -> Option<Self> {
                    key.parse().ok()
                }

                #[inline]
                fn from_index(index: usize) -> Self {
                    <$ty>::try_from(index).unwrap_or(<$ty>::MAX)
                }
            }
        )*
    };
}

impl_integer_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[inline]
fn decode_at<'de, T: Deserialize<'de>>(value: &'de Value, options: &DecoderOptions) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value, options))
}

/// View of an object. Lookups are linear and return the first pair with a matching key.
#[derive(Clone, Copy, Debug)]
pub struct KeyedView<'de, 'o> {
    pairs: &'de [(String, Value)],
    options: &'o DecoderOptions,
}

impl<'de, 'o> KeyedView<'de, 'o> {
    #[inline]
    pub fn new(value: &'de Value, options: &'o DecoderOptions) -> Result<Self> {
        match value {
            Value::Object(pairs) => Ok(Self { pairs, options }),
            other => Err(Error::type_mismatch(DataType::Object, other.data_type())),
        }
    }

    #[inline]
    pub(crate) fn pairs(&self) -> &'de [(String, Value)] {
        self.pairs
    }

    #[inline]
    pub(crate) fn options(&self) -> &'o DecoderOptions {
        self.options
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Every key that `K` accepts, in decode order. Keys `K` rejects are left out.
    #[inline]
    pub fn all_keys<K: CodingKey>(&self) -> Vec<K> {
        self.pairs.iter().filter_map(|(k, _)| K::from_string(k)).collect()
    }

    /// Returns the first value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Result<&'de Value> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| Error::key_not_found(key))
    }

    #[inline]
    pub fn is_null(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_null())
    }

    #[inline]
    pub fn decode<T: Deserialize<'de>>(&self, key: &str) -> Result<T> {
        decode_at(self.get(key)?, self.options).map_err(|e| e.prepend(key))
    }

    /// Like [`decode`](KeyedView::decode), but a missing key or a null value yields `None`.
    #[inline]
    pub fn decode_if_present<T: Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.pairs.iter().find(|(k, _)| k == key) {
            None | Some((_, Value::Null)) => Ok(None),
            Some((_, value)) => decode_at(value, self.options).map(Some).map_err(|e| e.prepend(key)),
        }
    }

    #[inline]
    pub fn keyed(&self, key: &str) -> Result<KeyedView<'de, 'o>> {
        KeyedView::new(self.get(key)?, self.options).map_err(|e| e.prepend(key))
    }

    #[inline]
    pub fn indexed(&self, key: &str) -> Result<IndexedView<'de, 'o>> {
        IndexedView::new(self.get(key)?, self.options).map_err(|e| e.prepend(key))
    }

    #[inline]
    pub fn user_info(&self) -> &'o UserInfo {
        self.options.user_info()
    }
}

/// Cursor over an array.
#[derive(Clone, Debug)]
pub struct IndexedView<'de, 'o> {
    items: &'de [Value],
    index: usize,
    options: &'o DecoderOptions,
}

impl<'de, 'o> IndexedView<'de, 'o> {
    #[inline]
    pub fn new(value: &'de Value, options: &'o DecoderOptions) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self {
                items,
                index: 0,
                options,
            }),
            other => Err(Error::type_mismatch(DataType::Array, other.data_type())),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    #[inline]
    pub(crate) fn options(&self) -> &'o DecoderOptions {
        self.options
    }

    /// Returns the element under the cursor and advances past it.
    #[inline]
    pub(crate) fn next_value(&mut self) -> Option<(usize, &'de Value)> {
        let value = self.items.get(self.index)?;
        let index = self.index;
        self.index += 1;
        Some((index, value))
    }

    #[inline]
    fn current(&self, expected: &str) -> Result<&'de Value> {
        self.items
            .get(self.index)
            .ok_or_else(|| Error::value_not_found(expected).prepend(self.index))
    }

    /// Decodes the element under the cursor. The cursor only advances on success.
    #[inline]
    pub fn next<T: Deserialize<'de>>(&mut self) -> Result<T> {
        let value = self.current(type_name::<T>())?;
        let decoded = decode_at(value, self.options).map_err(|e| e.prepend(self.index))?;
        self.index += 1;
        Ok(decoded)
    }

    /// Skips the element under the cursor if it is null.
    #[inline]
    pub fn decode_null(&mut self) -> Result<bool> {
        if self.current("null")?.is_null() {
            self.index += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[inline]
    pub fn keyed(&mut self) -> Result<KeyedView<'de, 'o>> {
        let value = self.current("object")?;
        let view = KeyedView::new(value, self.options).map_err(|e| e.prepend(self.index))?;
        self.index += 1;
        Ok(view)
    }

    #[inline]
    pub fn indexed(&mut self) -> Result<IndexedView<'de, 'o>> {
        let value = self.current("array")?;
        let view = IndexedView::new(value, self.options).map_err(|e| e.prepend(self.index))?;
        self.index += 1;
        Ok(view)
    }

    #[inline]
    pub fn user_info(&self) -> &'o UserInfo {
        self.options.user_info()
    }
}

/// The value itself, as a scalar or the root of a nested structure.
#[derive(Clone, Copy, Debug)]
pub struct SingleValueView<'de, 'o> {
    value: &'de Value,
    options: &'o DecoderOptions,
}

impl<'de, 'o> SingleValueView<'de, 'o> {
    #[inline]
    pub fn new(value: &'de Value, options: &'o DecoderOptions) -> Self {
        Self { value, options }
    }

    #[inline]
    pub fn value(&self) -> &'de Value {
        self.value
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    #[inline]
    pub fn decode<T: Deserialize<'de>>(&self) -> Result<T> {
        decode_at(self.value, self.options)
    }

    #[inline]
    pub fn keyed(&self) -> Result<KeyedView<'de, 'o>> {
        KeyedView::new(self.value, self.options)
    }

    #[inline]
    pub fn indexed(&self) -> Result<IndexedView<'de, 'o>> {
        IndexedView::new(self.value, self.options)
    }

    #[inline]
    pub fn options(&self) -> &'o DecoderOptions {
        self.options
    }

    #[inline]
    pub fn user_info(&self) -> &'o UserInfo {
        self.options.user_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PathSegment};

    fn object() -> Value {
        Value::Object(vec![
            ("name".to_string(), Value::from("bob")),
            ("7".to_string(), Value::Null),
            ("tags".to_string(), Value::Array(vec![Value::from(1), Value::Null, Value::from(300)])),
            ("name".to_string(), Value::from("alice")),
        ])
    }

    #[test]
    fn test_keyed() {
        let options = DecoderOptions::default();
        let value = object();
        let view = KeyedView::new(&value, &options).unwrap();

        assert!(view.contains("tags"));
        assert!(!view.contains("age"));
        assert!(view.is_null("7").unwrap());
        assert_eq!(view.decode::<String>("name").unwrap(), "bob");
        assert_eq!(view.decode_if_present::<u8>("7").unwrap(), None);
        assert_eq!(view.decode_if_present::<u8>("age").unwrap(), None);
        assert_eq!(view.all_keys::<u32>(), vec![7]);
        assert_eq!(view.all_keys::<String>().len(), 4);

        let err = view.decode::<u8>("age").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::KeyNotFound { key: "age".to_string() });
        assert_eq!(err.path(), &[PathSegment::Key("age".to_string())]);

        let err = view.keyed("name").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
        assert_eq!(err.path(), &[PathSegment::Key("name".to_string())]);

        assert!(KeyedView::new(&Value::Null, &options).is_err());
    }

    #[test]
    fn test_indexed() {
        let options = DecoderOptions::default();
        let value = object();
        let view = KeyedView::new(&value, &options).unwrap();
        let mut tags = view.indexed("tags").unwrap();

        assert_eq!(tags.count(), 3);
        assert!(!tags.decode_null().unwrap());
        assert_eq!(tags.next::<u8>().unwrap(), 1);
        assert_eq!(tags.current_index(), 1);
        assert!(tags.decode_null().unwrap());

        let err = tags.next::<u8>().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DataCorrupted(_)));
        assert_eq!(err.path(), &[PathSegment::Index(2)]);
        assert_eq!(tags.current_index(), 2);
        assert_eq!(tags.next::<u16>().unwrap(), 300);
        assert!(tags.is_at_end());

        let err = tags.next::<u16>().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ValueNotFound { .. }));
        assert_eq!(err.path(), &[PathSegment::Index(3)]);
    }

    #[test]
    fn test_single_value() {
        let options = DecoderOptions::default();
        let value = Value::Float(3.0);
        let view = SingleValueView::new(&value, &options);
        assert!(!view.is_null());
        assert_eq!(view.decode::<i32>().unwrap(), 3);
        assert_eq!(view.decode::<f32>().unwrap(), 3.0);
        assert!(view.keyed().is_err());
    }
}
