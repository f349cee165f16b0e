//! Serde helpers for arbitrary-precision [`Number`] fields.
//!
//! ```
//! use bjson::Number;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Price {
//!     #[serde(with = "bjson::number")]
//!     amount: Number,
//! }
//!
//! let price = Price { amount: "12.50".parse().unwrap() };
//! let bytes = bjson::to_vec(&price).unwrap();
//! assert_eq!(bjson::from_slice::<Price>(&bytes).unwrap(), price);
//! ```
//!
//! With this crate the number travels as the engine's big-number primitive, so its
//! significand must fit 64 bits. Other serializers see the decimal text.

use crate::value::{BigNumber, BIG_NUMBER_TOKEN};
use crate::Number;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;
use std::str::FromStr;

const JSON_NUMBER_KEY: &str = "$serde_json::private::Number";

pub fn serialize<S: Serializer>(number: &Number, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_newtype_struct(BIG_NUMBER_TOKEN, &number.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    deserializer.deserialize_newtype_struct(BIG_NUMBER_TOKEN, NumberVisitor)
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or numeric string")
    }

    #[inline]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(Number::from(v))
    }

    #[inline]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        Ok(Number::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        if !v.is_finite() {
            return Err(E::invalid_value(de::Unexpected::Float(v), &self));
        }
        Number::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
        match BigNumber::from_str(v) {
            Ok(number) => number.to_number().map_err(E::custom),
            Err(_) => Number::from_str(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Number, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == JSON_NUMBER_KEY => {
                let text: String = map.next_value()?;
                self.visit_str(&text)
            }
            _ => Err(de::Error::invalid_type(de::Unexpected::Map, &self)),
        }
    }

    #[inline]
    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Number, D::Error> {
        deserializer.deserialize_any(self)
    }
}
