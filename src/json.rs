//! Conversions between `serde_json::Value` and [`Value`].

use crate::error::{Error, Result};
use crate::{BigNumber, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number};
use std::str::FromStr;

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(val) => Value::Bool(*val),
            serde_json::Value::Number(val) => number2value(val),
            serde_json::Value::String(val) => Value::String(val.clone()),
            serde_json::Value::Array(val) => Value::Array(val.iter().map(Value::from).collect()),
            serde_json::Value::Object(val) => {
                Value::Object(val.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect())
            }
        }
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = Error;

    /// Binary becomes Base64 text and of duplicate keys only the first survives. Non-finite
    /// floats have no JSON form.
    fn try_from(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(val) => serde_json::Value::Bool(*val),
            Value::Signed(val) => serde_json::Value::Number((*val).into()),
            Value::Unsigned(val) => serde_json::Value::Number((*val).into()),
            Value::Float(val) => match Number::from_f64(*val) {
                Some(number) => serde_json::Value::Number(number),
                None => {
                    return Err(Error::data_corrupted(format_args!(
                        "non-conforming float {} has no json representation",
                        val
                    )))
                }
            },
            Value::BigNumber(val) => {
                // Plain decimal text where the exponent allows it, `1e400` style otherwise.
                let text = val.to_number().map_or_else(|_| val.to_string(), |n| n.to_string());
                let number = Number::from_str(&text).map_err(Error::data_corrupted)?;
                serde_json::Value::Number(number)
            }
            Value::String(val) => serde_json::Value::String(val.clone()),
            Value::Binary(val) => serde_json::Value::String(STANDARD.encode(val)),
            Value::Array(items) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| serde_json::Value::try_from(v).map_err(|e| e.prepend(i)))
                    .collect::<Result<Vec<_>>>()?;
                serde_json::Value::Array(items)
            }
            Value::Object(pairs) => {
                let mut map = Map::with_capacity(pairs.len());
                for (key, val) in pairs {
                    if !map.contains_key(key) {
                        let val = serde_json::Value::try_from(val).map_err(|e| e.prepend(key.as_str()))?;
                        map.insert(key.clone(), val);
                    }
                }
                serde_json::Value::Object(map)
            }
        })
    }
}

impl Value {
    /// Parses JSON text into a `Value`, keeping the key order of the text.
    #[inline]
    pub fn parse<T: AsRef<str>>(str: T) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(str.as_ref()).map_err(Error::data_corrupted)?;
        Ok(Value::from(&json))
    }
}

/// Integers that fit 64 bits stay integers, other numbers become exact big numbers where the
/// significand allows it and floats otherwise.
#[inline]
fn number2value(val: &Number) -> Value {
    if let Some(v) = val.as_i64() {
        return Value::Signed(v);
    }
    if let Some(v) = val.as_u64() {
        return Value::Unsigned(v);
    }
    let text = val.to_string();
    match BigNumber::from_str(&text) {
        Ok(number) => Value::BigNumber(number),
        Err(_) => Value::Float(text.parse().unwrap_or(f64::NAN)),
    }
}
