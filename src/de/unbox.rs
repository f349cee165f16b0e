//! Exact conversion of decoded scalars into the requested Rust types.

use crate::de::{DecoderOptions, SingleValueView};
use crate::error::{Error, Result};
use crate::policy::{
    date_from_milliseconds, date_from_seconds, parse_iso8601, DateDecodingStrategy, NonConformingFloatStrategy,
};
use crate::{DataType, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::borrow::Cow;
use std::time::SystemTime;

/// Error for a value of the wrong kind. Null is reported as a missing value.
#[inline]
pub(crate) fn mismatch<E: std::fmt::Display>(expected: E, found: &Value) -> Error {
    match found {
        Value::Null => Error::value_not_found(expected),
        other => Error::type_mismatch(expected, other.data_type()),
    }
}

#[inline]
fn not_convertible<E: std::fmt::Display>(found: &Value, expected: E) -> Error {
    Error::data_corrupted(format_args!("value {:?} cannot be converted to {}", found, expected))
}

/// Widens any integral value to `i128`. Floats and big numbers qualify only when they have
/// no fractional part.
fn unbox_i128(value: &Value, expected: &str) -> Result<i128> {
    match value {
        Value::Signed(v) => Ok(i128::from(*v)),
        Value::Unsigned(v) => Ok(i128::from(*v)),
        Value::Float(v) => {
            if v.is_finite() && v.fract() == 0.0 && *v >= i128::MIN as f64 && *v < i128::MAX as f64 {
                Ok(*v as i128)
            } else {
                Err(not_convertible(value, expected))
            }
        }
        Value::BigNumber(n) => n.to_i128().ok_or_else(|| not_convertible(value, expected)),
        other => Err(mismatch(expected, other)),
    }
}

/// Converts `value` into the integer type `T`, failing instead of truncating.
#[inline]
pub(crate) fn unbox_integer<T: TryFrom<i128>>(value: &Value, expected: &str) -> Result<T> {
    let wide = unbox_i128(value, expected)?;
    T::try_from(wide).map_err(|_| not_convertible(value, expected))
}

/// Reads any number as `f64`. Under [`NonConformingFloatStrategy::Throw`] non-finite results
/// are rejected.
pub(crate) fn unbox_f64(value: &Value, strategy: &NonConformingFloatStrategy) -> Result<f64> {
    let v = unbox_any_f64(value, strategy)?;
    if !v.is_finite() && *strategy == NonConformingFloatStrategy::Throw {
        return Err(Error::data_corrupted(format_args!(
            "non-conforming float {} cannot be decoded",
            v
        )));
    }
    Ok(v)
}

fn unbox_any_f64(value: &Value, strategy: &NonConformingFloatStrategy) -> Result<f64> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Signed(v) => Ok(*v as f64),
        Value::Unsigned(v) => Ok(*v as f64),
        Value::BigNumber(n) => Ok(n.to_f64()),
        Value::String(s) => strategy
            .parse_sentinel(s)
            .ok_or_else(|| Error::type_mismatch(DataType::Float, DataType::String)),
        other => Err(mismatch(DataType::Float, other)),
    }
}

/// Like [`unbox_f64`], but finite values beyond `f32` range are rejected.
pub(crate) fn unbox_f32(value: &Value, strategy: &NonConformingFloatStrategy) -> Result<f32> {
    let v = unbox_f64(value, strategy)?;
    if v.is_finite() && v.abs() > f32::MAX as f64 {
        return Err(not_convertible(value, "f32"));
    }
    Ok(v as f32)
}

#[inline]
pub(crate) fn unbox_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(v) => Ok(*v),
        other => Err(mismatch(DataType::Bool, other)),
    }
}

#[inline]
pub(crate) fn unbox_str(value: &Value) -> Result<&str> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(DataType::String, other)),
    }
}

/// Raw binary as is; Base64 text is accepted too, since it is how byte buffers are encoded
/// by default.
pub(crate) fn unbox_bytes(value: &Value) -> Result<Cow<'_, [u8]>> {
    match value {
        Value::Binary(bytes) => Ok(Cow::Borrowed(bytes)),
        Value::String(s) => STANDARD
            .decode(s)
            .map(Cow::Owned)
            .map_err(|e| Error::data_corrupted(format_args!("invalid base64 data: {}", e))),
        other => Err(mismatch(DataType::Binary, other)),
    }
}

pub(crate) fn unbox_date(value: &Value, options: &DecoderOptions) -> Result<SystemTime> {
    let invalid = || Error::data_corrupted(format_args!("{:?} is not a valid date", value));
    match options.date_strategy() {
        DateDecodingStrategy::SecondsSince1970 => {
            let secs = unbox_f64(value, options.float_strategy())?;
            date_from_seconds(secs).ok_or_else(invalid)
        }
        DateDecodingStrategy::MillisecondsSince1970 => {
            let millis = unbox_f64(value, options.float_strategy())?;
            date_from_milliseconds(millis).ok_or_else(invalid)
        }
        DateDecodingStrategy::Iso8601 => parse_iso8601(unbox_str(value)?).ok_or_else(invalid),
        DateDecodingStrategy::Formatted(formatter) => formatter.parse(unbox_str(value)?).ok_or_else(invalid),
        DateDecodingStrategy::Custom(f) => f(&SingleValueView::new(value, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::BigNumber;

    fn assert_corrupted<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(e) => assert!(matches!(e.kind(), ErrorKind::DataCorrupted(_)), "{}", e),
            Ok(v) => panic!("expected an error, got {:?}", v),
        }
    }

    #[test]
    fn test_exact_integers() {
        assert_eq!(unbox_integer::<u8>(&Value::Unsigned(255), "u8").unwrap(), 255);
        assert_corrupted(unbox_integer::<u8>(&Value::Unsigned(256), "u8"));
        assert_corrupted(unbox_integer::<u64>(&Value::Signed(-1), "u64"));
        assert_eq!(unbox_integer::<i64>(&Value::Unsigned(i64::MAX as u64), "i64").unwrap(), i64::MAX);
        assert_corrupted(unbox_integer::<i64>(&Value::Unsigned(u64::MAX), "i64"));
        assert_eq!(unbox_integer::<i16>(&Value::Float(-2.0), "i16").unwrap(), -2);
        assert_corrupted(unbox_integer::<i16>(&Value::Float(2.5), "i16"));
        assert_corrupted(unbox_integer::<i16>(&Value::Float(f64::NAN), "i16"));
        assert_eq!(
            unbox_integer::<u32>(&Value::BigNumber(BigNumber::new(12, 2, false)), "u32").unwrap(),
            1200
        );
        assert_corrupted(unbox_integer::<u32>(&Value::BigNumber(BigNumber::new(12, -1, false)), "u32"));
    }

    #[test]
    fn test_mismatches() {
        let err = unbox_integer::<u8>(&Value::String("1".to_string()), "u8").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
        let err = unbox_bool(&Value::Null).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ValueNotFound { .. }));
        let err = unbox_f64(&Value::String("NaN".to_string()), &NonConformingFloatStrategy::Throw).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn test_floats() {
        let strategy = NonConformingFloatStrategy::Throw;
        assert_eq!(unbox_f64(&Value::Signed(-3), &strategy).unwrap(), -3.0);
        assert_eq!(
            unbox_f64(&Value::BigNumber(BigNumber::new(25, -1, true)), &strategy).unwrap(),
            -2.5
        );
        assert_eq!(unbox_f32(&Value::Float(0.5), &strategy).unwrap(), 0.5);
        assert_corrupted(unbox_f32(&Value::Float(1e300), &strategy));
        assert_corrupted(unbox_f64(&Value::Float(f64::INFINITY), &strategy));
        assert_corrupted(unbox_f64(&Value::Float(f64::NAN), &strategy));
        assert_corrupted(unbox_f32(&Value::Float(f64::NEG_INFINITY), &strategy));
        assert_corrupted(unbox_f64(&Value::BigNumber(BigNumber::new(1, 400, false)), &strategy));

        let strategy = NonConformingFloatStrategy::convert_to_string("+inf", "-inf", "nan");
        assert_eq!(
            unbox_f64(&Value::String("-inf".to_string()), &strategy).unwrap(),
            f64::NEG_INFINITY
        );
        assert_eq!(unbox_f32(&Value::String("+inf".to_string()), &strategy).unwrap(), f32::INFINITY);
        assert_eq!(unbox_f64(&Value::Float(f64::INFINITY), &strategy).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_bytes() {
        assert_eq!(unbox_bytes(&Value::Binary(vec![1, 2])).unwrap().as_ref(), &[1, 2]);
        assert_eq!(unbox_bytes(&Value::String("AQI=".to_string())).unwrap().as_ref(), &[1, 2]);
        assert_corrupted(unbox_bytes(&Value::String("*".to_string())));
    }
}
