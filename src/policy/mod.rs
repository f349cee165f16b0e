//! Pluggable strategies for values the generic model cannot represent unambiguously.

use crate::de::SingleValueView;
use crate::error::Result;
use crate::ser::Serializer;
use chrono::{DateTime, SecondsFormat, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Caller-supplied context made available to custom strategies.
pub type UserInfo = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// Converts dates to and from text for [`DateEncodingStrategy::Formatted`] and
/// [`DateDecodingStrategy::Formatted`].
pub trait DateFormatter: Send + Sync {
    fn format(&self, date: SystemTime) -> String;

    /// Returns `None` when `text` is not a date in this format.
    fn parse(&self, text: &str) -> Option<SystemTime>;
}

type DateEncodeFn = dyn Fn(SystemTime, &mut Serializer<'_>) -> Result<()> + Send + Sync;
type DateDecodeFn = dyn Fn(&SingleValueView<'_, '_>) -> Result<SystemTime> + Send + Sync;
type DataEncodeFn = dyn Fn(&[u8], &mut Serializer<'_>) -> Result<()> + Send + Sync;

/// How a `SystemTime` is written.
#[derive(Clone, Default)]
pub enum DateEncodingStrategy {
    /// Seconds since 1970-01-01T00:00:00Z as a float.
    #[default]
    SecondsSince1970,
    /// Milliseconds since 1970-01-01T00:00:00Z as a float.
    MillisecondsSince1970,
    /// ISO-8601 text in UTC.
    Iso8601,
    Formatted(Arc<dyn DateFormatter>),
    /// The closure writes the date through the serializer. Writing nothing produces an
    /// empty object.
    Custom(Arc<DateEncodeFn>),
}

impl DateEncodingStrategy {
    #[inline]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(SystemTime, &mut Serializer<'_>) -> Result<()> + Send + Sync + 'static,
    {
        DateEncodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DateEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateEncodingStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateEncodingStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateEncodingStrategy::Iso8601 => f.write_str("Iso8601"),
            DateEncodingStrategy::Formatted(_) => f.write_str("Formatted(..)"),
            DateEncodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a `SystemTime` is read back.
#[derive(Clone, Default)]
pub enum DateDecodingStrategy {
    #[default]
    SecondsSince1970,
    MillisecondsSince1970,
    Iso8601,
    Formatted(Arc<dyn DateFormatter>),
    Custom(Arc<DateDecodeFn>),
}

impl DateDecodingStrategy {
    #[inline]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&SingleValueView<'_, '_>) -> Result<SystemTime> + Send + Sync + 'static,
    {
        DateDecodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DateDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateDecodingStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateDecodingStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateDecodingStrategy::Iso8601 => f.write_str("Iso8601"),
            DateDecodingStrategy::Formatted(_) => f.write_str("Formatted(..)"),
            DateDecodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How byte buffers passed to `serialize_bytes` are written. Decoding always accepts raw
/// binary, and Base64 text.
#[derive(Clone, Default)]
pub enum DataEncodingStrategy {
    #[default]
    Base64,
    /// The engine's native binary event.
    Raw,
    Custom(Arc<DataEncodeFn>),
}

impl DataEncodingStrategy {
    #[inline]
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[u8], &mut Serializer<'_>) -> Result<()> + Send + Sync + 'static,
    {
        DataEncodingStrategy::Custom(Arc::new(f))
    }
}

impl fmt::Debug for DataEncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataEncodingStrategy::Base64 => f.write_str("Base64"),
            DataEncodingStrategy::Raw => f.write_str("Raw"),
            DataEncodingStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// What happens to `NaN` and the infinities.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum NonConformingFloatStrategy {
    /// Fail with a data corrupted error.
    #[default]
    Throw,
    /// Write the matching sentinel string, and accept it back where a float is expected.
    ConvertToString {
        positive_infinity: String,
        negative_infinity: String,
        nan: String,
    },
}

impl NonConformingFloatStrategy {
    #[inline]
    pub fn convert_to_string<S: Into<String>>(positive_infinity: S, negative_infinity: S, nan: S) -> Self {
        NonConformingFloatStrategy::ConvertToString {
            positive_infinity: positive_infinity.into(),
            negative_infinity: negative_infinity.into(),
            nan: nan.into(),
        }
    }

    /// The sentinel for a non-finite `value`, if the strategy has one.
    pub(crate) fn sentinel(&self, value: f64) -> Option<&str> {
        match self {
            NonConformingFloatStrategy::Throw => None,
            NonConformingFloatStrategy::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if value.is_nan() {
                    Some(nan)
                } else if value > 0.0 {
                    Some(positive_infinity)
                } else {
                    Some(negative_infinity)
                }
            }
        }
    }

    /// The float a sentinel string stands for.
    pub(crate) fn parse_sentinel(&self, text: &str) -> Option<f64> {
        match self {
            NonConformingFloatStrategy::Throw => None,
            NonConformingFloatStrategy::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if text == positive_infinity {
                    Some(f64::INFINITY)
                } else if text == negative_infinity {
                    Some(f64::NEG_INFINITY)
                } else if text == nan {
                    Some(f64::NAN)
                } else {
                    None
                }
            }
        }
    }
}

/// Signed seconds between the Unix epoch and `date`.
#[inline]
pub(crate) fn seconds_since_1970(date: SystemTime) -> f64 {
    match date.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Signed milliseconds between the Unix epoch and `date`, exact for whole milliseconds.
#[inline]
pub(crate) fn milliseconds_since_1970(date: SystemTime) -> f64 {
    let millis = |d: Duration| d.as_secs() as f64 * 1000.0 + f64::from(d.subsec_nanos()) / 1_000_000.0;
    match date.duration_since(UNIX_EPOCH) {
        Ok(d) => millis(d),
        Err(e) => -millis(e.duration()),
    }
}

#[inline]
fn date_from_offset(negative: bool, offset: Duration) -> Option<SystemTime> {
    if negative {
        UNIX_EPOCH.checked_sub(offset)
    } else {
        UNIX_EPOCH.checked_add(offset)
    }
}

/// Inverse of [`seconds_since_1970`]; `None` when the result is not a representable time.
#[inline]
pub(crate) fn date_from_seconds(secs: f64) -> Option<SystemTime> {
    if !secs.is_finite() || secs.abs() >= u64::MAX as f64 {
        return None;
    }
    date_from_offset(secs < 0.0, Duration::from_secs_f64(secs.abs()))
}

/// Inverse of [`milliseconds_since_1970`]. Whole milliseconds are taken as is, the fraction
/// is rounded to nanoseconds.
pub(crate) fn date_from_milliseconds(millis: f64) -> Option<SystemTime> {
    if !millis.is_finite() || millis.abs() >= u64::MAX as f64 {
        return None;
    }
    let whole = millis.abs().trunc();
    let nanos = ((millis.abs() - whole) * 1_000_000.0).round() as u64;
    let offset = Duration::from_millis(whole as u64).checked_add(Duration::from_nanos(nanos))?;
    date_from_offset(millis < 0.0, offset)
}

/// RFC 3339 text in UTC with whole seconds, e.g. `2001-09-09T01:46:40Z`.
#[inline]
pub(crate) fn format_iso8601(date: SystemTime) -> String {
    DateTime::<Utc>::from(date).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses RFC 3339 text with any offset; fractional seconds are kept.
#[inline]
pub(crate) fn parse_iso8601(text: &str) -> Option<SystemTime> {
    DateTime::parse_from_rfc3339(text).ok().map(SystemTime::from)
}
