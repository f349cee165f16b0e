//! Encoding and decoding errors.

use crate::de::CodingKey;
use crate::engine::EngineError;
use std::error;
use std::fmt;

/// One step on the way from the root value to the failure site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Converts the segment into a typed key, if the key type can represent it.
    #[inline]
    pub fn to_key<K: CodingKey>(&self) -> Option<K> {
        match self {
            PathSegment::Key(key) => K::from_string(key),
            PathSegment::Index(index) => Some(K::from_index(*index)),
        }
    }
}

impl fmt::Display for PathSegment {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{:?}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    #[inline]
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    #[inline]
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Category of an [`Error`].
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// A value of the wrong kind was found where a typed value was expected.
    TypeMismatch { expected: String, found: String },
    /// A value was expected but an indexed container was exhausted or the value was null.
    ValueNotFound { expected: String },
    /// A keyed lookup missed.
    KeyNotFound { key: String },
    /// A value is present but semantically invalid.
    DataCorrupted(String),
    /// The low-level encoder reported a failure.
    Encoder(String),
    /// The low-level decoder reported a failure.
    Decoder(String),
}

impl fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TypeMismatch { expected, found } => {
                write!(f, "type mismatch, expected {}, but found {}", expected, found)
            }
            ErrorKind::ValueNotFound { expected } => write!(f, "expected {} but found no value", expected),
            ErrorKind::KeyNotFound { key } => write!(f, "no value associated with key {:?}", key),
            ErrorKind::DataCorrupted(msg) => write!(f, "data corrupted: {}", msg),
            ErrorKind::Encoder(msg) => write!(f, "encoder error: {}", msg),
            ErrorKind::Decoder(msg) => write!(f, "decoder error: {}", msg),
        }
    }
}

/// Error produced by encoding or decoding, carrying the path to the failure site.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    path: Vec<PathSegment>,
}

impl Error {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, path: Vec::new() }
    }

    #[inline]
    pub fn type_mismatch<E: fmt::Display, F: fmt::Display>(expected: E, found: F) -> Self {
        Error::new(ErrorKind::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }

    #[inline]
    pub fn value_not_found<E: fmt::Display>(expected: E) -> Self {
        Error::new(ErrorKind::ValueNotFound {
            expected: expected.to_string(),
        })
    }

    /// A missing key; the key itself becomes the last path segment.
    #[inline]
    pub fn key_not_found<K: AsRef<str>>(key: K) -> Self {
        let key = key.as_ref();
        Error {
            kind: ErrorKind::KeyNotFound { key: key.to_string() },
            path: vec![PathSegment::from(key)],
        }
    }

    #[inline]
    pub fn data_corrupted<M: fmt::Display>(msg: M) -> Self {
        Error::new(ErrorKind::DataCorrupted(msg.to_string()))
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Keys and indices from the root value to the failure site.
    #[inline]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Prefixes the path with the scope the error is unwinding through.
    #[inline]
    pub(crate) fn prepend<S: Into<PathSegment>>(mut self, segment: S) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    #[inline]
    pub(crate) fn encoder(e: EngineError) -> Self {
        Error::new(ErrorKind::Encoder(e.to_string()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.path.is_empty() {
            f.write_str(" at path [")?;
            for (i, segment) in self.path.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", segment)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl error::Error for Error {}

/// Engine failures reached through the decode callbacks; encode paths use [`Error::encoder`].
impl From<EngineError> for Error {
    #[inline]
    fn from(e: EngineError) -> Self {
        Error::new(ErrorKind::Decoder(e.to_string()))
    }
}

impl serde::ser::Error for Error {
    #[inline]
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::data_corrupted(msg)
    }
}

impl serde::de::Error for Error {
    #[inline]
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::data_corrupted(msg)
    }

    #[inline]
    fn invalid_type(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        Error::type_mismatch(exp, unexp)
    }

    #[inline]
    fn invalid_length(len: usize, exp: &dyn serde::de::Expected) -> Self {
        Error::value_not_found(format_args!("{} (only {} present)", exp, len))
    }

    #[inline]
    fn missing_field(field: &'static str) -> Self {
        Error::key_not_found(field)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let err = Error::key_not_found("age").prepend(3usize).prepend("people");
        assert_eq!(
            err.path(),
            &[
                PathSegment::Key("people".to_string()),
                PathSegment::Index(3),
                PathSegment::Key("age".to_string())
            ]
        );
        assert_eq!(
            err.to_string(),
            r#"no value associated with key "age" at path ["people", 3, "age"]"#
        );
    }

    #[test]
    fn test_segment_to_key() {
        assert_eq!(PathSegment::from("7").to_key::<u32>(), Some(7));
        assert_eq!(PathSegment::from("x").to_key::<u32>(), None);
        assert_eq!(PathSegment::Index(2).to_key::<String>(), Some("2".to_string()));
    }
}
