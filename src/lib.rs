//! Serde support for a compact binary JSON-equivalent format.
//!
//! Any `Serialize` value can be encoded into bytes and any `Deserialize` value decoded back.
//! Decoding first rebuilds a generic [`Value`] tree from the byte stream and then reconstructs
//! the requested type from it, with exact numeric conversions and errors that carry the path
//! of keys and indices leading to the failure.
//!
//! ## Usage
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! let person = Person { name: "Ann".to_string(), age: 42 };
//! let bytes = bjson::to_vec(&person).unwrap();
//! assert_eq!(bjson::from_slice::<Person>(&bytes).unwrap(), person);
//!
//! let err = bjson::from_slice::<Person>(&bjson::to_vec(&("Ann", 42)).unwrap()).unwrap_err();
//! assert!(matches!(err.kind(), bjson::ErrorKind::TypeMismatch { .. }));
//! ```
//!
//! Values the generic model cannot represent unambiguously are handled by policies set on an
//! [`Encoder`] or [`Decoder`]:
//!
//! ```rust
//! use bjson::{DateDecodingStrategy, DateEncodingStrategy, Decoder, Encoder};
//! use std::time::{Duration, SystemTime, UNIX_EPOCH};
//!
//! let date = UNIX_EPOCH + Duration::from_secs(86400);
//! let bytes = Encoder::new()
//!     .with_date_strategy(DateEncodingStrategy::Iso8601)
//!     .encode(&date)
//!     .unwrap();
//! let decoded: SystemTime = Decoder::new()
//!     .with_date_strategy(DateDecodingStrategy::Iso8601)
//!     .decode(&bytes)
//!     .unwrap();
//! assert_eq!(decoded, date);
//! ```
//!
//! ## Binary format
//!
//! ```BNF
//! stream ::= event* end-of-data
//!
//! event ::=
//!     1 |                         // begin object, members follow as key-value event pairs
//!     2 |                         // begin array
//!     3 |                         // end of the innermost open container
//!     4 |                         // null
//!     5 |                         // false
//!     6 |                         // true
//!     7 zigzag-varint |           // signed integer
//!     8 varint |                  // unsigned integer
//!     9 float64 |                 // 64-bit floating point, little endian
//!     10 sign varint zigzag-varint |  // big number: sign, significand, exponent
//!     11 data |                   // string
//!     12 last-flag data |         // string chunk, strings over 4096 bytes are split
//!     13 data                     // binary data
//!
//! end-of-data ::= 0
//! sign ::= 0 | 1
//! last-flag ::= 0 | 1
//! data ::= varint uint8*
//!
//! varint ::= uint8*   // If the high bit of a byte is 1,
//!                     // the value is continued in the next byte.
//!                     // Use 10 bytes at most.
//! ```
//!
//! A stream holds exactly one root value. Containers nest at most 128 deep.

mod binary;
mod data_type;
mod de;
pub mod engine;
mod error;
mod format;
mod json;
pub mod number;
pub mod policy;
mod ser;
mod util;
mod value;
mod vec;

pub use self::{
    data_type::DataType,
    de::{
        decode_value, from_slice, CodingKey, Decoder, DecoderOptions, IndexedView, KeyedView, SingleValueView,
        ValueDeserializer,
    },
    error::{Error, ErrorKind, PathSegment, Result},
    format::LazyFormat,
    policy::{
        DataEncodingStrategy, DateDecodingStrategy, DateEncodingStrategy, DateFormatter, NonConformingFloatStrategy,
        UserInfo,
    },
    ser::{to_vec, Compound, Encoder, EncoderOptions, Serializer, StructCompound},
    value::{from_value, to_value, BigNumber, NumberError, Value},
};
pub use decimal_rs::Decimal as Number;
