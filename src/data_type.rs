//! Data type.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Kind of a [`Value`](crate::Value).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DataType {
    Object,
    Array,
    String,
    Binary,
    Bool,
    Null,
    Signed,
    Unsigned,
    Float,
    BigNumber,
}

impl DataType {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Object => "object",
            DataType::Array => "array",
            DataType::String => "string",
            DataType::Binary => "binary",
            DataType::Bool => "bool",
            DataType::Null => "null",
            DataType::Signed => "signed integer",
            DataType::Unsigned => "unsigned integer",
            DataType::Float => "float",
            DataType::BigNumber => "big number",
        }
    }
}

impl Display for DataType {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag byte introducing each event in the binary stream.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub(crate) enum WireTag {
    EndOfData = 0,
    BeginObject = 1,
    BeginArray = 2,
    EndContainer = 3,
    Null = 4,
    False = 5,
    True = 6,
    Signed = 7,
    Unsigned = 8,
    Float = 9,
    BigNumber = 10,
    String = 11,
    StringChunk = 12,
    Binary = 13,
}

#[derive(Debug)]
#[repr(transparent)]
pub struct InvalidDataType(pub(crate) u8);

impl TryFrom<u8> for WireTag {
    type Error = InvalidDataType;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireTag::EndOfData),
            1 => Ok(WireTag::BeginObject),
            2 => Ok(WireTag::BeginArray),
            3 => Ok(WireTag::EndContainer),
            4 => Ok(WireTag::Null),
            5 => Ok(WireTag::False),
            6 => Ok(WireTag::True),
            7 => Ok(WireTag::Signed),
            8 => Ok(WireTag::Unsigned),
            9 => Ok(WireTag::Float),
            10 => Ok(WireTag::BigNumber),
            11 => Ok(WireTag::String),
            12 => Ok(WireTag::StringChunk),
            13 => Ok(WireTag::Binary),
            v => Err(InvalidDataType(v)),
        }
    }
}

impl Display for InvalidDataType {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "invalid data type value '{}'", self.0)
    }
}

impl Error for InvalidDataType {}
