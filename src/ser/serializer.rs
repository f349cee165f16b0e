//! Serde data format walking a `Serialize` value into engine events.

use crate::engine::RawEncoder;
use crate::error::{Error, Result};
use crate::policy::{
    format_iso8601, milliseconds_since_1970, seconds_since_1970, DataEncodingStrategy, DateEncodingStrategy, UserInfo,
};
use crate::ser::scalar::{key_to_string, ScalarSerializer};
use crate::ser::tracking::{ContainerKind, Tracking};
use crate::ser::EncoderOptions;
use crate::value::{BigNumber, BIG_NUMBER_TOKEN, RAW_BINARY_TOKEN};
use crate::{DataType, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::ser::{self, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Struct name under which `std::time::SystemTime` serializes itself.
pub(crate) const SYSTEM_TIME_STRUCT: &str = "SystemTime";
const SECS_FIELD: &str = "secs_since_epoch";
const NANOS_FIELD: &str = "nanos_since_epoch";
/// Struct name under which an arbitrary precision `serde_json::Number` serializes itself.
pub(crate) const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Serializer writing one value into a fresh engine stream.
///
/// Custom date and data strategies receive it to write their replacement value.
pub struct Serializer<'o> {
    raw: RawEncoder,
    options: &'o EncoderOptions,
}

impl<'o> Serializer<'o> {
    #[inline]
    pub(crate) fn new(options: &'o EncoderOptions) -> Result<Self> {
        let raw = RawEncoder::try_new().map_err(Error::encoder)?;
        Ok(Self { raw, options })
    }

    #[inline]
    pub fn options(&self) -> &EncoderOptions {
        self.options
    }

    #[inline]
    pub fn user_info(&self) -> &UserInfo {
        self.options.user_info()
    }

    #[inline]
    pub(crate) fn into_bytes(self) -> Result<Vec<u8>> {
        self.raw.end_encode().map_err(Error::encoder)
    }

    #[inline]
    fn write_null(&mut self) -> Result<()> {
        self.raw.add_null().map_err(Error::encoder)
    }

    #[inline]
    fn write_string(&mut self, value: &str) -> Result<()> {
        self.raw.add_string(value).map_err(Error::encoder)
    }

    #[inline]
    fn write_signed(&mut self, value: i64) -> Result<()> {
        self.raw.add_signed_integer(value).map_err(Error::encoder)
    }

    #[inline]
    fn write_unsigned(&mut self, value: u64) -> Result<()> {
        self.raw.add_unsigned_integer(value).map_err(Error::encoder)
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        if value.is_finite() {
            return self.raw.add_float(value).map_err(Error::encoder);
        }
        match self.options.float_strategy().sentinel(value) {
            Some(sentinel) => self.raw.add_string(sentinel).map_err(Error::encoder),
            None => Err(Error::data_corrupted(format_args!(
                "unable to encode non-conforming float {}",
                value
            ))),
        }
    }

    #[inline]
    fn write_big_number(&mut self, number: BigNumber) -> Result<()> {
        self.raw
            .add_big_number(number.significand(), number.exponent(), number.is_negative())
            .map_err(Error::encoder)
    }

    /// Writes numeric text: integers that fit 64 bits as integers, other exact decimals as big
    /// numbers, anything else as a float.
    fn write_number_text(&mut self, text: &str) -> Result<()> {
        if let Ok(v) = text.parse::<i64>() {
            return self.write_signed(v);
        }
        if let Ok(v) = text.parse::<u64>() {
            return self.write_unsigned(v);
        }
        if let Ok(number) = text.parse::<BigNumber>() {
            return self.write_big_number(number);
        }
        match text.parse::<f64>() {
            Ok(v) => self.write_float(v),
            Err(_) => Err(Error::data_corrupted(format_args!("invalid number literal {:?}", text))),
        }
    }

    /// Runs a custom strategy closure; if it wrote nothing an empty object stands in.
    fn write_custom<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let before = self.raw.event_count();
        f(self)?;
        let mut tracking = Tracking::new();
        if self.raw.event_count() == before {
            tracking.request(ContainerKind::Keyed);
        }
        tracking.close(&mut self.raw).map_err(Error::encoder)
    }

    fn write_date(&mut self, date: SystemTime) -> Result<()> {
        let options = self.options;
        match options.date_strategy() {
            DateEncodingStrategy::SecondsSince1970 => self.write_float(seconds_since_1970(date)),
            DateEncodingStrategy::MillisecondsSince1970 => self.write_float(milliseconds_since_1970(date)),
            DateEncodingStrategy::Iso8601 => self.write_string(&format_iso8601(date)),
            DateEncodingStrategy::Formatted(formatter) => self.write_string(&formatter.format(date)),
            DateEncodingStrategy::Custom(f) => self.write_custom(|ser| f(date, ser)),
        }
    }

    fn write_data(&mut self, bytes: &[u8]) -> Result<()> {
        let options = self.options;
        match options.data_strategy() {
            DataEncodingStrategy::Base64 => self.write_string(&STANDARD.encode(bytes)),
            DataEncodingStrategy::Raw => self.raw.add_binary(bytes).map_err(Error::encoder),
            DataEncodingStrategy::Custom(f) => self.write_custom(|ser| f(bytes, ser)),
        }
    }

    /// Opens the single-entry object holding an enum variant's payload.
    #[inline]
    fn begin_variant(&mut self, variant: &str) -> Result<()> {
        self.raw.begin_object().map_err(Error::encoder)?;
        self.write_string(variant)
    }
}

impl<'a, 'o> ser::Serializer for &'a mut Serializer<'o> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Compound<'a, 'o>;
    type SerializeTuple = Compound<'a, 'o>;
    type SerializeTupleStruct = Compound<'a, 'o>;
    type SerializeTupleVariant = Compound<'a, 'o>;
    type SerializeMap = Compound<'a, 'o>;
    type SerializeStruct = StructCompound<'a, 'o>;
    type SerializeStructVariant = Compound<'a, 'o>;

    #[inline]
    fn serialize_bool(self, v: bool) -> Result<()> {
        self.raw.add_boolean(v).map_err(Error::encoder)
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<()> {
        self.write_signed(v.into())
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<()> {
        self.write_signed(v.into())
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<()> {
        self.write_signed(v.into())
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_signed(v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        if let Ok(v) = i64::try_from(v) {
            self.write_signed(v)
        } else if let Ok(v) = u64::try_from(v) {
            self.write_unsigned(v)
        } else {
            Err(Error::data_corrupted(format_args!("integer {} does not fit in 64 bits", v)))
        }
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<()> {
        self.write_unsigned(v.into())
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<()> {
        self.write_unsigned(v.into())
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<()> {
        self.write_unsigned(v.into())
    }

    #[inline]
    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_unsigned(v)
    }

    #[inline]
    fn serialize_u128(self, v: u128) -> Result<()> {
        let v = u64::try_from(v)
            .map_err(|_| Error::data_corrupted(format_args!("integer {} does not fit in 64 bits", v)))?;
        self.write_unsigned(v)
    }

    #[inline]
    fn serialize_f32(self, v: f32) -> Result<()> {
        self.write_float(v.into())
    }

    #[inline]
    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write_float(v)
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_string(v.encode_utf8(&mut buf))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_string(v)
    }

    #[inline]
    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.write_data(v)
    }

    #[inline]
    fn serialize_none(self) -> Result<()> {
        self.write_null()
    }

    #[inline]
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<()> {
        self.write_null()
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.write_null()
    }

    #[inline]
    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<()> {
        self.write_string(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, name: &'static str, value: &T) -> Result<()> {
        match name {
            BIG_NUMBER_TOKEN => match value.serialize(ScalarSerializer)? {
                Value::String(text) => {
                    let number = text
                        .parse::<BigNumber>()
                        .map_err(|e| Error::data_corrupted(format_args!("{}: {:?}", e, text)))?;
                    self.write_big_number(number)
                }
                other => Err(Error::type_mismatch(DataType::String, other.data_type())),
            },
            RAW_BINARY_TOKEN => match value.serialize(ScalarSerializer)? {
                Value::Binary(bytes) => self.raw.add_binary(&bytes).map_err(Error::encoder),
                other => Err(Error::type_mismatch(DataType::Binary, other.data_type())),
            },
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.begin_variant(variant)?;
        value.serialize(&mut *self).map_err(|e| e.prepend(variant))?;
        self.raw.end_container().map_err(Error::encoder)
    }

    #[inline]
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(Compound::new(self, ContainerKind::Unkeyed, None))
    }

    #[inline]
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(Compound::new(self, ContainerKind::Unkeyed, None))
    }

    #[inline]
    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
        Ok(Compound::new(self, ContainerKind::Unkeyed, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.begin_variant(variant)?;
        Ok(Compound::new(self, ContainerKind::Unkeyed, Some(variant)))
    }

    #[inline]
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(Compound::new(self, ContainerKind::Keyed, None))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        match name {
            SYSTEM_TIME_STRUCT if len == 2 => Ok(StructCompound::Date {
                ser: self,
                secs: None,
                nanos: None,
            }),
            JSON_NUMBER_TOKEN => Ok(StructCompound::Number { ser: self }),
            _ => Ok(StructCompound::Container(Compound::new(self, ContainerKind::Keyed, None))),
        }
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.begin_variant(variant)?;
        Ok(Compound::new(self, ContainerKind::Keyed, Some(variant)))
    }
}

/// One container scope: elements of a sequence, or key/value pairs of a map or struct.
pub struct Compound<'a, 'o> {
    ser: &'a mut Serializer<'o>,
    tracking: Tracking,
    /// Set when the container is the payload of an enum variant's single-entry object.
    variant: Option<&'static str>,
    index: usize,
    key: Option<String>,
}

impl<'a, 'o> Compound<'a, 'o> {
    #[inline]
    fn new(ser: &'a mut Serializer<'o>, kind: ContainerKind, variant: Option<&'static str>) -> Self {
        Self {
            ser,
            tracking: Tracking::requested(kind),
            variant,
            index: 0,
            key: None,
        }
    }

    #[inline]
    fn scoped(&self, e: Error) -> Error {
        match self.variant {
            Some(variant) => e.prepend(variant),
            None => e,
        }
    }

    fn write_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.tracking.ensure_started(&mut self.ser.raw).map_err(Error::encoder)?;
        let index = self.index;
        value
            .serialize(&mut *self.ser)
            .map_err(|e| self.scoped(e.prepend(index)))?;
        self.index += 1;
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<()> {
        self.tracking.ensure_started(&mut self.ser.raw).map_err(Error::encoder)?;
        self.ser.write_string(key)
    }

    fn write_value<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        value
            .serialize(&mut *self.ser)
            .map_err(|e| self.scoped(e.prepend(key)))
    }

    fn finish(mut self) -> Result<()> {
        self.tracking.close(&mut self.ser.raw).map_err(Error::encoder)?;
        if self.variant.is_some() {
            self.ser.raw.end_container().map_err(Error::encoder)?;
        }
        Ok(())
    }
}

impl<'a, 'o> ser::SerializeSeq for Compound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write_element(value)
    }

    #[inline]
    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, 'o> ser::SerializeTuple for Compound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write_element(value)
    }

    #[inline]
    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, 'o> ser::SerializeTupleStruct for Compound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write_element(value)
    }

    #[inline]
    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, 'o> ser::SerializeTupleVariant for Compound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.write_element(value)
    }

    #[inline]
    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, 'o> ser::SerializeMap for Compound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        let key = key_to_string(key.serialize(ScalarSerializer)?).map_err(|e| self.scoped(e))?;
        self.write_key(&key)?;
        self.key = Some(key);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self.key.take().unwrap_or_default();
        self.write_value(&key, value)
    }

    #[inline]
    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a, 'o> ser::SerializeStructVariant for Compound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    #[inline]
    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.write_key(key)?;
        self.write_value(key, value)
    }

    #[inline]
    fn end(self) -> Result<()> {
        self.finish()
    }
}

/// Struct scopes, with the two foreign structs that stand for scalars.
pub enum StructCompound<'a, 'o> {
    Container(Compound<'a, 'o>),
    Date {
        ser: &'a mut Serializer<'o>,
        secs: Option<u64>,
        nanos: Option<u32>,
    },
    Number {
        ser: &'a mut Serializer<'o>,
    },
}

impl<'a, 'o> ser::SerializeStruct for StructCompound<'a, 'o> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        match self {
            StructCompound::Container(compound) => {
                compound.write_key(key)?;
                compound.write_value(key, value)
            }
            StructCompound::Date { secs, nanos, .. } => {
                let field = match value.serialize(ScalarSerializer)? {
                    Value::Unsigned(v) => v,
                    other => {
                        return Err(Error::type_mismatch(DataType::Unsigned, other.data_type()).prepend(key));
                    }
                };
                match key {
                    SECS_FIELD => *secs = Some(field),
                    NANOS_FIELD => {
                        let field = u32::try_from(field)
                            .map_err(|_| Error::data_corrupted("nanoseconds out of range").prepend(key))?;
                        *nanos = Some(field);
                    }
                    _ => return Err(Error::data_corrupted(format_args!("unexpected date field {:?}", key))),
                }
                Ok(())
            }
            StructCompound::Number { ser } => match value.serialize(ScalarSerializer)? {
                Value::String(text) => ser.write_number_text(&text),
                other => Err(Error::type_mismatch(DataType::String, other.data_type())),
            },
        }
    }

    fn end(self) -> Result<()> {
        match self {
            StructCompound::Container(compound) => compound.finish(),
            StructCompound::Date { ser, secs, nanos } => {
                let secs = secs.ok_or_else(|| Error::key_not_found(SECS_FIELD))?;
                let nanos = nanos.ok_or_else(|| Error::key_not_found(NANOS_FIELD))?;
                let date = UNIX_EPOCH
                    .checked_add(Duration::new(secs, nanos))
                    .ok_or_else(|| Error::data_corrupted("date out of range"))?;
                ser.write_date(date)
            }
            StructCompound::Number { .. } => Ok(()),
        }
    }
}
