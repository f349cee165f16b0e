//! Formatter.

use crate::{BigNumber, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
pub use pretty::PrettyFormatter;
use std::fmt;

mod pretty;

/// Writes a [`Value`] as JSON text. The `begin_*`/`end_*` hooks decide the layout.
pub trait Formatter {
    #[inline]
    fn format<W: fmt::Write>(&mut self, value: &Value, writer: &mut W) -> fmt::Result {
        self.write_value(value, writer)
    }

    fn write_value<W: fmt::Write>(&mut self, value: &Value, writer: &mut W) -> fmt::Result {
        match value {
            Value::Null => self.write_null(writer),
            Value::Bool(v) => self.write_bool(*v, writer),
            Value::Signed(v) => write!(writer, "{}", v),
            Value::Unsigned(v) => write!(writer, "{}", v),
            Value::Float(v) => self.write_float(*v, writer),
            Value::BigNumber(v) => self.write_big_number(v, writer),
            Value::String(v) => self.write_string(v, writer),
            Value::Binary(v) => self.write_string(&STANDARD.encode(v), writer),
            Value::Array(items) => self.write_array(items, writer),
            Value::Object(pairs) => self.write_object(pairs, writer),
        }
    }

    #[inline]
    fn write_null<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str("null")
    }

    #[inline]
    fn write_bool<W: fmt::Write>(&mut self, value: bool, writer: &mut W) -> fmt::Result {
        writer.write_str(if value { "true" } else { "false" })
    }

    /// Non-finite floats have no JSON form and are written as `null`.
    #[inline]
    fn write_float<W: fmt::Write>(&mut self, value: f64, writer: &mut W) -> fmt::Result {
        if value.is_finite() {
            write!(writer, "{}", value)
        } else {
            self.write_null(writer)
        }
    }

    #[inline]
    fn write_big_number<W: fmt::Write>(&mut self, value: &BigNumber, writer: &mut W) -> fmt::Result {
        write!(writer, "{}", value)
    }

    #[inline]
    fn write_string<W: fmt::Write>(&mut self, value: &str, writer: &mut W) -> fmt::Result {
        writer.write_str("\"")?;
        format_escaped_str(value, writer)?;
        writer.write_str("\"")
    }

    fn write_object<W: fmt::Write>(&mut self, pairs: &[(String, Value)], writer: &mut W) -> fmt::Result {
        self.begin_object(writer)?;
        for (i, (key, value)) in pairs.iter().enumerate() {
            self.write_object_value(key, value, i == 0, writer)?;
        }
        self.end_object(writer)
    }

    #[inline]
    fn write_object_value<W: fmt::Write>(
        &mut self,
        key: &str,
        value: &Value,
        first: bool,
        writer: &mut W,
    ) -> fmt::Result {
        self.begin_object_key(first, writer)?;
        self.write_string(key, writer)?;
        self.begin_object_value(writer)?;
        self.write_value(value, writer)?;
        self.end_object_value(writer)
    }

    fn write_array<W: fmt::Write>(&mut self, items: &[Value], writer: &mut W) -> fmt::Result {
        self.begin_array(writer)?;
        for (i, value) in items.iter().enumerate() {
            self.begin_array_value(i == 0, writer)?;
            self.write_value(value, writer)?;
            self.end_array_value(writer)?;
        }
        self.end_array(writer)
    }

    #[inline]
    fn begin_array<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str("[")
    }

    #[inline]
    fn end_array<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str("]")
    }

    #[inline]
    fn begin_array_value<W: fmt::Write>(&mut self, first: bool, writer: &mut W) -> fmt::Result {
        if !first {
            writer.write_str(",")?;
        }
        Ok(())
    }

    #[inline]
    fn end_array_value<W: fmt::Write>(&mut self, _writer: &mut W) -> fmt::Result {
        Ok(())
    }

    #[inline]
    fn begin_object<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str("{")
    }

    #[inline]
    fn end_object<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str("}")
    }

    #[inline]
    fn begin_object_key<W: fmt::Write>(&mut self, first: bool, writer: &mut W) -> fmt::Result {
        if !first {
            writer.write_str(",")?;
        }
        Ok(())
    }

    #[inline]
    fn begin_object_value<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str(":")
    }

    #[inline]
    fn end_object_value<W: fmt::Write>(&mut self, _writer: &mut W) -> fmt::Result {
        Ok(())
    }
}

pub struct CompactFormatter;

impl CompactFormatter {
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Formatter for CompactFormatter {}

/// Formats a value when displayed, compact or pretty.
pub struct LazyFormat<'a> {
    value: &'a Value,
    pretty: bool,
}

impl<'a> LazyFormat<'a> {
    #[inline]
    pub const fn new(value: &'a Value, pretty: bool) -> Self {
        Self { value, pretty }
    }
}

impl fmt::Display for LazyFormat<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pretty {
            PrettyFormatter::new().format(self.value, f)
        } else {
            CompactFormatter::new().format(self.value, f)
        }
    }
}

impl Value {
    /// Formats the value as JSON text. Binary is written as Base64 text and non-finite floats
    /// as `null`.
    #[inline]
    pub const fn format(&self, pretty: bool) -> LazyFormat<'_> {
        LazyFormat::new(self, pretty)
    }
}

impl fmt::Display for Value {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        CompactFormatter::new().format(self, f)
    }
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const UU: u8 = b'u'; // \x00...\x1F except the ones noted above
const __: u8 = 0;

// Lookup table of escape sequences. A value of b'x' at index i means that byte
// i is escaped as "\x" in JSON. A value of 0 means that byte i is not escaped.
static ESCAPE: [u8; 256] = [
    //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, BB, TT, NN, UU, FF, RR, UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    __, __, QU, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 3
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
    __, __, __, __, __, __, __, __, __, __, __, __, BS, __, __, __, // 5
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
];

#[inline]
fn format_escaped_str<W: fmt::Write>(value: &str, writer: &mut W) -> fmt::Result {
    let bytes = value.as_bytes();

    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let escape = ESCAPE[byte as usize];
        if escape == __ {
            continue;
        }

        // Escaped bytes are ASCII, so `start` and `i` are always character boundaries.
        if start < i {
            writer.write_str(&value[start..i])?;
        }
        match escape {
            UU => write!(writer, "\\u{:04x}", byte)?,
            _ => {
                writer.write_char('\\')?;
                writer.write_char(escape as char)?;
            }
        }
        start = i + 1;
    }

    if start != bytes.len() {
        writer.write_str(&value[start..])?;
    }

    Ok(())
}
