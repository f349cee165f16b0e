//! PrettyFormatter

use crate::format::Formatter;
use crate::Value;
use std::fmt;

struct PrettyOptions<'a> {
    indent: usize,
    newline_in_empty: bool,
    newline_in_nested: bool,
    kv_delimiter: &'a str,
}

impl<'a> PrettyOptions<'a> {
    #[inline]
    const fn new(indent: usize, newline_in_empty: bool, newline_in_nested: bool, kv_delimiter: &'a str) -> Self {
        Self {
            indent,
            newline_in_empty,
            newline_in_nested,
            kv_delimiter,
        }
    }
}

/// Multi-line layout: one member per line, nested containers start on their own line.
pub struct PrettyFormatter<'a> {
    options: PrettyOptions<'a>,
    cur_indent_level: usize,
    has_value: bool,
}

impl<'a> PrettyFormatter<'a> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            options: PrettyOptions::new(2, false, true, " : "),
            cur_indent_level: 0,
            has_value: false,
        }
    }
}

impl Formatter for PrettyFormatter<'_> {
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

        let nested = match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(pairs) => !pairs.is_empty(),
            _ => false,
        };
        if nested && self.options.newline_in_nested {
            writer.write_str("\n")?;
            indent(self.cur_indent_level, self.options.indent, writer)?;
        }

        self.write_value(value, writer)?;
        self.end_object_value(writer)
    }

    #[inline]
    fn begin_array<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        self.cur_indent_level += 1;
        self.has_value = false;
        writer.write_str("[")
    }

    #[inline]
    fn end_array<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        self.cur_indent_level -= 1;
        if self.options.newline_in_empty || self.has_value {
            writer.write_str("\n")?;
            indent(self.cur_indent_level, self.options.indent, writer)?;
        }
        self.has_value = true;
        writer.write_str("]")
    }

    #[inline]
    fn begin_array_value<W: fmt::Write>(&mut self, first: bool, writer: &mut W) -> fmt::Result {
        writer.write_str(if first { "\n" } else { ",\n" })?;
        indent(self.cur_indent_level, self.options.indent, writer)
    }

    #[inline]
    fn end_array_value<W: fmt::Write>(&mut self, _writer: &mut W) -> fmt::Result {
        self.has_value = true;
        Ok(())
    }

    #[inline]
    fn begin_object<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        self.cur_indent_level += 1;
        self.has_value = false;
        writer.write_str("{")
    }

    #[inline]
    fn end_object<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        self.cur_indent_level -= 1;
        if self.options.newline_in_empty || self.has_value {
            writer.write_str("\n")?;
            indent(self.cur_indent_level, self.options.indent, writer)?;
        }
        self.has_value = true;
        writer.write_str("}")
    }

    #[inline]
    fn begin_object_key<W: fmt::Write>(&mut self, first: bool, writer: &mut W) -> fmt::Result {
        writer.write_str(if first { "\n" } else { ",\n" })?;
        indent(self.cur_indent_level, self.options.indent, writer)
    }

    #[inline]
    fn begin_object_value<W: fmt::Write>(&mut self, writer: &mut W) -> fmt::Result {
        writer.write_str(self.options.kv_delimiter)
    }

    #[inline]
    fn end_object_value<W: fmt::Write>(&mut self, _writer: &mut W) -> fmt::Result {
        self.has_value = true;
        Ok(())
    }
}

#[inline]
fn indent<W: fmt::Write>(level: usize, indent: usize, writer: &mut W) -> fmt::Result {
    for _ in 0..level * indent {
        writer.write_char(' ')?;
    }
    Ok(())
}
