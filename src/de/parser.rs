//! Rebuilds a [`Value`] tree from engine events.

use crate::engine::EventVisitor;
use crate::error::{Error, Result};
use crate::Value;
use log::{trace, warn};

/// Accumulator of a container whose end event has not arrived yet.
#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object {
        pairs: Vec<(String, Value)>,
        pending_key: Option<String>,
    },
}

/// Event visitor holding an explicit stack of open containers.
///
/// Objects alternate between expecting a key and expecting the value for the pending key.
/// The flag only describes the top frame and is recomputed whenever the top changes.
#[derive(Debug, Default)]
pub(crate) struct EventParser {
    stack: Vec<Frame>,
    expecting_key: bool,
    chunks: Vec<u8>,
    root: Option<Value>,
}

impl EventParser {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Consumes the parser, yielding the root value.
    pub(crate) fn finish(self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(Error::data_corrupted(format_args!(
                "{} container(s) not terminated",
                self.stack.len()
            )));
        }
        if !self.chunks.is_empty() {
            return Err(Error::data_corrupted("string chunks not terminated"));
        }
        self.root.ok_or_else(|| Error::data_corrupted("no value decoded"))
    }

    fn add_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { pairs, pending_key }) => {
                if self.expecting_key {
                    match value {
                        Value::String(key) => {
                            *pending_key = Some(key);
                            self.expecting_key = false;
                        }
                        other => warn!("dropping object key of type {}, keys must be strings", other.data_type()),
                    }
                } else if let Some(key) = pending_key.take() {
                    pairs.push((key, value));
                    self.expecting_key = true;
                }
            }
        }
    }

    #[inline]
    fn begin(&mut self, frame: Frame) {
        trace!("begin container at depth {}", self.stack.len());
        self.expecting_key = matches!(frame, Frame::Object { .. });
        self.stack.push(frame);
    }
}

impl EventVisitor for EventParser {
    type Error = Error;

    #[inline]
    fn on_begin_array(&mut self) -> Result<()> {
        self.begin(Frame::Array(Vec::new()));
        Ok(())
    }

    #[inline]
    fn on_begin_object(&mut self) -> Result<()> {
        self.begin(Frame::Object {
            pairs: Vec::new(),
            pending_key: None,
        });
        Ok(())
    }

    fn on_end_container(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::data_corrupted("unbalanced containers"))?;
        trace!("end container at depth {}", self.stack.len());

        let value = match frame {
            Frame::Array(items) => Value::Array(items),
            Frame::Object { pending_key: Some(key), .. } => {
                return Err(Error::data_corrupted(format_args!("object key {:?} has no value", key)));
            }
            Frame::Object { pairs, .. } => Value::Object(pairs),
        };
        self.expecting_key = matches!(self.stack.last(), Some(Frame::Object { pending_key: None, .. }));
        self.add_value(value);
        Ok(())
    }

    #[inline]
    fn on_null(&mut self) -> Result<()> {
        self.add_value(Value::Null);
        Ok(())
    }

    #[inline]
    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.add_value(Value::Bool(value));
        Ok(())
    }

    #[inline]
    fn on_signed_integer(&mut self, value: i64) -> Result<()> {
        self.add_value(Value::Signed(value));
        Ok(())
    }

    #[inline]
    fn on_unsigned_integer(&mut self, value: u64) -> Result<()> {
        self.add_value(Value::Unsigned(value));
        Ok(())
    }

    #[inline]
    fn on_float(&mut self, value: f64) -> Result<()> {
        self.add_value(Value::Float(value));
        Ok(())
    }

    #[inline]
    fn on_big_number(&mut self, significand: u64, exponent: i32, negative: bool) -> Result<()> {
        self.add_value(Value::BigNumber(crate::BigNumber::new(significand, exponent, negative)));
        Ok(())
    }

    #[inline]
    fn on_string(&mut self, value: &str) -> Result<()> {
        self.add_value(Value::String(value.to_string()));
        Ok(())
    }

    fn on_string_chunk(&mut self, part: &[u8], is_last: bool) -> Result<()> {
        self.chunks.extend_from_slice(part);
        if is_last {
            let bytes = std::mem::take(&mut self.chunks);
            let value = String::from_utf8(bytes)
                .map_err(|e| Error::data_corrupted(format_args!("invalid utf-8 string: {}", e)))?;
            self.add_value(Value::String(value));
        }
        Ok(())
    }

    #[inline]
    fn on_binary(&mut self, bytes: &[u8]) -> Result<()> {
        self.add_value(Value::Binary(bytes.to_vec()));
        Ok(())
    }

    #[inline]
    fn on_end_data(&mut self) -> Result<()> {
        Ok(())
    }
}
