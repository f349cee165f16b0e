//! Engine and wire layout tests

use bjson::engine::{decode, EngineError, EventVisitor, RawEncoder};
use bjson::{decode_value, BigNumber, ErrorKind, Value};

/// Records every event as text.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Recorder {
    fn push(&mut self, event: String) -> Result<(), EngineError> {
        self.events.push(event);
        Ok(())
    }
}

impl EventVisitor for Recorder {
    type Error = EngineError;

    fn on_begin_array(&mut self) -> Result<(), EngineError> {
        self.push("[".to_string())
    }

    fn on_begin_object(&mut self) -> Result<(), EngineError> {
        self.push("{".to_string())
    }

    fn on_end_container(&mut self) -> Result<(), EngineError> {
        self.push("end".to_string())
    }

    fn on_null(&mut self) -> Result<(), EngineError> {
        self.push("null".to_string())
    }

    fn on_boolean(&mut self, value: bool) -> Result<(), EngineError> {
        self.push(value.to_string())
    }

    fn on_signed_integer(&mut self, value: i64) -> Result<(), EngineError> {
        self.push(format!("i{}", value))
    }

    fn on_unsigned_integer(&mut self, value: u64) -> Result<(), EngineError> {
        self.push(format!("u{}", value))
    }

    fn on_float(&mut self, value: f64) -> Result<(), EngineError> {
        self.push(format!("f{}", value))
    }

    fn on_big_number(&mut self, significand: u64, exponent: i32, negative: bool) -> Result<(), EngineError> {
        self.push(format!("n{}{}e{}", if negative { "-" } else { "" }, significand, exponent))
    }

    fn on_string(&mut self, value: &str) -> Result<(), EngineError> {
        self.push(format!("s{}", value))
    }

    fn on_string_chunk(&mut self, part: &[u8], is_last: bool) -> Result<(), EngineError> {
        self.push(format!("c{}:{}", part.len(), is_last))
    }

    fn on_binary(&mut self, bytes: &[u8]) -> Result<(), EngineError> {
        self.push(format!("b{:?}", bytes))
    }

    fn on_end_data(&mut self) -> Result<(), EngineError> {
        self.push("eod".to_string())
    }
}

fn record(bytes: &[u8]) -> Vec<String> {
    let mut recorder = Recorder::default();
    let consumed = decode(bytes, &mut recorder).unwrap();
    assert_eq!(consumed, bytes.len());
    recorder.events
}

fn assert_corrupted(bytes: &[u8]) {
    let err = decode_value(bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DataCorrupted(_)), "{:?}: {}", bytes, err);
}

fn assert_decoder_error(bytes: &[u8]) {
    let err = decode_value(bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Decoder(_)), "{:?}: {}", bytes, err);
}

#[test]
fn test_raw_encoder() {
    let mut encoder = RawEncoder::try_new().unwrap();
    encoder.begin_object().unwrap();
    encoder.add_string("k").unwrap();
    encoder.begin_array().unwrap();
    encoder.add_signed_integer(-1).unwrap();
    encoder.add_unsigned_integer(300).unwrap();
    encoder.add_float(0.5).unwrap();
    encoder.add_big_number(5, -2, true).unwrap();
    encoder.add_boolean(true).unwrap();
    encoder.add_null().unwrap();
    encoder.add_binary(&[7, 8]).unwrap();
    encoder.end_container().unwrap();
    encoder.end_container().unwrap();
    let bytes = encoder.end_encode().unwrap();

    assert_eq!(
        record(&bytes),
        vec!["{", "sk", "[", "i-1", "u300", "f0.5", "n-5e-2", "true", "null", "b[7, 8]", "end", "end", "eod"]
    );
}

#[test]
fn test_raw_encoder_status() {
    let mut encoder = RawEncoder::try_new().unwrap();
    assert!(encoder.end_container().is_err());

    let mut encoder = RawEncoder::try_new().unwrap();
    encoder.add_null().unwrap();
    assert!(encoder.add_null().is_err());

    let mut encoder = RawEncoder::try_new().unwrap();
    encoder.begin_array().unwrap();
    assert!(encoder.end_encode().is_err());

    let encoder = RawEncoder::try_new().unwrap();
    assert!(encoder.end_encode().is_err());
}

#[test]
fn test_wire_scalars() {
    assert_eq!(decode_value(&[4, 0]).unwrap(), Value::Null);
    assert_eq!(decode_value(&[5, 0]).unwrap(), Value::Bool(false));
    assert_eq!(decode_value(&[6, 0]).unwrap(), Value::Bool(true));
    assert_eq!(decode_value(&[7, 1, 0]).unwrap(), Value::Signed(-1));
    assert_eq!(decode_value(&[7, 2, 0]).unwrap(), Value::Signed(1));
    assert_eq!(
        decode_value(&[8, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0]).unwrap(),
        Value::Unsigned(u64::MAX)
    );

    let mut float = vec![9];
    float.extend_from_slice(&1.5f64.to_le_bytes());
    float.push(0);
    assert_eq!(decode_value(&float).unwrap(), Value::Float(1.5));

    assert_eq!(
        decode_value(&[10, 1, 5, 3, 0]).unwrap(),
        Value::BigNumber(BigNumber::new(5, -2, true))
    );
    assert_eq!(decode_value(&[11, 2, b'h', b'i', 0]).unwrap(), Value::String("hi".to_string()));
    assert_eq!(decode_value(&[13, 2, 1, 2, 0]).unwrap(), Value::Binary(vec![1, 2]));
}

#[test]
fn test_wire_chunks() {
    assert_eq!(
        decode_value(&[12, 0, 2, b'a', b'b', 12, 1, 1, b'c', 0]).unwrap(),
        Value::String("abc".to_string())
    );
    // A character split across chunks.
    assert_eq!(
        decode_value(&[12, 0, 1, 0xE6, 12, 1, 2, 0xB5, 0x8B, 0]).unwrap(),
        Value::String("测".to_string())
    );
    assert_corrupted(&[12, 1, 1, 0xFF, 0]);
    assert_corrupted(&[12, 0, 1, b'a', 0]);
}

#[test]
fn test_wire_containers() {
    assert_eq!(decode_value(&[2, 3, 0]).unwrap(), Value::Array(vec![]));
    assert_eq!(decode_value(&[1, 3, 0]).unwrap(), Value::Object(vec![]));
    assert_eq!(
        decode_value(&[1, 11, 1, b'a', 2, 4, 3, 11, 1, b'a', 5, 3, 0]).unwrap(),
        Value::Object(vec![
            ("a".to_string(), Value::Array(vec![Value::Null])),
            ("a".to_string(), Value::Bool(false)),
        ])
    );

    // Keys that are not strings are dropped, the next string becomes the key.
    assert_eq!(
        decode_value(&[1, 7, 2, 11, 1, b'a', 4, 3, 0]).unwrap(),
        Value::Object(vec![("a".to_string(), Value::Null)])
    );
    assert_eq!(
        decode_value(&[1, 2, 3, 11, 1, b'b', 6, 3, 0]).unwrap(),
        Value::Object(vec![("b".to_string(), Value::Bool(true))])
    );
}

#[test]
fn test_wire_errors() {
    assert_corrupted(&[0]);
    assert_corrupted(&[3, 0]);
    assert_corrupted(&[2, 4, 0]);
    assert_corrupted(&[1, 11, 1, b'k', 3, 0]);
    assert_corrupted(&[4, 0, 4]);

    assert_decoder_error(&[]);
    assert_decoder_error(&[2, 4]);
    assert_decoder_error(&[14, 0]);
    assert_decoder_error(&[11, 5, b'a', 0]);
    assert_decoder_error(&[11, 1, 0xFF, 0]);
    assert_decoder_error(&[9, 0, 0, 0]);
    assert_decoder_error(&[8, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0]);
}

#[test]
fn test_nesting_limit() {
    let mut bytes = vec![2; 128];
    bytes.extend(vec![3; 128]);
    bytes.push(0);
    assert!(decode_value(&bytes).is_ok());

    let mut bytes = vec![2; 129];
    bytes.extend(vec![3; 129]);
    bytes.push(0);
    assert_decoder_error(&bytes);

    let mut value = Value::Null;
    for _ in 0..129 {
        value = Value::Array(vec![value]);
    }
    let err = bjson::to_vec(&value).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Encoder(_)));
}
