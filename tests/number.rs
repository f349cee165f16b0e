//! Arbitrary precision number tests

use bjson::{BigNumber, ErrorKind, Number, Value};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Price {
    #[serde(with = "bjson::number")]
    amount: Number,
}

fn price(s: &str) -> Price {
    Price {
        amount: Number::from_str(s).unwrap(),
    }
}

fn decode_amount(amount: Value) -> bjson::Result<Price> {
    let bytes = bjson::to_vec(&Value::Object(vec![("amount".to_string(), amount)])).unwrap();
    bjson::from_slice(&bytes)
}

#[test]
fn test_round_trip() {
    for input in ["0", "12.50", "-0.001", "123456789.987654321", "18446744073709551615"] {
        let bytes = bjson::to_vec(&price(input)).unwrap();
        assert_eq!(bjson::from_slice::<Price>(&bytes).unwrap(), price(input));
    }

    assert_eq!(
        bjson::to_value(&price("12.50")).unwrap().get("amount"),
        Some(&Value::BigNumber(BigNumber::new(125, -1, false)))
    );
}

#[test]
fn test_decode_sources() {
    assert_eq!(decode_amount(Value::Signed(-7)).unwrap(), price("-7"));
    assert_eq!(decode_amount(Value::Unsigned(u64::MAX)).unwrap(), price("18446744073709551615"));
    assert_eq!(decode_amount(Value::Float(0.25)).unwrap(), price("0.25"));
    assert_eq!(decode_amount(Value::String("3.14".to_string())).unwrap(), price("3.14"));
    assert_eq!(
        decode_amount(Value::BigNumber(BigNumber::new(5, 3, true))).unwrap(),
        price("-5000")
    );

    let err = decode_amount(Value::String("abc".to_string())).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DataCorrupted(_)));
    assert!(decode_amount(Value::Bool(true)).is_err());
}

#[test]
fn test_significand_too_wide() {
    let err = bjson::to_vec(&price("123456789012345678901234567890")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DataCorrupted(_)));
}

#[test]
fn test_serde_json() {
    let json = serde_json::to_string(&price("1.5")).unwrap();
    assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price("1.5"));

    assert_eq!(serde_json::from_str::<Price>(r#"{"amount": 1.25}"#).unwrap(), price("1.25"));
    assert_eq!(serde_json::from_str::<Price>(r#"{"amount": 42}"#).unwrap(), price("42"));
}
