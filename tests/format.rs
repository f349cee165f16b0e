//! Value format tests

use bjson::{BigNumber, Value};

fn assert_fmt(input: &Value, expected: &str, pretty: bool) {
    assert_eq!(format!("{}", input.format(pretty)), expected)
}

fn assert_compact_fmt(input: &Value, expected: &str) {
    assert_fmt(input, expected, false);
    assert_eq!(input.to_string(), expected);
}

fn assert_pretty_fmt(input: &Value, expected: &str) {
    assert_fmt(input, expected, true)
}

fn assert_scalar_fmt(input: Value, expected: &str) {
    assert_compact_fmt(&input, expected);
    assert_pretty_fmt(&input, expected);
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

#[test]
fn test_scalar_fmt() {
    // bool && null
    {
        assert_scalar_fmt(Value::Bool(true), "true");
        assert_scalar_fmt(Value::Bool(false), "false");
        assert_scalar_fmt(Value::Null, "null");
    }

    // string
    {
        assert_scalar_fmt(string(""), r#""""#);
        assert_scalar_fmt(string("abc"), r#""abc""#);
        assert_scalar_fmt(string("测试"), r#""测试""#);
        assert_scalar_fmt(string("ab\u{8}c"), r#""ab\bc""#);
        assert_scalar_fmt(string("ab\u{c}c"), r#""ab\fc""#);
        assert_scalar_fmt(string("ab\nc"), r#""ab\nc""#);
        assert_scalar_fmt(string("ab\rc"), r#""ab\rc""#);
        assert_scalar_fmt(string("ab\tc"), r#""ab\tc""#);
        assert_scalar_fmt(string("ab\"c"), r#""ab\"c""#);
        assert_scalar_fmt(string("ab\\c"), r#""ab\\c""#);
        assert_scalar_fmt(string("ab/c"), r#""ab/c""#);
        assert_scalar_fmt(string("\u{0}"), r#""\u0000""#);
        assert_scalar_fmt(string("\u{1}测"), r#""\u0001测""#);
        assert_scalar_fmt(string("\u{b}"), r#""\u000b""#);
        assert_scalar_fmt(string("\u{1f}"), r#""\u001f""#);
        assert_scalar_fmt(string("\u{7f}"), "\"\u{7f}\"");
    }

    // number
    {
        assert_scalar_fmt(Value::Signed(-42), "-42");
        assert_scalar_fmt(Value::Signed(i64::MIN), "-9223372036854775808");
        assert_scalar_fmt(Value::Unsigned(u64::MAX), "18446744073709551615");
        assert_scalar_fmt(Value::Float(1.5), "1.5");
        assert_scalar_fmt(Value::Float(-0.25), "-0.25");
        assert_scalar_fmt(Value::Float(3.0), "3");
        assert_scalar_fmt(Value::Float(f64::NAN), "null");
        assert_scalar_fmt(Value::Float(f64::INFINITY), "null");
        assert_scalar_fmt(Value::BigNumber(BigNumber::new(125, -2, true)), "-125e-2");
        assert_scalar_fmt(Value::BigNumber(BigNumber::new(7, 0, false)), "7");
    }

    // binary
    {
        assert_scalar_fmt(Value::Binary(vec![]), r#""""#);
        assert_scalar_fmt(Value::Binary(vec![0, 1, 2]), r#""AAEC""#);
    }
}

#[test]
fn test_container_fmt() {
    assert_scalar_fmt(Value::Array(vec![]), "[]");
    assert_scalar_fmt(Value::Object(vec![]), "{}");

    let value = Value::Object(vec![
        ("a".to_string(), Value::Signed(1)),
        ("b".to_string(), Value::Array(vec![Value::Bool(true), Value::Null])),
        ("a".to_string(), Value::Object(vec![])),
        (
            "c".to_string(),
            Value::Object(vec![("d".to_string(), string("e"))]),
        ),
    ]);
    assert_compact_fmt(&value, r#"{"a":1,"b":[true,null],"a":{},"c":{"d":"e"}}"#);
    assert_pretty_fmt(
        &value,
        "{\n  \"a\" : 1,\n  \"b\" : \n  [\n    true,\n    null\n  ],\n  \"a\" : {},\n  \"c\" : \n  {\n    \"d\" : \"e\"\n  }\n}",
    );

    let value = Value::Array(vec![
        Value::Array(vec![Value::Signed(1)]),
        Value::Array(vec![]),
        string("x"),
    ]);
    assert_compact_fmt(&value, r#"[[1],[],"x"]"#);
    assert_pretty_fmt(&value, "[\n  [\n    1\n  ],\n  [],\n  \"x\"\n]");
}

#[test]
fn test_escaped_key_fmt() {
    let value = Value::Object(vec![("a\"b\n".to_string(), Value::Null)]);
    assert_compact_fmt(&value, r#"{"a\"b\n":null}"#);
}

#[test]
fn test_fmt_is_json() {
    let input = r#"{"name":"Ann","scores":[1,2,-3],"meta":{"ok":true,"none":null}}"#;
    let value = Value::parse(input).unwrap();
    let compact = value.to_string();
    let pretty = value.format(true).to_string();
    let from_compact: serde_json::Value = serde_json::from_str(&compact).unwrap();
    let from_pretty: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    let expected: serde_json::Value = serde_json::from_str(input).unwrap();
    assert_eq!(from_compact, expected);
    assert_eq!(from_pretty, expected);
}
