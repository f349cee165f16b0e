//! Error kind and error path tests

use bjson::{from_slice, to_vec, Encoder, ErrorKind, PathSegment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn key(k: &str) -> PathSegment {
    PathSegment::Key(k.to_string())
}

fn index(i: usize) -> PathSegment {
    PathSegment::Index(i)
}

fn assert_corrupted(kind: &ErrorKind) {
    assert!(matches!(kind, ErrorKind::DataCorrupted(_)), "{:?}", kind);
}

#[derive(Serialize)]
struct NameOnly {
    name: String,
}

#[derive(Deserialize, Debug)]
struct Person {
    #[allow(dead_code)]
    name: String,
    #[allow(dead_code)]
    age: u8,
}

#[test]
fn test_missing_field() {
    let bytes = to_vec(&NameOnly {
        name: "Ann".to_string(),
    })
    .unwrap();
    let err = from_slice::<Person>(&bytes).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::KeyNotFound { key: "age".to_string() });
    assert_eq!(err.path(), &[key("age")]);
}

#[test]
fn test_nested_paths() {
    #[derive(Serialize)]
    struct Source {
        groups: Vec<BTreeMap<String, Vec<u32>>>,
    }

    #[derive(Deserialize, Debug)]
    struct Target {
        #[allow(dead_code)]
        groups: Vec<BTreeMap<String, Vec<u8>>>,
    }

    let mut fine = BTreeMap::new();
    fine.insert("a".to_string(), vec![1, 2]);
    let mut broken = BTreeMap::new();
    broken.insert("b".to_string(), vec![3, 4, 300]);
    let bytes = to_vec(&Source {
        groups: vec![fine, broken],
    })
    .unwrap();

    let err = from_slice::<Target>(&bytes).unwrap_err();
    assert_corrupted(err.kind());
    assert_eq!(err.path(), &[key("groups"), index(1), key("b"), index(2)]);

    #[derive(Serialize)]
    struct Outer {
        inner: NameOnly,
    }

    #[derive(Deserialize, Debug)]
    struct OuterTarget {
        #[allow(dead_code)]
        inner: Person,
    }

    let bytes = to_vec(&Outer {
        inner: NameOnly {
            name: "Ann".to_string(),
        },
    })
    .unwrap();
    let err = from_slice::<OuterTarget>(&bytes).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::KeyNotFound { key: "age".to_string() });
    assert_eq!(err.path(), &[key("inner"), key("age")]);
}

#[test]
fn test_type_mismatch() {
    let bytes = to_vec(&"forty").unwrap();
    let err = from_slice::<u8>(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    assert!(err.path().is_empty());

    let bytes = to_vec(&vec![1u8]).unwrap();
    let err = from_slice::<Person>(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));

    let bytes = to_vec(&42u8).unwrap();
    assert!(matches!(
        from_slice::<String>(&bytes).unwrap_err().kind(),
        ErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        from_slice::<bool>(&bytes).unwrap_err().kind(),
        ErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_null_is_not_found() {
    #[derive(Serialize)]
    struct Source {
        age: Option<u8>,
    }

    #[derive(Deserialize, Debug)]
    struct Target {
        #[allow(dead_code)]
        age: u8,
    }

    let bytes = to_vec(&Source { age: None }).unwrap();
    let err = from_slice::<Target>(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ValueNotFound { .. }));
    assert_eq!(err.path(), &[key("age")]);
}

#[test]
fn test_short_sequence() {
    let bytes = to_vec(&vec![1u8, 2]).unwrap();
    let err = from_slice::<(u8, u8, u8)>(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ValueNotFound { .. }));
}

#[test]
fn test_inexact_numbers() {
    let bytes = to_vec(&vec![1i64, -1]).unwrap();
    let err = from_slice::<Vec<u64>>(&bytes).unwrap_err();
    assert_corrupted(err.kind());
    assert_eq!(err.path(), &[index(1)]);

    let bytes = to_vec(&2.5f64).unwrap();
    assert_corrupted(from_slice::<i32>(&bytes).unwrap_err().kind());

    let err = to_vec(&(u64::MAX as u128 + 1)).unwrap_err();
    assert_corrupted(err.kind());
    let err = to_vec(&i128::MIN).unwrap_err();
    assert_corrupted(err.kind());
}

#[test]
fn test_encode_paths() {
    #[derive(Serialize)]
    struct Sensor {
        name: String,
        readings: Vec<f64>,
    }

    #[derive(Serialize)]
    enum Reading {
        Level(f64),
    }

    let sensor = Sensor {
        name: "probe".to_string(),
        readings: vec![1.0, 2.0, f64::NAN],
    };
    let err = to_vec(&sensor).unwrap_err();
    assert_corrupted(err.kind());
    assert_eq!(err.path(), &[key("readings"), index(2)]);

    let err = to_vec(&vec![Reading::Level(f64::INFINITY)]).unwrap_err();
    assert_corrupted(err.kind());
    assert_eq!(err.path(), &[index(0), key("Level")]);

    let mut map = BTreeMap::new();
    map.insert(vec![1u8], 1u8);
    let err = to_vec(&map).unwrap_err();
    assert_corrupted(err.kind());
}

#[test]
fn test_url() {
    #[derive(Deserialize, Debug)]
    struct Link {
        #[allow(dead_code)]
        href: url::Url,
    }

    let mut map = BTreeMap::new();
    map.insert("href", "not a url");
    let bytes = to_vec(&map).unwrap();
    let err = from_slice::<Link>(&bytes).unwrap_err();
    assert_corrupted(err.kind());
    assert_eq!(err.path(), &[key("href")]);
}

#[test]
fn test_malformed_bytes() {
    assert!(matches!(from_slice::<u8>(&[]).unwrap_err().kind(), ErrorKind::Decoder(_)));
    assert!(matches!(from_slice::<u8>(&[200, 0]).unwrap_err().kind(), ErrorKind::Decoder(_)));

    let mut bytes = to_vec(&1u8).unwrap();
    bytes.push(0);
    assert_corrupted(from_slice::<u8>(&bytes).unwrap_err().kind());

    let bytes = to_vec(&vec![1u8, 2]).unwrap();
    assert!(from_slice::<Vec<u8>>(&bytes[..bytes.len() - 1]).is_err());
}

#[test]
fn test_error_display() {
    let bytes = to_vec(&NameOnly {
        name: "Ann".to_string(),
    })
    .unwrap();
    let err = from_slice::<Person>(&bytes).unwrap_err();
    assert_eq!(err.to_string(), r#"no value associated with key "age" at path ["age"]"#);

    let err = Encoder::new().encode(&f64::NAN).unwrap_err();
    assert!(err.to_string().starts_with("data corrupted"));
}
