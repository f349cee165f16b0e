//! bjson benchmark

use bencher::{benchmark_group, benchmark_main, black_box, Bencher};
use bjson::{DataEncodingStrategy, Decoder, Encoder, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize)]
struct Record {
    id: u64,
    name: String,
    score: f64,
    active: bool,
    parent: Option<u64>,
    tags: Vec<String>,
    attributes: BTreeMap<String, i32>,
    #[serde(with = "serde_bytes")]
    payload: Vec<u8>,
}

fn create_record(id: u64) -> Record {
    let mut attributes = BTreeMap::new();
    attributes.insert("width".to_string(), 640);
    attributes.insert("height".to_string(), -480);
    Record {
        id,
        name: format!("record-{}", id),
        score: id as f64 * 0.5,
        active: id % 2 == 0,
        parent: id.checked_sub(1),
        tags: vec!["alpha".to_string(), "beta".to_string()],
        attributes,
        payload: vec![id as u8; 32],
    }
}

fn create_records() -> Vec<Record> {
    (0..100).map(create_record).collect()
}

fn bench_encode_record(bench: &mut Bencher) {
    let record = create_record(7);
    bench.iter(|| {
        black_box(bjson::to_vec(&record).unwrap());
    })
}

fn bench_encode_records(bench: &mut Bencher) {
    let records = create_records();
    bench.iter(|| {
        black_box(bjson::to_vec(&records).unwrap());
    })
}

fn bench_encode_records_raw(bench: &mut Bencher) {
    let records = create_records();
    let encoder = Encoder::new().with_data_strategy(DataEncodingStrategy::Raw);
    bench.iter(|| {
        black_box(encoder.encode(&records).unwrap());
    })
}

fn bench_decode_value(bench: &mut Bencher) {
    let bytes = bjson::to_vec(&create_records()).unwrap();
    bench.iter(|| {
        black_box(bjson::decode_value(&bytes).unwrap());
    })
}

fn bench_decode_record(bench: &mut Bencher) {
    let bytes = bjson::to_vec(&create_record(7)).unwrap();
    bench.iter(|| {
        black_box(bjson::from_slice::<Record>(&bytes).unwrap());
    })
}

fn bench_decode_records(bench: &mut Bencher) {
    let bytes = bjson::to_vec(&create_records()).unwrap();
    let decoder = Decoder::new();
    bench.iter(|| {
        black_box(decoder.decode::<Vec<Record>>(&bytes).unwrap());
    })
}

fn bench_from_value(bench: &mut Bencher) {
    let value = bjson::to_value(&create_records()).unwrap();
    bench.iter(|| {
        black_box(bjson::from_value::<Vec<Record>>(&value).unwrap());
    })
}

fn bench_to_value(bench: &mut Bencher) {
    let records = create_records();
    bench.iter(|| {
        black_box(bjson::to_value(&records).unwrap());
    })
}

fn bench_long_string(bench: &mut Bencher) {
    let text = "abcdefgh".repeat(4096);
    bench.iter(|| {
        let bytes = bjson::to_vec(&text).unwrap();
        black_box(bjson::from_slice::<String>(&bytes).unwrap());
    })
}

fn bench_format(bench: &mut Bencher) {
    let value: Value = bjson::to_value(&create_records()).unwrap();
    bench.iter(|| {
        black_box(value.format(true).to_string());
    })
}

benchmark_group!(
    bjson_benches,
    bench_encode_record,
    bench_encode_records,
    bench_encode_records_raw,
    bench_decode_value,
    bench_decode_record,
    bench_decode_records,
    bench_from_value,
    bench_to_value,
    bench_long_string,
    bench_format,
);

benchmark_main!(bjson_benches);
