use criterion::{criterion_group, criterion_main, Criterion};
use flatjson::{parse, JsonEmitter, Level, Token};
use serde_json::Value;

const RECORD: &str = r#"{"id": 1234, "name": "record", "score": 98.6, "tags": ["a", "b"], "ok": true, "extra": null}"#;

/// Build a document of many records, staying inside the tokenizer's 64 KiB
/// input limit.
fn make_large(json: &str) -> String {
    let mut large = String::from("[");
    for _ in 0..500 {
        if large.len() > 1 {
            large.push(',');
        }
        large.push_str(json);
    }
    large.push(']');
    large
}

fn flatjson_parse(json_bytes: &[u8], tokens: &mut [Token]) -> usize {
    parse(json_bytes, tokens).unwrap()
}

fn flatjson_emit(sink: &mut Vec<u8>) {
    let mut levels = [Level::default(); 8];
    let mut e = JsonEmitter::new(sink, &mut levels);
    e.array_open();
    for i in 0..500 {
        e.object_open()
            .key_integer("id", i)
            .key_string("name", "record")
            .key_number("score", 98.6)
            .key_array_open("tags");
        e.string("a").string("b").array_close();
        e.key_bool("ok", true).key_null("extra").object_close();
    }
    e.array_close();
}

fn flatjson_benchmark(c: &mut Criterion) {
    let json_bytes = RECORD.as_bytes();
    let json_large = make_large(RECORD);
    let json_large_bytes = json_large.as_bytes();

    let mut tokens = vec![Token::default(); json_large_bytes.len() / 2 + 1];

    c.bench_function("flatjson", |b| {
        b.iter(|| {
            flatjson_parse(json_bytes, &mut tokens);
        })
    });

    c.bench_function("flatjson_large", |b| {
        b.iter(|| {
            flatjson_parse(json_large_bytes, &mut tokens);
        })
    });

    c.bench_function("flatjson_emit", |b| {
        let mut sink = Vec::with_capacity(json_large.len());
        b.iter(|| {
            sink.clear();
            flatjson_emit(&mut sink);
        })
    });

    c.bench_function("serde", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(RECORD).unwrap();
        })
    });

    c.bench_function("serde_large", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(&json_large).unwrap();
        })
    });
}

criterion_group!(benches, flatjson_benchmark);
criterion_main!(benches);
