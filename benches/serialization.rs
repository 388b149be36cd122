use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ubo::{
    from_slice, from_slice_compressed, from_text, to_bytes, to_bytes_compressed, to_text,
    to_text_pretty, DataList, DataMap, DataType, DataValue,
};
use uuid::Uuid;

fn user(i: i32) -> DataMap {
    let mut map = DataMap::new();
    map.put_int("id", i);
    map.put_string("name", format!("User {}", i));
    map.put_string("email", format!("user{}@example.com", i));
    map.put_bool("active", i % 2 == 0);
    map.put_double("balance", 9.99 + f64::from(i));
    map.put_uuid("token", Uuid::from_u128(i as u128));
    map
}

fn users(size: i32) -> DataValue {
    let mut list = DataList::with_capacity(DataType::Map, size as usize);
    for i in 0..size {
        list.push(user(i)).unwrap();
    }
    let mut root = DataMap::new();
    root.put_list("users", list);
    root.put_int_array("ids", (0..size).collect());
    DataValue::Map(root)
}

fn benchmark_encode_simple(c: &mut Criterion) {
    let value = DataValue::Map(user(123));

    c.bench_function("encode_simple_map", |b| {
        b.iter(|| to_bytes(black_box(&value)))
    });
}

fn benchmark_decode_simple(c: &mut Criterion) {
    let bytes = to_bytes(&DataValue::Map(user(123))).unwrap();

    c.bench_function("decode_simple_map", |b| {
        b.iter(|| from_slice(black_box(&bytes), Some(DataType::Map)))
    });
}

fn benchmark_binary_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");

    for size in [10, 50, 100, 500].iter() {
        let value = users(*size);
        let bytes = to_bytes(&value).unwrap();

        group.bench_with_input(BenchmarkId::new("encode", size), &value, |b, value| {
            b.iter(|| to_bytes(black_box(value)))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| from_slice(black_box(bytes), None))
        });
    }
    group.finish();
}

fn benchmark_text_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");

    for size in [10, 50, 100, 500].iter() {
        let value = users(*size);
        let text = to_text(&value);

        group.bench_with_input(BenchmarkId::new("write", size), &value, |b, value| {
            b.iter(|| to_text(black_box(value)))
        });
        group.bench_with_input(BenchmarkId::new("write_pretty", size), &value, |b, value| {
            b.iter(|| to_text_pretty(black_box(value)))
        });
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| from_text(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_compressed(c: &mut Criterion) {
    let mut group = c.benchmark_group("compressed");

    let value = users(500);
    let bytes = to_bytes_compressed(&value).unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| to_bytes_compressed(black_box(&value)))
    });
    group.bench_function("decode", |b| {
        b.iter(|| from_slice_compressed(black_box(&bytes), None))
    });

    group.finish();
}

fn benchmark_primitive_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_array");

    let ints = DataValue::IntArray((0..1000).collect());
    let doubles = DataValue::DoubleArray((0..1000).map(|i| i as f64 * 1.5).collect());

    group.bench_function("encode_ints", |b| b.iter(|| to_bytes(black_box(&ints))));
    group.bench_function("encode_doubles", |b| {
        b.iter(|| to_bytes(black_box(&doubles)))
    });
    group.bench_function("write_ints", |b| b.iter(|| to_text(black_box(&ints))));

    let ints_text = to_text(&ints);
    group.bench_function("parse_ints", |b| {
        b.iter(|| from_text(black_box(&ints_text)))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let value = users(100);
    let mut group = c.benchmark_group("comparison");

    group.bench_function("ubo_encode", |b| b.iter(|| to_bytes(black_box(&value))));
    group.bench_function("uso_write", |b| b.iter(|| to_text(black_box(&value))));
    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&value)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_simple,
    benchmark_decode_simple,
    benchmark_binary_sizes,
    benchmark_text_sizes,
    benchmark_compressed,
    benchmark_primitive_arrays,
    benchmark_comparison_with_json
);
criterion_main!(benches);
