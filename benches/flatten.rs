use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use json_cache::{flatten, to_value, unflatten, JsonCache, MemoryStore};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn products(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU-{:05}", i),
            name: format!("Product {}", i),
            price: 9.99 + i as f64,
            quantity: i as u32,
        })
        .collect()
}

fn benchmark_flatten_simple(c: &mut Criterion) {
    let user = to_value(&User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    })
    .unwrap();

    c.bench_function("flatten_simple_struct", |b| b.iter(|| flatten(black_box(&user))));
}

fn benchmark_unflatten_simple(c: &mut Criterion) {
    let flat = flatten(
        &to_value(&User {
            id: 123,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            active: true,
        })
        .unwrap(),
    )
    .unwrap();

    c.bench_function("unflatten_simple_struct", |b| b.iter(|| unflatten(black_box(&flat))));
}

fn benchmark_flatten_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_array");

    for size in [10, 50, 100, 500].iter() {
        let value = to_value(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| flatten(black_box(value)))
        });
    }
    group.finish();
}

fn benchmark_unflatten_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("unflatten_array");

    for size in [10, 50, 100, 500].iter() {
        let flat = flatten(&to_value(&products(*size)).unwrap()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &flat, |b, flat| {
            b.iter(|| unflatten(black_box(flat)))
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let nested = to_value(&NestedData {
        id: 1,
        metadata: Metadata {
            created: "2024-01-01".to_string(),
            updated: "2024-06-01".to_string(),
            version: 3,
        },
        tags: vec!["a.b".to_string(), "c".to_string(), "d".to_string()],
    })
    .unwrap();

    c.bench_function("flatten_nested", |b| b.iter(|| flatten(black_box(&nested))));
}

fn benchmark_cache_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let cache = JsonCache::new(MemoryStore::new());
    let value = to_value(&products(50)).unwrap();

    c.bench_function("memory_cache_set_get", |b| {
        b.iter(|| {
            runtime.block_on(async {
                cache.set("bench", black_box(&value)).await.unwrap();
                cache.get("bench", &[]).await.unwrap()
            })
        })
    });
}

criterion_group!(
    benches,
    benchmark_flatten_simple,
    benchmark_unflatten_simple,
    benchmark_flatten_array,
    benchmark_unflatten_array,
    benchmark_nested,
    benchmark_cache_round_trip
);
criterion_main!(benches);
