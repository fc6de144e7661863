//! Dates, big integers, a custom extension type and typed structs.
//!
//! Run with: cargo run --example custom_types

use chrono::{DateTime, Utc};
use json_cache::{CacheOptions, Codecs, JsonCache, Map, MemoryStore, Value};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Invoice {
    id: u32,
    customer: String,
    issued: DateTime<Utc>,
    lines: Vec<Line>,
    paid: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Line {
    sku: String,
    cents: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // "Point" values are stored as "x,y"
    let codecs = Codecs::standard().with_codec(
        "Point",
        |value| match value {
            Value::Custom { data, .. } => data.clone(),
            other => other.to_string(),
        },
        |text| Value::Custom {
            type_name: "Point".to_string(),
            data: text.to_string(),
        },
    );
    let cache = JsonCache::with_options(MemoryStore::new(), CacheOptions::new().with_codecs(codecs));

    let mut shape = Map::new();
    shape.insert("created".to_string(), Value::Date(Utc::now()));
    shape.insert(
        "area".to_string(),
        Value::BigInt("340282366920938463463374607431768211457".parse::<BigInt>()?),
    );
    shape.insert(
        "origin".to_string(),
        Value::Custom {
            type_name: "Point".to_string(),
            data: "3,4".to_string(),
        },
    );
    let shape = Value::Object(shape);

    cache.set("shape", &shape).await?;
    assert_eq!(cache.get("shape", &[]).await?, Some(shape));
    println!("✓ Date, BigInt and Point restored");

    let invoice = Invoice {
        id: 7,
        customer: "ACME".to_string(),
        issued: Utc::now(),
        lines: vec![
            Line {
                sku: "A-1".to_string(),
                cents: 1250,
            },
            Line {
                sku: "B-2".to_string(),
                cents: 399,
            },
        ],
        paid: None,
    };
    cache.set_as("invoice:7", &invoice).await?;
    let back: Option<Invoice> = cache.get_as("invoice:7").await?;
    assert_eq!(back.as_ref(), Some(&invoice));
    println!("✓ Typed invoice restored: {:?}", back);

    Ok(())
}
