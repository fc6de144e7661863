//! Reading parts of a stored value, single leaves and expiry.
//!
//! Run with: cargo run --example partial_fields

use json_cache::path::encode_path;
use json_cache::{value, JsonCache, MemoryStore, SetOptions};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cache = JsonCache::new(MemoryStore::new());

    let config = value!({
        "service": "billing",
        "db": { "host": "10.0.0.5", "port": 5432, "pool": { "min": 2, "max": 16 } },
        "hosts": { "eu.west": "a.example.com", "us.east": "b.example.com" },
        "features": ["invoices", "refunds", "exports"]
    });
    cache.set("config", &config).await?;

    // A subtree and one array element
    let db = cache.get("config", &["db.pool", "features.1"]).await?;
    println!("db.pool + features.1: {}", db.unwrap_or_default());

    // Keys containing dots are addressed through their encoded path
    let eu = encode_path(["hosts", "eu.west"]);
    println!("{} => {:?}", eu, cache.get_leaf("config", &eu).await?);

    // A single leaf, typed
    let port = cache.get_leaf("config", "db.port").await?;
    println!("db.port => {:?}", port);

    // Values can expire
    cache
        .set_with_options("otp", &value!({ "code": "381204" }), &SetOptions::new().with_expire(300))
        .await?;
    println!("otp stored for 300s: {:?}", cache.get("otp", &["code"]).await?);

    let removed = cache.clear_all().await?;
    println!("cleared {} keys", removed);

    Ok(())
}
