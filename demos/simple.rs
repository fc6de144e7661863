//! Storing a nested value and reading it back.
//!
//! Run with: cargo run --example simple

use json_cache::{value, HashStore, JsonCache, MemoryStore};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let store = MemoryStore::new();
    let cache = JsonCache::new(store.clone());

    let user = value!({
        "name": "Alice Johnson",
        "age": 30,
        "address": { "city": "NYC", "zip": "10001" },
        "roles": ["admin", "ops"]
    });
    cache.set("user:42", &user).await?;

    // What actually lands in the store
    println!("jc:user:42   {:?}", store.read_all("jc:user:42").await?);
    println!("jc:user:42_t {:?}", store.read_all("jc:user:42_t").await?);

    let back = cache.get("user:42", &[]).await?;
    assert_eq!(back.as_ref(), Some(&user));
    println!("\nRead back: {}", user);
    println!("✓ Round-trip successful");

    cache.del("user:42").await?;
    assert!(cache.get("user:42", &[]).await?.is_none());
    println!("✓ Deleted");

    Ok(())
}
