use chrono::{DateTime, TimeZone, Utc};
use json_cache::{
    value, CacheOptions, Codecs, Error, FieldMap, HashStore, JsonCache, MemoryStore, Number,
    SetOptions, Value,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn cache() -> (MemoryStore, JsonCache<MemoryStore>) {
    let store = MemoryStore::new();
    (store.clone(), JsonCache::new(store))
}

fn user() -> Value {
    value!({
        "name": "Alice",
        "age": 30,
        "address": { "city": "NYC", "zip": "10001" },
        "tags": ["admin", "ops"],
        "meta": {}
    })
}

#[tokio::test]
async fn test_end_to_end_restores_types() {
    let (_, cache) = cache();
    cache.set("user", &user()).await.unwrap();

    let back = cache.get("user", &[]).await.unwrap().unwrap();
    assert_eq!(back, user());
    assert_eq!(back.get("age"), Some(&Value::Number(Number::Integer(30))));
    assert_eq!(back.get("meta"), Some(&value!({})));
}

#[tokio::test]
async fn test_missing_key_is_none() {
    let (_, cache) = cache();
    assert_eq!(cache.get("nobody", &[]).await.unwrap(), None);
    assert_eq!(cache.get("nobody", &["name"]).await.unwrap(), None);
}

#[tokio::test]
async fn test_partial_retrieval() {
    let (_, cache) = cache();
    cache.set("user", &user()).await.unwrap();

    assert_eq!(
        cache.get("user", &["name"]).await.unwrap(),
        Some(value!({ "name": "Alice" }))
    );
    let mut expected = json_cache::Map::new();
    expected.insert("address".into(), value!({ "city": "NYC", "zip": "10001" }));
    expected.insert(
        "tags".into(),
        Value::Array(vec![Value::Undefined, Value::from("ops")]),
    );
    assert_eq!(
        cache.get("user", &["address", "tags.1"]).await.unwrap(),
        Some(Value::Object(expected))
    );
    assert_eq!(cache.get("user", &["nope"]).await.unwrap(), None);
}

#[tokio::test]
async fn test_del_removes_both_hashes() {
    let (store, cache) = cache();
    cache.set("user", &user()).await.unwrap();
    assert_eq!(store.len().await, 2);

    assert_eq!(cache.del("user").await.unwrap(), 2);
    assert_eq!(cache.get("user", &[]).await.unwrap(), None);
    assert!(store.is_empty().await);
    assert_eq!(cache.del("user").await.unwrap(), 0);
}

#[tokio::test]
async fn test_set_merges_and_rewrite_replaces() {
    let (_, cache) = cache();
    cache.set("doc", &value!({ "a": 1, "b": 2 })).await.unwrap();
    cache.set("doc", &value!({ "a": 3 })).await.unwrap();
    assert_eq!(
        cache.get("doc", &[]).await.unwrap(),
        Some(value!({ "a": 3, "b": 2 }))
    );

    cache.rewrite("doc", &value!({ "a": 4 })).await.unwrap();
    assert_eq!(cache.get("doc", &[]).await.unwrap(), Some(value!({ "a": 4 })));
}

#[tokio::test]
async fn test_rewrite_changes_shape() {
    let (store, cache) = cache();
    cache.set("doc", &value!({ "list": [1, 2, 3] })).await.unwrap();
    cache.rewrite("doc", &value!({ "list": "flat" })).await.unwrap();

    assert_eq!(
        cache.get("doc", &[]).await.unwrap(),
        Some(value!({ "list": "flat" }))
    );
    let types = store.read_all("jc:doc_t").await.unwrap();
    assert_eq!(types.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expiry_applies_to_both_hashes() {
    let (store, cache) = cache();
    cache
        .set_with_options("session", &value!({ "token": "abc" }), &SetOptions::new().with_expire(60))
        .await
        .unwrap();
    assert_eq!(store.ttl("jc:session").await, Some(Duration::from_secs(60)));
    assert_eq!(store.ttl("jc:session_t").await, Some(Duration::from_secs(60)));

    tokio::time::advance(Duration::from_secs(59)).await;
    assert!(cache.get("session", &[]).await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(cache.get("session", &[]).await.unwrap(), None);
}

#[tokio::test]
async fn test_clear_all_sweeps_more_than_one_batch() {
    let (store, cache) = cache();
    for i in 0..130 {
        cache.set(&format!("item:{}", i), &value!({ "i": i })).await.unwrap();
    }
    let mut unrelated = FieldMap::new();
    unrelated.insert("x".into(), "1".into());
    store.write_fields("other:key", &unrelated).await.unwrap();

    assert_eq!(cache.clear_all().await.unwrap(), 260);
    assert_eq!(store.len().await, 1);
    assert!(store.contains_key("other:key").await);
    assert_eq!(cache.clear_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_prefixes_isolate_caches() {
    let store = MemoryStore::new();
    let left = JsonCache::with_options(store.clone(), CacheOptions::new().with_prefix("left:"));
    let right = JsonCache::with_options(store.clone(), CacheOptions::new().with_prefix("right:"));

    left.set("k", &value!({ "side": "left" })).await.unwrap();
    right.set("k", &value!({ "side": "right" })).await.unwrap();
    assert_eq!(
        left.get("k", &[]).await.unwrap(),
        Some(value!({ "side": "left" }))
    );

    assert_eq!(left.clear_all().await.unwrap(), 2);
    assert_eq!(
        right.get("k", &[]).await.unwrap(),
        Some(value!({ "side": "right" }))
    );
}

#[tokio::test]
async fn test_prefix_with_glob_characters() {
    let store = MemoryStore::new();
    let starry = JsonCache::with_options(store.clone(), CacheOptions::new().with_prefix("a*:"));
    let plain = JsonCache::with_options(store.clone(), CacheOptions::new().with_prefix("ab:"));

    starry.set("k", &value!(1)).await.unwrap();
    plain.set("k", &value!(2)).await.unwrap();

    assert_eq!(starry.clear_all().await.unwrap(), 2);
    assert_eq!(plain.get("k", &[]).await.unwrap(), Some(value!(2)));
}

#[tokio::test]
async fn test_prefix_with_class_and_escape_characters() {
    let store = MemoryStore::new();
    let prefixes = ["q?:", "qx:", "[x]:", "x]:", "back\\:", "back:"];
    for prefix in prefixes {
        let cache = JsonCache::with_options(store.clone(), CacheOptions::new().with_prefix(prefix));
        cache.set("k", &value!({ "p": prefix })).await.unwrap();
    }

    for (i, prefix) in prefixes.iter().enumerate() {
        let cache = JsonCache::with_options(store.clone(), CacheOptions::new().with_prefix(prefix));
        assert_eq!(cache.clear_all().await.unwrap(), 2);
        assert_eq!(store.len().await, 2 * (prefixes.len() - i - 1));
    }
}

#[derive(Debug, Default)]
struct CountingStore {
    inner: MemoryStore,
    counts: std::sync::Mutex<Vec<usize>>,
}

#[async_trait::async_trait]
impl HashStore for CountingStore {
    async fn write_fields(&self, key: &str, fields: &FieldMap) -> json_cache::Result<()> {
        self.inner.write_fields(key, fields).await
    }

    async fn read_fields(&self, key: &str, fields: &[String]) -> json_cache::Result<Vec<Option<String>>> {
        self.inner.read_fields(key, fields).await
    }

    async fn read_all(&self, key: &str) -> json_cache::Result<FieldMap> {
        self.inner.read_all(key).await
    }

    async fn set_expiry(&self, key: &str, seconds: u64) -> json_cache::Result<bool> {
        self.inner.set_expiry(key, seconds).await
    }

    async fn delete_keys(&self, keys: &[String]) -> json_cache::Result<u64> {
        self.inner.delete_keys(keys).await
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> json_cache::Result<(u64, Vec<String>)> {
        self.counts.lock().unwrap().push(count);
        self.inner.scan(cursor, pattern, count).await
    }
}

#[tokio::test]
async fn test_zero_scan_count_still_asks_for_keys() {
    let options = CacheOptions {
        scan_count: 0,
        ..CacheOptions::default()
    };
    let cache = JsonCache::with_options(CountingStore::default(), options);
    cache.set("a", &value!({ "x": 1 })).await.unwrap();
    cache.set("b", &value!({ "x": 2 })).await.unwrap();

    assert_eq!(cache.clear_all().await.unwrap(), 4);
    let counts = cache.store().counts.lock().unwrap().clone();
    assert!(!counts.is_empty());
    assert!(counts.iter().all(|count| *count >= 1));
}

#[tokio::test]
async fn test_huge_expiry_is_accepted() {
    let (store, cache) = cache();
    cache
        .set_with_options("forever", &value!({ "a": 1 }), &SetOptions::new().with_expire(u64::MAX))
        .await
        .unwrap();
    assert_eq!(store.ttl("jc:forever").await, None);
    assert_eq!(cache.get("forever", &[]).await.unwrap(), Some(value!({ "a": 1 })));
}

#[tokio::test]
async fn test_dates_round_trip_through_the_store() {
    let (store, cache) = cache();
    let when = Utc.with_ymd_and_hms(2023, 11, 5, 14, 0, 0).unwrap();
    let mut event = json_cache::Map::new();
    event.insert("at".into(), Value::Date(when));
    cache.set("event", &Value::Object(event.clone())).await.unwrap();

    let types = store.read_all("jc:event_t").await.unwrap();
    assert_eq!(types["at"], "Date");
    assert_eq!(
        cache.get("event", &[]).await.unwrap(),
        Some(Value::Object(event))
    );
}

#[tokio::test]
async fn test_codecs_are_configurable() {
    let store = MemoryStore::new();
    let bare = JsonCache::with_options(store.clone(), CacheOptions::new().with_codecs(Codecs::new()));
    let when = Utc.with_ymd_and_hms(2023, 11, 5, 14, 0, 0).unwrap();
    bare.set("d", &Value::Date(when)).await.unwrap();

    assert_eq!(
        bare.get("d", &[]).await.unwrap(),
        Some(Value::from(when.to_rfc3339()))
    );
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Profile {
    name: String,
    age: u32,
    joined: DateTime<Utc>,
    emails: Vec<String>,
    manager: Option<String>,
}

#[tokio::test]
async fn test_typed_set_and_get() {
    let (_, cache) = cache();
    let profile = Profile {
        name: "Bob".into(),
        age: 41,
        joined: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        emails: vec!["bob@example.com".into()],
        manager: None,
    };
    cache.set_as("bob", &profile).await.unwrap();

    let back: Option<Profile> = cache.get_as("bob").await.unwrap();
    assert_eq!(back, Some(profile));

    let missing: Option<Profile> = cache.get_as("carol").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_get_as_reports_shape_mismatch() {
    let (_, cache) = cache();
    cache.set("n", &value!({ "name": 5 })).await.unwrap();
    let result: Result<Option<Profile>, Error> = cache.get_as("n").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_get_leaf_reads_one_field() {
    let (_, cache) = cache();
    cache.set("user", &user()).await.unwrap();
    assert_eq!(
        cache.get_leaf("user", "address.zip").await.unwrap(),
        Some(Value::from("10001"))
    );
    assert_eq!(cache.get_leaf("user", "age").await.unwrap(), Some(Value::from(30)));
    assert_eq!(cache.get_leaf("user", "meta").await.unwrap(), Some(value!({})));
}

#[tokio::test]
async fn test_depth_limit_surfaces_as_error() {
    let store = MemoryStore::new();
    let cache = JsonCache::with_options(store.clone(), CacheOptions::new().with_max_depth(2));
    let deep = value!({ "a": { "b": { "c": { "d": 1 } } } });
    let err = cache.set("deep", &deep).await.unwrap_err();
    assert!(matches!(err, Error::DepthLimitExceeded { max_depth: 2 }));
    assert!(store.is_empty().await);
}

#[derive(Debug)]
struct BrokenStore;

#[async_trait::async_trait]
impl HashStore for BrokenStore {
    async fn write_fields(&self, _key: &str, _fields: &FieldMap) -> json_cache::Result<()> {
        Err(Error::store("connection refused"))
    }

    async fn read_fields(&self, _key: &str, _fields: &[String]) -> json_cache::Result<Vec<Option<String>>> {
        Err(Error::store("connection refused"))
    }

    async fn read_all(&self, _key: &str) -> json_cache::Result<FieldMap> {
        Err(Error::store("connection refused"))
    }

    async fn set_expiry(&self, _key: &str, _seconds: u64) -> json_cache::Result<bool> {
        Err(Error::store("connection refused"))
    }

    async fn delete_keys(&self, _keys: &[String]) -> json_cache::Result<u64> {
        Err(Error::store("connection refused"))
    }

    async fn scan(&self, _cursor: u64, _pattern: &str, _count: usize) -> json_cache::Result<(u64, Vec<String>)> {
        Err(Error::store("connection refused"))
    }
}

#[tokio::test]
async fn test_store_errors_propagate() {
    let cache = JsonCache::new(BrokenStore);
    let err = cache.set("k", &value!({ "a": 1 })).await.unwrap_err();
    assert!(err.is_store());
    assert!(err.to_string().contains("connection refused"));

    assert!(cache.get("k", &[]).await.unwrap_err().is_store());
    assert!(cache.clear_all().await.unwrap_err().is_store());
}
