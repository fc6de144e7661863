//! The key-value store interface the cache writes through.
//!
//! The cache needs a store of hashes (a key mapping to a set of string fields)
//! with expiry, deletion and cursor-based key enumeration. Any backend that can
//! offer these, such as a Redis client, implements [`HashStore`]. The trait is
//! runtime-agnostic and uses `async_trait` for async support.
//!
//! [`MemoryStore`] is an in-process implementation for tests and development.
//!
//! ## Example
//!
//! ```ignore
//! use json_cache::{FieldMap, HashStore, Result};
//!
//! #[derive(Debug)]
//! struct MyStore { /* connection */ }
//!
//! #[async_trait::async_trait]
//! impl HashStore for MyStore {
//!     async fn write_fields(&self, key: &str, fields: &FieldMap) -> Result<()> {
//!         // HSET key field value [field value ...]
//!     }
//!     // ...
//! }
//! ```

mod memory;

pub use memory::MemoryStore;

use crate::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::fmt::Debug;

/// Fields of one stored hash, in the order they were written.
pub type FieldMap = IndexMap<String, String>;

/// Cursor value that starts an enumeration and signals that it is complete.
pub const SCAN_START: u64 = 0;

/// Hash-oriented key-value storage.
///
/// Errors are the backend's own, wrapped with [`Error::store`](crate::Error::store);
/// the cache passes them through without interpreting them.
#[async_trait]
pub trait HashStore: Debug + Send + Sync {
    /// Sets the given fields of the hash at `key`, leaving other fields as they are.
    async fn write_fields(&self, key: &str, fields: &FieldMap) -> Result<()>;

    /// Reads the named fields of the hash at `key`, `None` for each missing one.
    async fn read_fields(&self, key: &str, fields: &[String]) -> Result<Vec<Option<String>>>;

    /// Reads the whole hash at `key`. A missing key yields an empty map.
    async fn read_all(&self, key: &str) -> Result<FieldMap>;

    /// Expires `key` after `seconds`. Returns `false` if the key does not exist.
    async fn set_expiry(&self, key: &str, seconds: u64) -> Result<bool>;

    /// Deletes the given keys, returning how many existed.
    async fn delete_keys(&self, keys: &[String]) -> Result<u64>;

    /// Enumerates keys matching a glob `pattern` (`*`, `?` and `[...]` classes).
    ///
    /// Start with [`SCAN_START`] and pass each returned cursor back in until the
    /// store returns [`SCAN_START`] again. `count` is a hint for how much work
    /// one call does; a call may return fewer (or no) keys without being done.
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)>;
}
