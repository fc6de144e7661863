//! The public cache: values in, flat typed hashes out, and back.
//!
//! Each value is stored as two hashes in the backing [`HashStore`]:
//!
//! | key                  | fields                          |
//! |----------------------|---------------------------------|
//! | `{prefix}{key}`      | path → stored text              |
//! | `{prefix}{key}_t`    | path → type code                |
//!
//! Writes to the two hashes are issued concurrently and are not atomic: a
//! failure between them can leave one hash written and the other not. Writing
//! to an existing key merges fields into what is already there; use
//! [`JsonCache::rewrite`] to replace a value whose shape changed.

use crate::codec::decode_value;
use crate::options::TYPE_KEY_SUFFIX;
use crate::store::{FieldMap, HashStore, SCAN_START};
use crate::{from_value, to_value, CacheOptions, Flattened, Flattener, Result, SetOptions, TypeTag, Value};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Stores nested values as flat, typed hash fields.
///
/// # Examples
///
/// ```rust
/// use json_cache::{value, JsonCache, MemoryStore};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
/// # rt.block_on(async {
/// let cache = JsonCache::new(MemoryStore::new());
///
/// cache.set("user:1", &value!({ "name": "Alice", "age": 30 })).await.unwrap();
/// let user = cache.get("user:1", &[]).await.unwrap();
/// assert_eq!(user, Some(value!({ "name": "Alice", "age": 30 })));
///
/// let name = cache.get("user:1", &["name"]).await.unwrap();
/// assert_eq!(name, Some(value!({ "name": "Alice" })));
/// # });
/// ```
#[derive(Debug)]
pub struct JsonCache<S> {
    store: S,
    options: CacheOptions,
    flattener: Flattener,
}

impl<S: HashStore> JsonCache<S> {
    /// Creates a cache with default options over `store`.
    pub fn new(store: S) -> Self {
        Self::with_options(store, CacheOptions::default())
    }

    pub fn with_options(store: S, options: CacheOptions) -> Self {
        let flattener = options.flattener();
        JsonCache {
            store,
            options,
            flattener,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn flattener(&self) -> &Flattener {
        &self.flattener
    }

    /// The key holding the stored text of `key`.
    pub fn data_key(&self, key: &str) -> String {
        format!("{}{}", self.options.prefix, key)
    }

    /// The key holding the type codes of `key`.
    pub fn type_key(&self, key: &str) -> String {
        format!("{}{}{}", self.options.prefix, key, TYPE_KEY_SUFFIX)
    }

    /// Flattens `value` and stores it under `key`.
    ///
    /// A value that flattens to nothing (for example a lone skipped symbol)
    /// writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`](crate::Error::DepthLimitExceeded)
    /// for values nested too deeply, or the store's error.
    pub async fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.set_with_options(key, value, &SetOptions::default()).await
    }

    /// Like [`set`](Self::set), then applies the write options.
    ///
    /// With an expiry, both hashes are expired after they are written.
    pub async fn set_with_options(&self, key: &str, value: &Value, options: &SetOptions) -> Result<()> {
        let flattened = self.flattener.flatten(value)?;
        if flattened.is_empty() {
            debug!(key = %key, "nothing to store");
            return Ok(());
        }

        let (data, type_info) = flattened.into_parts();
        let type_codes: FieldMap = type_info
            .into_iter()
            .map(|(path, tag)| (path, tag.as_code().to_string()))
            .collect();

        let data_key = self.data_key(key);
        let type_key = self.type_key(key);
        debug!(key = %data_key, fields = data.len(), "writing flattened value");
        tokio::try_join!(
            self.store.write_fields(&data_key, &data),
            self.store.write_fields(&type_key, &type_codes),
        )?;

        if let Some(seconds) = options.expire {
            debug!(key = %data_key, seconds, "setting expiry");
            tokio::try_join!(
                self.store.set_expiry(&data_key, seconds),
                self.store.set_expiry(&type_key, seconds),
            )?;
        }
        Ok(())
    }

    /// Reads the value stored under `key`.
    ///
    /// With an empty `fields` list the whole value is returned. Otherwise only
    /// leaves at or below each field are kept; fields are stored paths such as
    /// `address.city` (see [`path::encode_path`](crate::path::encode_path) for
    /// keys containing `.`).
    ///
    /// Returns `None` when nothing is stored under `key` or no leaf matches.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn get(&self, key: &str, fields: &[&str]) -> Result<Option<Value>> {
        let data_key = self.data_key(key);
        let type_key = self.type_key(key);
        let (data, type_codes) = tokio::try_join!(
            self.store.read_all(&data_key),
            self.store.read_all(&type_key),
        )?;
        debug!(key = %data_key, fields = data.len(), "read flattened value");
        if data.is_empty() {
            return Ok(None);
        }

        let type_info: IndexMap<String, TypeTag> = type_codes
            .into_iter()
            .map(|(path, code)| {
                let tag = TypeTag::from_code(&code);
                (path, tag)
            })
            .collect();
        let mut flattened = Flattened::from_parts(data, type_info);

        if !fields.is_empty() {
            flattened = flattened.select(fields);
            if flattened.is_empty() {
                return Ok(None);
            }
        }
        Ok(Some(self.flattener.unflatten(&flattened)))
    }

    /// Reads a single leaf without fetching the whole value.
    ///
    /// `path` must name a leaf exactly; use [`get`](Self::get) with a field
    /// list to read a subtree.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn get_leaf(&self, key: &str, path: &str) -> Result<Option<Value>> {
        let data_key = self.data_key(key);
        let type_key = self.type_key(key);
        let wanted = [path.to_string()];
        let (mut texts, mut codes) = tokio::try_join!(
            self.store.read_fields(&data_key, &wanted),
            self.store.read_fields(&type_key, &wanted),
        )?;
        debug!(key = %data_key, path = %path, "read leaf");

        let Some(text) = texts.pop().flatten() else {
            return Ok(None);
        };
        let tag = codes.pop().flatten().map(|code| TypeTag::from_code(&code));
        Ok(Some(decode_value(tag.as_ref(), &text, self.flattener.codecs())))
    }

    /// Deletes the value stored under `key`, returning how many hashes existed.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn del(&self, key: &str) -> Result<u64> {
        let keys = [self.data_key(key), self.type_key(key)];
        let deleted = self.store.delete_keys(&keys).await?;
        debug!(key = %keys[0], deleted, "deleted value");
        Ok(deleted)
    }

    /// Replaces the value under `key`, dropping fields the new value lacks.
    ///
    /// Deletes both hashes and then writes. The two steps are separate: if the
    /// write fails the old value is already gone.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or a flattening error from the write.
    pub async fn rewrite(&self, key: &str, value: &Value) -> Result<()> {
        self.del(key).await?;
        self.set(key, value).await
    }

    /// Deletes every key under the cache's prefix, returning how many were removed.
    ///
    /// Keys are enumerated in batches of
    /// [`CacheOptions::scan_count`](crate::CacheOptions::scan_count), at least
    /// one key per call, and each batch is deleted before the next is requested.
    ///
    /// # Errors
    ///
    /// Returns the store's error. Keys deleted before the error stay deleted.
    pub async fn clear_all(&self) -> Result<u64> {
        let pattern = format!("{}*", escape_glob(&self.options.prefix));
        let mut cursor = SCAN_START;
        let mut removed = 0;
        loop {
            let (next, keys) = self
                .store
                .scan(cursor, &pattern, self.options.scan_count.max(1))
                .await?;
            if !keys.is_empty() {
                removed += self.store.delete_keys(&keys).await?;
            }
            if next == SCAN_START {
                break;
            }
            cursor = next;
        }
        debug!(pattern = %pattern, removed, "cleared namespace");
        Ok(removed)
    }

    /// Serializes `value` and stores it like [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Fails if `T` cannot be represented as a [`Value`], or as `set` does.
    pub async fn set_as<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value)?;
        self.set(key, &value).await
    }

    /// Reads the whole value under `key` into `T`.
    ///
    /// # Errors
    ///
    /// Fails if the stored value does not fit `T`, or with the store's error.
    pub async fn get_as<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get(key, &[]).await? {
            Some(value) => from_value(value).map(Some),
            None => Ok(None),
        }
    }
}

/// Escapes glob metacharacters so a prefix only matches itself.
///
/// Each one is wrapped in a single-character class, a form Redis and the
/// in-memory store both read as a literal.
fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            '\\' => escaped.push_str("[\\\\]"),
            _ => escaped.push(c),
        }
    }
    escaped
}
