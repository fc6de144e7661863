use super::{FieldMap, HashStore, SCAN_START};
use crate::{Error, Result};
use async_trait::async_trait;
use glob::Pattern;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry {
    fields: FieldMap,
    expires_at: Option<Instant>,
    seq: u64,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Keys by creation sequence. Scan cursors are positions in this order.
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl Inner {
    fn live(&self, key: &str, now: Instant) -> Option<&Entry> {
        self.entries.get(key).filter(|entry| entry.is_live(now))
    }

    fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn purge_if_expired(&mut self, key: &str, now: Instant) {
        if self.entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            self.remove(key);
        }
    }
}

/// An in-process [`HashStore`].
///
/// Keys expire lazily: an expired key is invisible to every read and is
/// dropped the next time it is written or deleted. Expiry follows
/// [`tokio::time`], so tests can drive it with a paused clock.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let inner = self.inner.read().await;
        inner.entries.values().filter(|entry| entry.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner.read().await.live(key, now).is_some()
    }

    /// Time left before `key` expires, `None` if it has no expiry or does not exist.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let inner = self.inner.read().await;
        let deadline = inner.live(key, now)?.expires_at?;
        Some(deadline.saturating_duration_since(now))
    }
}

#[async_trait]
impl HashStore for MemoryStore {
    async fn write_fields(&self, key: &str, fields: &FieldMap) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.purge_if_expired(key, now);

        if let Some(entry) = inner.entries.get_mut(key) {
            entry
                .fields
                .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            return Ok(());
        }

        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.order.insert(seq, key.to_string());
        inner.entries.insert(
            key.to_string(),
            Entry {
                fields: fields.clone(),
                expires_at: None,
                seq,
            },
        );
        Ok(())
    }

    async fn read_fields(&self, key: &str, fields: &[String]) -> Result<Vec<Option<String>>> {
        let now = Instant::now();
        let inner = self.inner.read().await;
        let entry = inner.live(key, now);
        Ok(fields
            .iter()
            .map(|field| entry.and_then(|e| e.fields.get(field).cloned()))
            .collect())
    }

    async fn read_all(&self, key: &str) -> Result<FieldMap> {
        let now = Instant::now();
        let inner = self.inner.read().await;
        Ok(inner
            .live(key, now)
            .map(|entry| entry.fields.clone())
            .unwrap_or_default())
    }

    async fn set_expiry(&self, key: &str, seconds: u64) -> Result<bool> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.purge_if_expired(key, now);
        match inner.entries.get_mut(key) {
            Some(entry) => {
                // Past the clock's range means the key never expires
                entry.expires_at = now.checked_add(Duration::from_secs(seconds));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<u64> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        let mut deleted = 0;
        for key in keys {
            if let Some(entry) = inner.remove(key) {
                if entry.is_live(now) {
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)> {
        let matcher = Pattern::new(pattern)
            .map_err(|err| Error::custom(format!("invalid scan pattern {:?}: {}", pattern, err)))?;
        let now = Instant::now();
        let inner = self.inner.read().await;
        let mut window = inner.order.range(cursor..).take(count.max(1) + 1);

        let mut keys = Vec::new();
        for (_, key) in window.by_ref().take(count.max(1)) {
            let live = inner.live(key, now).is_some();
            if live && matcher.matches(key) {
                keys.push(key.clone());
            }
        }
        let next = window.next().map_or(SCAN_START, |(seq, _)| *seq);
        Ok((next, keys))
    }
}
