//! Configuration for [`JsonCache`](crate::JsonCache).
//!
//! - [`CacheOptions`]: key prefix, extension codecs, skipped types, nesting limit
//!   and scan batch size, fixed when the cache is built
//! - [`SetOptions`]: per-write settings such as expiry
//!
//! ## Examples
//!
//! ```rust
//! use json_cache::{CacheOptions, Codecs, SetOptions};
//!
//! let options = CacheOptions::new()
//!     .with_prefix("app:")
//!     .with_codecs(Codecs::standard())
//!     .with_scan_count(500);
//! assert_eq!(options.prefix, "app:");
//!
//! let write = SetOptions::new().with_expire(60);
//! assert_eq!(write.expire, Some(60));
//! ```

use crate::flatten::DEFAULT_MAX_DEPTH;
use crate::{Codecs, Flattener, TypeTag};

/// Prefix put in front of every key the cache writes.
pub const DEFAULT_PREFIX: &str = "jc:";

/// Suffix that turns a data key into its type key.
pub const TYPE_KEY_SUFFIX: &str = "_t";

/// Keys requested per `scan` call while clearing the namespace.
pub const DEFAULT_SCAN_COUNT: usize = 100;

/// Settings fixed for the lifetime of a cache.
///
/// # Examples
///
/// ```rust
/// use json_cache::CacheOptions;
///
/// let options = CacheOptions::default();
/// assert_eq!(options.prefix, "jc:");
/// assert_eq!(options.scan_count, 100);
/// ```
#[derive(Clone, Debug)]
pub struct CacheOptions {
    pub prefix: String,
    pub codecs: Codecs,
    pub skipped: Vec<TypeTag>,
    pub max_depth: usize,
    pub scan_count: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        CacheOptions {
            prefix: DEFAULT_PREFIX.to_string(),
            codecs: Codecs::standard(),
            skipped: vec![TypeTag::Symbol],
            max_depth: DEFAULT_MAX_DEPTH,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }
}

impl CacheOptions {
    /// Creates default options: prefix `jc:`, standard codecs, symbols skipped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix that namespaces every stored key.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Replaces the extension codec registry.
    #[must_use]
    pub fn with_codecs(mut self, codecs: Codecs) -> Self {
        self.codecs = codecs;
        self
    }

    /// Replaces the set of tags that are never stored.
    #[must_use]
    pub fn with_skipped<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = TypeTag>,
    {
        self.skipped = tags.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets how many keys each `scan` call asks for when clearing the namespace.
    ///
    /// A count of zero is treated as one.
    #[must_use]
    pub fn with_scan_count(mut self, scan_count: usize) -> Self {
        self.scan_count = scan_count.max(1);
        self
    }

    pub(crate) fn flattener(&self) -> Flattener {
        Flattener::new(self.codecs.clone())
            .with_skipped(self.skipped.iter().cloned())
            .with_max_depth(self.max_depth)
    }
}

/// Settings for a single write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Seconds until both stored hashes expire.
    pub expire: Option<u64>,
}

impl SetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expires the stored value after `seconds`.
    ///
    /// The expiry is applied after the write, as a separate step.
    #[must_use]
    pub fn with_expire(mut self, seconds: u64) -> Self {
        self.expire = Some(seconds);
        self
    }
}
