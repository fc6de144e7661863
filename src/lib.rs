//! # json_cache
//!
//! Store nested JSON-like values in a key-value store as flat, typed hash
//! fields, and read them back whole or field by field.
//!
//! ## How values are stored
//!
//! A value is flattened into one entry per leaf, keyed by its dotted path:
//!
//! ```text
//! { "name": "Alice", "age": 30, "address": { "city": "NYC" }, "tags": ["a"] }
//!
//! jc:user     name → Alice    age → 30    address.city → NYC    tags.0 → a
//! jc:user_t   name → 1        age → 2     address.city → 1      tags.0 → 1
//! ```
//!
//! The second hash records a type code per path, so `30` comes back as a
//! number rather than the string `"30"`. Arrays are recognised from numeric
//! path segments. Literal dots in keys are escaped as `/.`.
//!
//! ## Key Features
//!
//! - **Typed round-trips**: strings, numbers, booleans, `null`, `undefined`,
//!   empty containers and registered extension types (dates, big integers,
//!   your own) all come back as they went in
//! - **Partial reads**: fetch only `address` or `tags` without rebuilding the
//!   rest of the value
//! - **Pluggable storage**: any hash-capable store behind the async
//!   [`HashStore`] trait; [`MemoryStore`] ships for tests and development
//! - **Serde bridge**: [`JsonCache::set_as`] and [`JsonCache::get_as`] work with
//!   any `Serialize`/`Deserialize` type
//!
//! ## Quick Start
//!
//! ```rust
//! use json_cache::{value, JsonCache, MemoryStore};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! # rt.block_on(async {
//! let cache = JsonCache::new(MemoryStore::new());
//!
//! let user = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "address": { "city": "NYC", "zip": "10001" }
//! });
//! cache.set("user", &user).await.unwrap();
//!
//! assert_eq!(cache.get("user", &[]).await.unwrap(), Some(user));
//! assert_eq!(
//!     cache.get("user", &["address.city"]).await.unwrap(),
//!     Some(value!({ "address": { "city": "NYC" } }))
//! );
//! # });
//! ```
//!
//! ### Flattening without a store
//!
//! ```rust
//! use json_cache::{flatten, unflatten, value};
//!
//! let flat = flatten(&value!({ "a.b": [1, 2] })).unwrap();
//! assert_eq!(flat.data()["a/.b.1"], "2");
//! assert_eq!(unflatten(&flat), value!({ "a.b": [1, 2] }));
//! ```
//!
//! ### Extension types
//!
//! ```rust
//! use json_cache::{Codecs, Flattener, Value};
//!
//! let codecs = Codecs::standard().with_codec(
//!     "Point",
//!     |v| match v {
//!         Value::Custom { data, .. } => data.clone(),
//!         other => other.to_string(),
//!     },
//!     |text| Value::Custom { type_name: "Point".into(), data: text.to_string() },
//! );
//! let flattener = Flattener::new(codecs);
//!
//! let point = Value::Custom { type_name: "Point".into(), data: "1,2".into() };
//! let flat = flattener.flatten(&point).unwrap();
//! assert_eq!(flattener.unflatten(&flat), point);
//! ```
//!
//! ## Consistency
//!
//! Each write touches two hashes and is not atomic. If the store fails between
//! the two writes, the data and its type codes can disagree; fields without a
//! type code read back as strings.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - storing and reading a value
//! - **`partial_fields.rs`** - selective reads, single leaves, expiry
//! - **`custom_types.rs`** - dates, big integers, a custom codec and typed structs
//!
//! Run any example with: `cargo run --example <name>`

pub mod cache;
pub mod codec;
pub mod de;
pub mod error;
pub mod flatten;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod ser;
pub mod store;
pub mod tag;
pub mod value;

pub use cache::JsonCache;
pub use codec::Codecs;
pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use flatten::{Flattened, Flattener};
pub use map::Map;
pub use options::{CacheOptions, SetOptions};
pub use ser::{to_value, ValueSerializer};
pub use store::{FieldMap, HashStore, MemoryStore};
pub use tag::{classify, TypeTag};
pub use value::{Number, Value};

/// Flattens a value with the standard codecs and default settings.
///
/// # Examples
///
/// ```rust
/// use json_cache::{flatten, value, TypeTag};
///
/// let flat = flatten(&value!({ "age": 30 })).unwrap();
/// assert_eq!(flat.data()["age"], "30");
/// assert_eq!(flat.type_info()["age"], TypeTag::Number);
/// ```
///
/// # Errors
///
/// Returns [`Error::DepthLimitExceeded`] for values nested too deeply.
pub fn flatten(value: &Value) -> Result<Flattened> {
    Flattener::default().flatten(value)
}

/// Rebuilds a value with the standard codecs.
#[must_use]
pub fn unflatten(flattened: &Flattened) -> Value {
    Flattener::default().unflatten(flattened)
}
