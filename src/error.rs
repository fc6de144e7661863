//! Error types for flattening, caching and the serde bridge.
//!
//! Decoding stored text never fails: unknown or missing type tags fall back to
//! the raw string. Errors therefore come from only a few places:
//!
//! - **Store errors**: whatever the [`HashStore`](crate::HashStore) backend
//!   reports, passed through untouched as the error source
//! - **Depth limit**: a value nested deeper than the flattener allows
//! - **Serde bridge**: a Rust type that cannot be represented as a [`Value`](crate::Value),
//!   or a cached value that does not fit the requested type
//!
//! ## Examples
//!
//! ```rust
//! use json_cache::{from_value, Error, Value};
//!
//! let result: Result<u32, Error> = from_value(Value::from("not a number"));
//! assert!(result.is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the key-value store backend
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Value nested deeper than the configured limit
    #[error("value nesting exceeds the maximum depth of {max_depth}")]
    DepthLimitExceeded { max_depth: usize },

    /// Unsupported type for conversion into a value
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Wraps a store backend error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
    /// let err = Error::store(io);
    /// assert!(err.to_string().contains("reset by peer"));
    /// ```
    pub fn store<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Store(err.into())
    }

    /// Creates a depth limit error.
    pub fn depth_limit(max_depth: usize) -> Self {
        Error::DepthLimitExceeded { max_depth }
    }

    /// Creates an unsupported type error for types that have no value representation.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` if the error came from the store backend.
    #[must_use]
    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
