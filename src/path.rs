//! Dotted paths that address leaves inside a flattened value.
//!
//! A path is a list of segments joined by `.`: `address.city`, `tags.0`,
//! `orders.2.items.0.sku`. A segment that is a plain non-negative integer
//! addresses an array element; anything else is an object key.
//!
//! Keys may themselves contain `.`. Before joining, every literal `.` in a key is
//! escaped as `/.`, and splitting only breaks on a `.` that is not preceded by
//! `/`:
//!
//! ```rust
//! use json_cache::path::{encode_segment, join_path, split_path, decode_segment};
//!
//! let path = join_path("config", &encode_segment("db.host"));
//! assert_eq!(path, "config.db/.host");
//!
//! let segments = split_path(&path);
//! assert_eq!(segments, vec!["config", "db/.host"]);
//! assert_eq!(decode_segment(segments[1]), "db.host");
//! ```
//!
//! The escape marker itself is not escaped, so a key that *ends* in `/` followed
//! by a nested key reads back as one segment. Stores written by other clients of
//! the same format rely on this exact encoding.

use std::fmt;

/// Separates path segments.
pub const DELIMITER: char = '.';

/// Marks a delimiter that belongs to a key.
pub const ESCAPE: char = '/';

const ESCAPED_DELIMITER: &str = "/.";

/// One decoded level of a path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An array position.
    Index(usize),
    /// An object key, with escapes removed.
    Key(String),
}

impl Segment {
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// Returns the segment as an object key.
    #[must_use]
    pub fn into_key(self) -> String {
        match self {
            Segment::Index(i) => i.to_string(),
            Segment::Key(key) => key,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Key(key) => f.write_str(&encode_segment(key)),
        }
    }
}

/// Escapes every delimiter in a key so it can be joined into a path.
#[must_use]
pub fn encode_segment(key: &str) -> String {
    key.replace(DELIMITER, ESCAPED_DELIMITER)
}

/// Reverses [`encode_segment`].
#[must_use]
pub fn decode_segment(segment: &str) -> String {
    segment.replace(ESCAPED_DELIMITER, ".")
}

/// Appends an already encoded segment to a path.
///
/// # Examples
///
/// ```rust
/// use json_cache::path::join_path;
///
/// assert_eq!(join_path("", "name"), "name");
/// assert_eq!(join_path("user", "name"), "user.name");
/// ```
#[must_use]
pub fn join_path(base: &str, encoded_segment: &str) -> String {
    if base.is_empty() {
        encoded_segment.to_string()
    } else {
        let mut path = String::with_capacity(base.len() + 1 + encoded_segment.len());
        path.push_str(base);
        path.push(DELIMITER);
        path.push_str(encoded_segment);
        path
    }
}

/// Builds a path from raw key names, escaping each one.
///
/// Useful for naming fields to fetch when a key contains a `.`.
///
/// # Examples
///
/// ```rust
/// use json_cache::path::encode_path;
///
/// assert_eq!(encode_path(["servers", "eu.west", "0"]), "servers.eu/.west.0");
/// ```
#[must_use]
pub fn encode_path<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter().fold(String::new(), |path, key| {
        join_path(&path, &encode_segment(key.as_ref()))
    })
}

/// Splits a path on unescaped delimiters. Segments are returned still encoded.
///
/// # Examples
///
/// ```rust
/// use json_cache::path::split_path;
///
/// assert_eq!(split_path("a.b/.c.0"), vec!["a", "b/.c", "0"]);
/// assert_eq!(split_path(""), vec![""]);
/// ```
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev = None;

    for (i, c) in path.char_indices() {
        if c == DELIMITER && prev != Some(ESCAPE) {
            segments.push(&path[start..i]);
            start = i + c.len_utf8();
        }
        prev = Some(c);
    }
    segments.push(&path[start..]);
    segments
}

/// Decodes a segment and decides whether it addresses an array element.
///
/// Only canonical non-negative integers (`0`, `7`, `42`, never `007`, `-1` or
/// `1.5`) are indices. This is the one place where array structure is inferred.
///
/// # Examples
///
/// ```rust
/// use json_cache::path::{segment_as_index_or_key, Segment};
///
/// assert_eq!(segment_as_index_or_key("3"), Segment::Index(3));
/// assert_eq!(segment_as_index_or_key("03"), Segment::Key("03".into()));
/// assert_eq!(segment_as_index_or_key("a/.b"), Segment::Key("a.b".into()));
/// ```
#[must_use]
pub fn segment_as_index_or_key(segment: &str) -> Segment {
    let key = decode_segment(segment);
    match parse_index(&key) {
        Some(index) => Segment::Index(index),
        None => Segment::Key(key),
    }
}

fn parse_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}
