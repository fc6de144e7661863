//! Flattening nested values into path-keyed text, and rebuilding them.
//!
//! [`Flattener::flatten`] walks a [`Value`] and produces a [`Flattened`]: one map
//! from path to stored text and a parallel map from path to [`TypeTag`].
//! [`Flattener::unflatten`] reverses it, using the tags to restore scalar types
//! and the shape of each path to decide between arrays and objects.
//!
//! ```rust
//! use json_cache::{value, Flattener, TypeTag};
//!
//! let flattener = Flattener::default();
//! let user = value!({ "name": "Alice", "tags": ["admin"] });
//!
//! let flat = flattener.flatten(&user).unwrap();
//! assert_eq!(flat.data()["name"], "Alice");
//! assert_eq!(flat.data()["tags.0"], "admin");
//! assert_eq!(flat.type_info()["tags.0"], TypeTag::String);
//!
//! assert_eq!(flattener.unflatten(&flat), user);
//! ```
//!
//! Empty containers and top-level scalars flatten to a single entry at the empty
//! path `""`, which unflattens back to that single value.

use crate::codec::{decode_value, encode_value};
use crate::path::{encode_segment, join_path, segment_as_index_or_key, split_path, Segment};
use crate::{classify, Codecs, Error, Result, TypeTag, Value};
use indexmap::IndexMap;
use tracing::warn;

/// Default limit on how deeply a value may nest before flattening fails.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Most holes an array level may contain when rebuilt.
///
/// A level whose indices would leave more holes becomes an object keyed by the
/// index text, so stored data cannot force a huge allocation.
pub const MAX_INDEX_GAP: usize = 10_000;

/// The flat form of a value: path to stored text, and path to type tag.
///
/// Produced by [`Flattener::flatten`] with identical key sets in both maps.
/// A representation read back from a store may lack some tags; those leaves
/// decode as raw text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flattened {
    data: IndexMap<String, String>,
    type_info: IndexMap<String, TypeTag>,
}

impl Flattened {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a representation from maps read back from storage.
    #[must_use]
    pub fn from_parts(data: IndexMap<String, String>, type_info: IndexMap<String, TypeTag>) -> Self {
        Flattened { data, type_info }
    }

    /// Records one leaf in both maps.
    pub fn insert(&mut self, path: String, text: String, tag: TypeTag) {
        self.type_info.insert(path.clone(), tag);
        self.data.insert(path, text);
    }

    #[must_use]
    pub fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }

    #[must_use]
    pub fn type_info(&self) -> &IndexMap<String, TypeTag> {
        &self.type_info
    }

    /// Returns the stored text and tag at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<(&str, Option<&TypeTag>)> {
        self.data
            .get(path)
            .map(|text| (text.as_str(), self.type_info.get(path)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Keeps only the leaves at `field` or below it.
    ///
    /// A path is kept when it equals one of the requested fields or starts with
    /// the field followed by the delimiter. Fields are given in their stored
    /// (encoded) form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::{value, Flattener};
    ///
    /// let flattener = Flattener::default();
    /// let flat = flattener
    ///     .flatten(&value!({ "name": "Alice", "address": { "city": "NYC" } }))
    ///     .unwrap();
    ///
    /// let picked = flat.select(&["address"]);
    /// assert_eq!(flattener.unflatten(&picked), value!({ "address": { "city": "NYC" } }));
    /// ```
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, fields: &[S]) -> Flattened {
        let prefixes: Vec<String> = fields
            .iter()
            .map(|field| format!("{}.", field.as_ref()))
            .collect();

        let mut selected = Flattened::new();
        for (path, text) in &self.data {
            let wanted = fields.iter().any(|field| path == field.as_ref())
                || prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()));
            if !wanted {
                continue;
            }
            selected.data.insert(path.clone(), text.clone());
            if let Some(tag) = self.type_info.get(path) {
                selected.type_info.insert(path.clone(), tag.clone());
            }
        }
        selected
    }

    /// Splits into the data map and the type map.
    #[must_use]
    pub fn into_parts(self) -> (IndexMap<String, String>, IndexMap<String, TypeTag>) {
        (self.data, self.type_info)
    }
}

/// Converts values to and from their [`Flattened`] form.
///
/// Holds the extension [`Codecs`], the set of tags that are never stored, and
/// the nesting limit. A flattener is immutable once built and can be shared
/// between threads.
///
/// # Examples
///
/// ```rust
/// use json_cache::{Codecs, Flattener, TypeTag};
///
/// let flattener = Flattener::new(Codecs::standard())
///     .with_skipped([TypeTag::Symbol, TypeTag::Function])
///     .with_max_depth(32);
/// assert!(flattener.is_skipped(&TypeTag::Function));
/// ```
#[derive(Clone, Debug)]
pub struct Flattener {
    codecs: Codecs,
    skipped: Vec<TypeTag>,
    max_depth: usize,
}

impl Default for Flattener {
    fn default() -> Self {
        Flattener::new(Codecs::standard())
    }
}

impl Flattener {
    /// Creates a flattener that skips symbols and allows [`DEFAULT_MAX_DEPTH`] levels.
    #[must_use]
    pub fn new(codecs: Codecs) -> Self {
        Flattener {
            codecs,
            skipped: vec![TypeTag::Symbol],
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replaces the set of tags whose leaves are left out when flattening.
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

    #[must_use]
    pub fn codecs(&self) -> &Codecs {
        &self.codecs
    }

    #[must_use]
    pub fn is_skipped(&self, tag: &TypeTag) -> bool {
        self.skipped.contains(tag)
    }

    /// Flattens a value into path-keyed text and tags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] if the value nests deeper than the
    /// configured limit.
    pub fn flatten(&self, value: &Value) -> Result<Flattened> {
        let mut result = Flattened::new();
        self.traverse(value, "", 0, &mut result)?;
        Ok(result)
    }

    fn traverse(&self, node: &Value, base_path: &str, depth: usize, result: &mut Flattened) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::depth_limit(self.max_depth));
        }

        match node {
            Value::Object(obj) if !obj.is_empty() => {
                for (key, child) in obj.iter() {
                    let path = join_path(base_path, &encode_segment(key));
                    self.visit(child, &path, depth, result)?;
                }
            }
            Value::Array(arr) if !arr.is_empty() => {
                for (index, child) in arr.iter().enumerate() {
                    let path = join_path(base_path, &index.to_string());
                    self.visit(child, &path, depth, result)?;
                }
            }
            leaf => self.assign(result, base_path, leaf),
        }
        Ok(())
    }

    fn visit(&self, child: &Value, path: &str, depth: usize, result: &mut Flattened) -> Result<()> {
        if child.is_container() {
            self.traverse(child, path, depth + 1, result)
        } else {
            self.assign(result, path, child);
            Ok(())
        }
    }

    fn assign(&self, result: &mut Flattened, path: &str, value: &Value) {
        let tag = classify(value);
        if self.is_skipped(&tag) {
            return;
        }
        let text = encode_value(value, &tag, &self.codecs);
        result.insert(path.to_string(), text, tag);
    }

    /// Rebuilds a value from its flattened form.
    ///
    /// An empty representation yields [`Value::Undefined`]. A lone entry at the
    /// empty path is returned as the whole value. The result does not depend on
    /// the order of the stored paths.
    #[must_use]
    pub fn unflatten(&self, flattened: &Flattened) -> Value {
        let mut leaves: Vec<(&str, Value)> = flattened
            .data()
            .iter()
            .map(|(path, text)| {
                let tag = flattened.type_info().get(path);
                (path.as_str(), decode_value(tag, text, &self.codecs))
            })
            .collect();

        if leaves.len() == 1 && leaves[0].0.is_empty() {
            if let Some((_, value)) = leaves.pop() {
                return value;
            }
        }

        let mut root = IndexMap::new();
        for (path, value) in leaves {
            if path.is_empty() {
                warn!("ignoring root-level leaf stored alongside nested fields");
                continue;
            }
            let segments: Vec<Segment> = split_path(path)
                .into_iter()
                .map(segment_as_index_or_key)
                .collect();
            insert_leaf(&mut root, segments, value);
        }

        if root.is_empty() {
            return Value::Undefined;
        }
        build(root)
    }
}

/// Paths grouped by segment, before any level is committed to being an array
/// or an object.
enum Node {
    Leaf(Value),
    Branch(IndexMap<Segment, Node>),
}

/// Files `value` under `segments`, creating branches on the way.
///
/// A leaf and a branch at the same path resolve to the branch, whichever
/// arrives first.
fn insert_leaf(root: &mut IndexMap<Segment, Node>, segments: Vec<Segment>, value: Value) {
    let mut children = root;
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.into_iter().enumerate() {
        if i == last {
            if let Some(Node::Branch(_)) = children.get(&segment) {
                warn!(segment = %segment, "ignoring leaf shadowed by nested fields");
            } else {
                children.insert(segment, Node::Leaf(value));
            }
            return;
        }

        let node = children
            .entry(segment)
            .or_insert_with(|| Node::Branch(IndexMap::new()));
        if let Node::Leaf(_) = node {
            *node = Node::Branch(IndexMap::new());
        }
        children = match node {
            Node::Branch(next) => next,
            Node::Leaf(_) => return,
        };
    }
}

/// Turns grouped paths into a value.
///
/// A level becomes an array when every segment is an index and filling the
/// holes between them needs at most [`MAX_INDEX_GAP`] extra slots. Holes hold
/// [`Value::Undefined`]. Any other level becomes an object holding exactly the
/// segments that were stored.
fn build(children: IndexMap<Segment, Node>) -> Value {
    let max_index = children
        .keys()
        .try_fold(0usize, |max, segment| match segment {
            Segment::Index(index) => Some(max.max(*index)),
            Segment::Key(_) => None,
        });

    match max_index {
        Some(max) if max - children.len().saturating_sub(1) <= MAX_INDEX_GAP => {
            let mut arr = vec![Value::Undefined; max + 1];
            for (segment, node) in children {
                if let Segment::Index(index) = segment {
                    arr[index] = build_node(node);
                }
            }
            Value::Array(arr)
        }
        _ => Value::Object(
            children
                .into_iter()
                .map(|(segment, node)| (segment.into_key(), build_node(node)))
                .collect(),
        ),
    }
}

fn build_node(node: Node) -> Value {
    match node {
        Node::Leaf(value) => value,
        Node::Branch(children) => build(children),
    }
}
