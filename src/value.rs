//! Dynamic value representation for cached data.
//!
//! This module provides the [`Value`] enum, the tree the flattener walks and the
//! unflattener rebuilds. Besides the JSON kinds it models the handful of extra
//! kinds a cached document can carry: `undefined`, function source text, symbol
//! descriptions, dates, big integers and caller-defined custom types.
//!
//! ## Core Types
//!
//! - [`Value`]: any cacheable value
//! - [`Number`]: integers, floats and the special values (Infinity, -Infinity, NaN)
//!
//! ## Creating Values
//!
//! ```rust
//! use json_cache::{value, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let user = value!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(user.is_object());
//! ```
//!
//! ## Converting from Rust Types
//!
//! ```rust
//! use json_cache::{to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value: Value = to_value(&Point { x: 10, y: 20 }).unwrap();
//! assert_eq!(value.as_object().map(|obj| obj.len()), Some(2));
//! ```

use crate::Map;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed value that can be flattened into a hash and restored.
///
/// `Null`, `Bool`, `Number`, `String`, `Array` and `Object` are the JSON kinds and
/// round-trip exactly. The remaining variants are stored as text alongside a type
/// tag:
///
/// - `Undefined` round-trips as itself.
/// - `Function` and `Symbol` hold only their text and come back as
///   [`Value::String`]; nothing executable or identity-bearing is kept.
/// - `Date`, `BigInt` and `Custom` are extension types. They round-trip when a
///   matching parser is registered in [`Codecs`](crate::Codecs) and come back as
///   raw text otherwise.
///
/// # Examples
///
/// ```rust
/// use json_cache::{Number, Value};
///
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::from("hello");
///
/// assert_eq!(text.as_str(), Some("hello"));
/// assert_eq!(num.to_string(), "42");
/// assert!(Value::from(vec![num]).is_array());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Undefined,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    /// Source text of a function.
    Function(String),
    /// Description of a symbol.
    Symbol(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    /// A value of a caller-defined type, already rendered to text.
    ///
    /// `type_name` doubles as the extension tag the value is stored under.
    Custom { type_name: String, data: String },
}

/// A numeric value: an integer, a float, or one of the non-finite specials.
///
/// # Examples
///
/// ```rust
/// use json_cache::Number;
///
/// let float = Number::Float(3.5);
///
/// assert_eq!(float.as_f64(), 3.5);
/// assert_eq!(Number::Infinity.as_f64(), f64::INFINITY);
/// assert_eq!(Number::Integer(42).to_string(), "42");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    /// Converts this number to an `f64`. Always succeeds.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }

    /// Builds a number from an `f64`, mapping non-finite values to the special variants.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Number::NaN
        } else if value == f64::INFINITY {
            Number::Infinity
        } else if value == f64::NEG_INFINITY {
            Number::NegativeInfinity
        } else {
            Number::Float(value)
        }
    }

    /// Parses stored numeric text leniently.
    ///
    /// Surrounding whitespace is ignored, empty text is zero, `0x` prefixes are
    /// hexadecimal, and anything unparseable is `NaN`. Never fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::Number;
    ///
    /// assert_eq!(Number::parse_lenient("30"), Number::Integer(30));
    /// assert_eq!(Number::parse_lenient("2.5"), Number::Float(2.5));
    /// assert_eq!(Number::parse_lenient(" "), Number::Integer(0));
    /// assert_eq!(Number::parse_lenient("-Infinity"), Number::NegativeInfinity);
    /// assert!(matches!(Number::parse_lenient("abc"), Number::NaN));
    /// ```
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let s = text.trim();
        match s {
            "" => return Number::Integer(0),
            "Infinity" | "+Infinity" => return Number::Infinity,
            "-Infinity" => return Number::NegativeInfinity,
            _ => {}
        }

        if let Ok(i) = s.parse::<i64>() {
            return Number::Integer(i);
        }

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return i64::from_str_radix(hex, 16)
                .map(Number::Integer)
                .unwrap_or(Number::NaN);
        }

        // Spelled-out "inf" and "nan" are not numbers here
        if s
            .bytes()
            .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
        {
            return Number::NaN;
        }

        s.parse::<f64>()
            .map(Number::from_f64)
            .unwrap_or(Number::NaN)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional marker ("3.0"), so floats stay floats when parsed back
            Number::Float(fl) if fl.is_finite() => write!(f, "{:?}", fl),
            Number::Float(fl) => write!(f, "{}", Number::from_f64(*fl)),
            Number::Infinity => write!(f, "Infinity"),
            Number::NegativeInfinity => write!(f, "-Infinity"),
            Number::NaN => write!(f, "NaN"),
        }
    }
}

impl Value {
    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` for arrays and objects, the two kinds the flattener descends into.
    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a number, returns it as `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a field of an object or an element of an array by its key text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::value;
    ///
    /// let user = value!({ "tags": ["a", "b"] });
    /// let tags = user.get("tags").unwrap();
    /// assert_eq!(tags.get("1").and_then(|v| v.as_str()), Some("b"));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        }
    }
}

/// Writes the value's default textual form.
///
/// This is the text an extension value is stored as when no stringifier is
/// registered for its type. Containers render as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) | Value::Function(s) => write!(f, "{}", s),
            Value::Symbol(desc) => write!(f, "Symbol({})", desc),
            Value::Array(_) | Value::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
            Value::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::Custom { data, .. } => write!(f, "{}", data),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Undefined => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::Number(Number::Infinity) => serializer.serialize_f64(f64::INFINITY),
            Value::Number(Number::NegativeInfinity) => serializer.serialize_f64(f64::NEG_INFINITY),
            Value::Number(Number::NaN) => serializer.serialize_f64(f64::NAN),
            Value::String(s) | Value::Function(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::BigInt(bi) => match i64::try_from(bi) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_str(&bi.to_string()),
            },
            Value::Custom { data, .. } => serializer.serialize_str(data),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(small) => Value::Number(Number::Integer(small)),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(match i64::try_from(value) {
                    Ok(small) => Value::Number(Number::Integer(small)),
                    Err(_) => Value::BigInt(BigInt::from(value)),
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from_f64(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(small) => Value::Number(Number::Integer(small)),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::from_f64(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}
