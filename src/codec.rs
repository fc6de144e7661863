//! Conversion between leaf values and their stored text.
//!
//! [`encode_value`] renders one leaf to the string written into the data hash,
//! and [`decode_value`] turns stored text back into a [`Value`] using the leaf's
//! [`TypeTag`]. Primitive tags are handled here; extension tags go through the
//! stringifiers and parsers registered in [`Codecs`].
//!
//! Decoding never fails. Text that cannot be interpreted for its tag (including a
//! missing tag, or an extension without a parser) comes back as
//! [`Value::String`].
//!
//! ## Sentinels
//!
//! Leaves tagged `Object` are always one of three literals: `"null"`, `"{}"` or
//! `"[]"`. Non-empty containers never become leaves, because the flattener
//! descends into them.

use crate::tag::{BIGINT_TYPE, DATE_TYPE};
use crate::{Map, Number, TypeTag, Value};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders an extension value to text.
pub type Stringifier = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Restores an extension value from its text.
pub type Parser = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Registry of stringifiers and parsers for extension types, keyed by type name.
///
/// A stringifier and a parser can be registered independently. Registering only
/// one side is allowed: values then degrade to their default text on the way in,
/// or to raw text on the way out.
///
/// The registry is built once and shared read-only; cloning is cheap.
///
/// # Examples
///
/// ```rust
/// use json_cache::{Codecs, Value};
///
/// let codecs = Codecs::new().with_codec(
///     "Point",
///     |value| value.to_string(),
///     |text| Value::Custom { type_name: "Point".into(), data: text.to_string() },
/// );
/// assert!(codecs.has_parser("Point"));
/// ```
#[derive(Clone, Default)]
pub struct Codecs {
    stringifiers: HashMap<String, Stringifier>,
    parsers: HashMap<String, Parser>,
}

impl Codecs {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with codecs for [`Value::Date`] (RFC 3339) and
    /// [`Value::BigInt`] (decimal).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_cache::{Codecs, Value};
    /// use json_cache::codec::{decode_value, encode_value};
    /// use json_cache::TypeTag;
    ///
    /// let codecs = Codecs::standard();
    /// let tag = TypeTag::Extension("Date".into());
    /// let date = Value::Date("2024-05-01T12:00:00Z".parse().unwrap());
    ///
    /// let text = encode_value(&date, &tag, &codecs);
    /// assert_eq!(decode_value(Some(&tag), &text, &codecs), date);
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_codec(
                DATE_TYPE,
                |value| value.to_string(),
                |text| match DateTime::parse_from_rfc3339(text) {
                    Ok(dt) => Value::Date(dt.with_timezone(&Utc)),
                    Err(_) => Value::String(text.to_string()),
                },
            )
            .with_codec(
                BIGINT_TYPE,
                |value| value.to_string(),
                |text| match text.parse::<BigInt>() {
                    Ok(bi) => Value::BigInt(bi),
                    Err(_) => Value::String(text.to_string()),
                },
            )
    }

    /// Registers the function that renders values of `type_name`.
    #[must_use]
    pub fn with_stringifier<F>(mut self, type_name: &str, stringifier: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.stringifiers
            .insert(type_name.to_string(), Arc::new(stringifier));
        self
    }

    /// Registers the function that restores values of `type_name`.
    #[must_use]
    pub fn with_parser<F>(mut self, type_name: &str, parser: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.parsers.insert(type_name.to_string(), Arc::new(parser));
        self
    }

    /// Registers a matching stringifier and parser for `type_name`.
    #[must_use]
    pub fn with_codec<S, P>(self, type_name: &str, stringifier: S, parser: P) -> Self
    where
        S: Fn(&Value) -> String + Send + Sync + 'static,
        P: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.with_stringifier(type_name, stringifier)
            .with_parser(type_name, parser)
    }

    #[must_use]
    pub fn stringifier(&self, type_name: &str) -> Option<&Stringifier> {
        self.stringifiers.get(type_name)
    }

    #[must_use]
    pub fn parser(&self, type_name: &str) -> Option<&Parser> {
        self.parsers.get(type_name)
    }

    #[must_use]
    pub fn has_stringifier(&self, type_name: &str) -> bool {
        self.stringifiers.contains_key(type_name)
    }

    #[must_use]
    pub fn has_parser(&self, type_name: &str) -> bool {
        self.parsers.contains_key(type_name)
    }
}

impl fmt::Debug for Codecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stringifiers: Vec<_> = self.stringifiers.keys().collect();
        let mut parsers: Vec<_> = self.parsers.keys().collect();
        stringifiers.sort();
        parsers.sort();
        f.debug_struct("Codecs")
            .field("stringifiers", &stringifiers)
            .field("parsers", &parsers)
            .finish()
    }
}

/// Literal stored for `null`.
pub const NULL_SENTINEL: &str = "null";

/// Literal stored for an empty object.
pub const EMPTY_OBJECT_SENTINEL: &str = "{}";

/// Literal stored for an empty array.
pub const EMPTY_ARRAY_SENTINEL: &str = "[]";

/// Renders a leaf value to the text stored in the data hash.
///
/// # Examples
///
/// ```rust
/// use json_cache::codec::encode_value;
/// use json_cache::{classify, Codecs, Map, Value};
///
/// let codecs = Codecs::new();
/// let empty = Value::Object(Map::new());
/// assert_eq!(encode_value(&empty, &classify(&empty), &codecs), "{}");
/// assert_eq!(encode_value(&Value::from(30), &classify(&Value::from(30)), &codecs), "30");
/// ```
#[must_use]
pub fn encode_value(value: &Value, tag: &TypeTag, codecs: &Codecs) -> String {
    match (tag, value) {
        (TypeTag::Object, Value::Null) => NULL_SENTINEL.to_string(),
        (TypeTag::Object, Value::Array(arr)) if arr.is_empty() => EMPTY_ARRAY_SENTINEL.to_string(),
        (TypeTag::Object, Value::Object(obj)) if obj.is_empty() => {
            EMPTY_OBJECT_SENTINEL.to_string()
        }
        (TypeTag::Extension(name), _) => match codecs.stringifier(name) {
            Some(stringify) => stringify(value),
            None => value.to_string(),
        },
        // Containers render as JSON through Display
        _ => value.to_string(),
    }
}

/// Restores a leaf value from its stored text and tag.
///
/// `tag` is `None` when the type hash has no entry for the path; the text is
/// then returned as a string.
///
/// Function and symbol leaves come back as plain strings holding their stored
/// text. Nothing callable or identity-bearing survives storage.
///
/// # Examples
///
/// ```rust
/// use json_cache::codec::decode_value;
/// use json_cache::{Codecs, TypeTag, Value};
///
/// let codecs = Codecs::new();
/// assert_eq!(decode_value(Some(&TypeTag::Number), "30", &codecs), Value::from(30));
/// assert_eq!(decode_value(Some(&TypeTag::Boolean), "true", &codecs), Value::Bool(true));
/// assert_eq!(decode_value(None, "30", &codecs), Value::from("30"));
/// ```
#[must_use]
pub fn decode_value(tag: Option<&TypeTag>, text: &str, codecs: &Codecs) -> Value {
    let tag = match tag {
        Some(tag) => tag,
        None => return Value::String(text.to_string()),
    };

    match tag {
        TypeTag::String | TypeTag::Function | TypeTag::Symbol => Value::String(text.to_string()),
        TypeTag::Number => Value::Number(Number::parse_lenient(text)),
        TypeTag::Boolean => Value::Bool(text == "true"),
        TypeTag::Undefined => Value::Undefined,
        TypeTag::Object => decode_object(text),
        TypeTag::Extension(name) => match codecs.parser(name) {
            Some(parse) => parse(text),
            None => Value::String(text.to_string()),
        },
    }
}

fn decode_object(text: &str) -> Value {
    match text {
        NULL_SENTINEL => Value::Null,
        EMPTY_OBJECT_SENTINEL => Value::Object(Map::new()),
        EMPTY_ARRAY_SENTINEL => Value::Array(Vec::new()),
        // Written by another client as a whole JSON document
        other => serde_json::from_str(other).unwrap_or_else(|_| Value::String(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use chrono::TimeZone;

    fn round_trip(value: &Value, codecs: &Codecs) -> Value {
        let tag = classify(value);
        let text = encode_value(value, &tag, codecs);
        decode_value(Some(&tag), &text, codecs)
    }

    #[test]
    fn test_sentinels() {
        let codecs = Codecs::new();
        assert_eq!(encode_value(&Value::Null, &TypeTag::Object, &codecs), "null");
        assert_eq!(
            encode_value(&Value::Array(vec![]), &TypeTag::Object, &codecs),
            "[]"
        );
        assert_eq!(decode_value(Some(&TypeTag::Object), "{}", &codecs), Value::Object(Map::new()));
        assert_eq!(decode_value(Some(&TypeTag::Object), "[]", &codecs), Value::Array(vec![]));
        assert_eq!(decode_value(Some(&TypeTag::Object), "null", &codecs), Value::Null);
    }

    #[test]
    fn test_non_empty_container_encodes_as_json() {
        let codecs = Codecs::new();
        let arr = Value::Array(vec![Value::from(1), Value::from("x")]);
        let text = encode_value(&arr, &TypeTag::Object, &codecs);
        assert_eq!(text, r#"[1,"x"]"#);
        assert_eq!(decode_value(Some(&TypeTag::Object), &text, &codecs), arr);
    }

    #[test]
    fn test_malformed_object_text_is_returned_raw() {
        let codecs = Codecs::new();
        assert_eq!(
            decode_value(Some(&TypeTag::Object), "{oops", &codecs),
            Value::from("{oops")
        );
    }

    #[test]
    fn test_scalars_round_trip() {
        let codecs = Codecs::new();
        for value in [
            Value::from("hello"),
            Value::from(""),
            Value::from(42),
            Value::from(-3.25),
            Value::from(2.0),
            Value::Number(Number::Infinity),
            Value::Bool(true),
            Value::Bool(false),
            Value::Undefined,
        ] {
            assert_eq!(round_trip(&value, &codecs), value);
        }
    }

    #[test]
    fn test_function_and_symbol_come_back_as_text() {
        let codecs = Codecs::new();
        let func = Value::Function("function f() { return 1; }".into());
        assert_eq!(
            round_trip(&func, &codecs),
            Value::from("function f() { return 1; }")
        );
        let sym = Value::Symbol("token".into());
        assert_eq!(round_trip(&sym, &codecs), Value::from("Symbol(token)"));
    }

    #[test]
    fn test_boolean_only_true_literal_is_true() {
        let codecs = Codecs::new();
        assert_eq!(decode_value(Some(&TypeTag::Boolean), "TRUE", &codecs), Value::Bool(false));
        assert_eq!(decode_value(Some(&TypeTag::Boolean), "1", &codecs), Value::Bool(false));
    }

    #[test]
    fn test_extension_without_codecs_degrades_to_text() {
        let codecs = Codecs::new();
        let date = Value::Date(Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(round_trip(&date, &codecs), Value::from("2020-02-29T00:00:00+00:00"));
    }

    #[test]
    fn test_standard_codecs_restore_dates_and_bigints() {
        let codecs = Codecs::standard();
        let date = Value::Date(Utc.with_ymd_and_hms(2020, 2, 29, 13, 14, 15).unwrap());
        assert_eq!(round_trip(&date, &codecs), date);

        let big = Value::BigInt("123456789012345678901234567890".parse().unwrap());
        assert_eq!(round_trip(&big, &codecs), big);
    }

    #[test]
    fn test_parser_without_stringifier() {
        let codecs = Codecs::new().with_parser("Upper", |text| Value::from(text.to_uppercase()));
        let custom = Value::Custom {
            type_name: "Upper".into(),
            data: "shout".into(),
        };
        assert_eq!(round_trip(&custom, &codecs), Value::from("SHOUT"));
    }

    #[test]
    fn test_stringifier_is_used_for_extension() {
        let codecs = Codecs::new().with_stringifier("Point", |value| match value {
            Value::Custom { data, .. } => format!("<{}>", data),
            other => other.to_string(),
        });
        let point = Value::Custom {
            type_name: "Point".into(),
            data: "1,2".into(),
        };
        let tag = classify(&point);
        assert_eq!(encode_value(&point, &tag, &codecs), "<1,2>");
        // No parser registered
        assert_eq!(decode_value(Some(&tag), "<1,2>", &codecs), Value::from("<1,2>"));
    }

    #[test]
    fn test_debug_lists_registered_names() {
        let debug = format!("{:?}", Codecs::standard());
        assert!(debug.contains("BigInt"));
        assert!(debug.contains("Date"));
    }
}
