//! Type tags stored next to every flattened leaf.
//!
//! Each leaf is stored as text, so the type it had is recorded separately in a
//! parallel hash. Primitive tags are written as single-digit codes; extension
//! tags are written as the extension's type name.
//!
//! | Tag | Stored as |
//! |-----|-----------|
//! | `Object` (null, arrays, objects) | `0` |
//! | `String` | `1` |
//! | `Number` | `2` |
//! | `Boolean` | `3` |
//! | `Function` | `4` |
//! | `Undefined` | `5` |
//! | `Symbol` | `6` |
//! | extension | its type name, e.g. `Date` |

use crate::Value;
use std::fmt;

/// The type recorded for a flattened leaf.
///
/// # Examples
///
/// ```rust
/// use json_cache::{classify, TypeTag, Value};
///
/// assert_eq!(classify(&Value::Null), TypeTag::Object);
/// assert_eq!(classify(&Value::from(1)), TypeTag::Number);
/// assert_eq!(TypeTag::Number.as_code(), "2");
/// assert_eq!(TypeTag::from_code("Date"), TypeTag::Extension("Date".into()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Object,
    String,
    Number,
    Boolean,
    Function,
    Undefined,
    Symbol,
    /// A caller-registered type, identified by name.
    Extension(String),
}

impl TypeTag {
    /// Returns the text this tag is stored as.
    #[must_use]
    pub fn as_code(&self) -> &str {
        match self {
            TypeTag::Object => "0",
            TypeTag::String => "1",
            TypeTag::Number => "2",
            TypeTag::Boolean => "3",
            TypeTag::Function => "4",
            TypeTag::Undefined => "5",
            TypeTag::Symbol => "6",
            TypeTag::Extension(name) => name,
        }
    }

    /// Reads a stored tag. Any text that is not a primitive code is an extension name.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => TypeTag::Object,
            "1" => TypeTag::String,
            "2" => TypeTag::Number,
            "3" => TypeTag::Boolean,
            "4" => TypeTag::Function,
            "5" => TypeTag::Undefined,
            "6" => TypeTag::Symbol,
            name => TypeTag::Extension(name.to_string()),
        }
    }

    #[must_use]
    pub const fn is_extension(&self) -> bool {
        matches!(self, TypeTag::Extension(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Returns the tag a value is stored under.
///
/// Null, arrays and objects share the `Object` tag; the stored text tells them
/// apart. Dates, big integers and custom values get extension tags named after
/// their type so a registered codec can restore them.
#[must_use]
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => TypeTag::Object,
        Value::String(_) => TypeTag::String,
        Value::Number(_) => TypeTag::Number,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Function(_) => TypeTag::Function,
        Value::Undefined => TypeTag::Undefined,
        Value::Symbol(_) => TypeTag::Symbol,
        Value::Date(_) => TypeTag::Extension(DATE_TYPE.to_string()),
        Value::BigInt(_) => TypeTag::Extension(BIGINT_TYPE.to_string()),
        Value::Custom { type_name, .. } => TypeTag::Extension(type_name.clone()),
    }
}

/// Extension name used for [`Value::Date`].
pub const DATE_TYPE: &str = "Date";

/// Extension name used for [`Value::BigInt`].
pub const BIGINT_TYPE: &str = "BigInt";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Map;
    use chrono::{TimeZone, Utc};
    use num_bigint::BigInt;

    #[test]
    fn test_containers_and_null_are_objects() {
        assert_eq!(classify(&Value::Null), TypeTag::Object);
        assert_eq!(classify(&Value::Array(vec![])), TypeTag::Object);
        assert_eq!(classify(&Value::Object(Map::new())), TypeTag::Object);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(classify(&Value::from("x")), TypeTag::String);
        assert_eq!(classify(&Value::from(1.5)), TypeTag::Number);
        assert_eq!(classify(&Value::from(false)), TypeTag::Boolean);
        assert_eq!(classify(&Value::Function("() => 1".into())), TypeTag::Function);
        assert_eq!(classify(&Value::Undefined), TypeTag::Undefined);
        assert_eq!(classify(&Value::Symbol("s".into())), TypeTag::Symbol);
    }

    #[test]
    fn test_extension_types() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(classify(&Value::Date(date)), TypeTag::Extension("Date".into()));
        assert_eq!(
            classify(&Value::BigInt(BigInt::from(7))),
            TypeTag::Extension("BigInt".into())
        );
        let point = Value::Custom {
            type_name: "Point".into(),
            data: "1,2".into(),
        };
        assert_eq!(classify(&point), TypeTag::Extension("Point".into()));
    }

    #[test]
    fn test_codes_round_trip() {
        for tag in [
            TypeTag::Object,
            TypeTag::String,
            TypeTag::Number,
            TypeTag::Boolean,
            TypeTag::Function,
            TypeTag::Undefined,
            TypeTag::Symbol,
            TypeTag::Extension("Money".into()),
        ] {
            assert_eq!(TypeTag::from_code(tag.as_code()), tag);
        }
    }
}
