/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Object keys must be string literals. Anything that is not `null`, `true`,
/// `false`, an array or an object is converted with [`to_value`](crate::to_value),
/// falling back to `Null` if that fails.
///
/// ```rust
/// use json_cache::{value, Value};
///
/// let user = value!({
///     "name": "Alice",
///     "age": 30,
///     "tags": ["admin", "ops"],
///     "manager": null
/// });
/// assert_eq!(user.get("name"), Some(&Value::from("Alice")));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
