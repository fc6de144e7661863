use json_cache::{value, Map, Number, Value};

#[test]
fn test_value_macro_null() {
    assert_eq!(value!(null), Value::Null);
}

#[test]
fn test_value_macro_booleans() {
    assert_eq!(value!(true), Value::Bool(true));
    assert_eq!(value!(false), Value::Bool(false));
}

#[test]
fn test_value_macro_numbers() {
    assert_eq!(value!(42), Value::Number(Number::Integer(42)));
    assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(value!(-123), Value::Number(Number::Integer(-123)));
    assert_eq!(value!([(-1), 2]), Value::Array(vec![Value::from(-1), Value::from(2)]));
}

#[test]
fn test_value_macro_strings() {
    assert_eq!(value!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(value!(""), Value::String(String::new()));
}

#[test]
fn test_value_macro_arrays() {
    assert_eq!(value!([]), Value::Array(vec![]));
    assert_eq!(
        value!([1, "two", null, [true]]),
        Value::Array(vec![
            Value::from(1),
            Value::from("two"),
            Value::Null,
            Value::Array(vec![Value::Bool(true)]),
        ])
    );
}

#[test]
fn test_value_macro_objects_keep_insertion_order() {
    let obj = value!({ "b": 1, "a": 2, "c": {} });
    let keys: Vec<&String> = obj.as_object().map(|o| o.keys().collect()).unwrap_or_default();
    assert_eq!(keys, ["b", "a", "c"]);
    assert_eq!(obj.get("c"), Some(&Value::Object(Map::new())));
}

#[test]
fn test_value_macro_expressions() {
    let name = String::from("Alice");
    let scores = vec![1, 2];
    let user = value!({ "name": name, "scores": scores, "dots": "a.b" });
    assert_eq!(user.get("name").and_then(Value::as_str), Some("Alice"));
    assert_eq!(user.get("scores"), Some(&value!([1, 2])));
}

#[test]
fn test_value_macro_trailing_commas() {
    assert_eq!(value!([1, 2,]), value!([1, 2]));
    assert_eq!(value!({ "a": 1, }), value!({ "a": 1 }));
}
