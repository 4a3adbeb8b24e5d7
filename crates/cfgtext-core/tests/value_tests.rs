use cfgtext_core::{ClassObject, Color, Dictionary, Value, Vector2, CLASS_KEY};
use serde_json::json;

#[test]
fn class_object_dictionary_view_puts_class_first() {
    let obj = ClassObject::new("Resource")
        .with_property("name", "icon")
        .with_property("size", 3);
    let view = obj.to_dictionary();
    let keys: Vec<&str> = view.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![CLASS_KEY, "name", "size"]);
    assert_eq!(view[CLASS_KEY], Value::from("Resource"));
}

#[test]
fn accessors_match_variant() {
    assert!(Value::Null.is_null());
    assert!(Value::default().is_null());
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
    assert_eq!(Value::from(7).as_f64(), Some(7.0));
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(
        Value::from(Color::new(1.0, 0.0, 0.0, 1.0)).as_color(),
        Some(&Color::new(1.0, 0.0, 0.0, 1.0))
    );
    assert_eq!(
        Value::from(Vector2::new(1.0, 2.0)).as_vector2().map(|v| v.y),
        Some(2.0)
    );
    assert_eq!(Value::from(vec![Value::Null]).as_array().map(<[Value]>::len), Some(1));
    assert!(Value::from(Dictionary::new()).as_dictionary().is_some());
    assert_eq!(
        Value::from(ClassObject::new("Foo")).as_object().map(|o| o.class_name.as_str()),
        Some("Foo")
    );

    assert_eq!(Value::from("1").as_f64(), None);
    assert_eq!(Value::Number(1.0).as_bool(), None);
    assert!(Value::from(ClassObject::new("Foo")).as_dictionary().is_none());
}

#[test]
fn type_names() {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(Value::from(false).type_name(), "bool");
    assert_eq!(Value::from(1).type_name(), "number");
    assert_eq!(Value::from("x").type_name(), "string");
    assert_eq!(Value::from(Color::default()).type_name(), "Color");
    assert_eq!(Value::from(Vector2::default()).type_name(), "Vector2");
    assert_eq!(Value::from(Vec::<Value>::new()).type_name(), "array");
    assert_eq!(Value::from(Dictionary::new()).type_name(), "dictionary");
    assert_eq!(Value::from(ClassObject::new("A")).type_name(), "Object");
}

#[test]
fn dictionary_with_color_keys_is_not_a_color() {
    let mut map = Dictionary::new();
    for key in ["r", "g", "b", "a"] {
        map.insert(key.to_string(), Value::Number(1.0));
    }
    let value = Value::from(map);
    assert!(value.as_color().is_none());
    assert_eq!(value.to_string(), r#"{"r": 1, "g": 1, "b": 1, "a": 1}"#);
}

#[test]
fn from_str_parses_value_text() {
    let value: Value = "Vector2(3, 4)".parse().unwrap();
    assert_eq!(value, Value::from(Vector2::new(3.0, 4.0)));
    assert!("Vector2(3)".parse::<Value>().is_err());
}

#[test]
fn nan_is_not_equal_to_itself() {
    let a = Value::Number(f64::NAN);
    assert_ne!(a, a.clone());
}

// ============================================================================
// JSON view
// ============================================================================

#[test]
fn json_view_of_scalars() {
    let value = Value::from(vec![
        Value::Null,
        Value::from(true),
        Value::from(1.5),
        Value::from("s"),
    ]);
    assert_eq!(serde_json::to_value(&value).unwrap(), json!([null, true, 1.5, "s"]));
}

#[test]
fn json_view_of_non_finite_numbers() {
    let value = Value::from(vec![
        Value::Number(f64::NAN),
        Value::Number(f64::INFINITY),
        Value::Number(f64::NEG_INFINITY),
        Value::Number(1.5),
    ]);
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!(["nan", "inf", "-inf", 1.5])
    );
}

#[test]
fn json_view_of_constructed_types() {
    let value = Value::from(vec![
        Color::new(1.0, 0.5, 0.0, 1.0).into(),
        Vector2::new(2.0, f64::INFINITY).into(),
        ClassObject::new("Resource").with_property("k", 1).into(),
    ]);
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!([
            {"r": 1.0, "g": 0.5, "b": 0.0, "a": 1.0},
            {"x": 2.0, "y": "inf"},
            {"__class__": "Resource", "k": 1.0}
        ])
    );
}

#[test]
fn json_view_keeps_dictionary_order() {
    let mut map = Dictionary::new();
    map.insert("z".to_string(), Value::Number(1.0));
    map.insert("a".to_string(), Value::Number(2.0));
    let text = serde_json::to_string(&Value::from(map)).unwrap();
    assert_eq!(text, r#"{"z":1.0,"a":2.0}"#);
}
