use cfgtext_core::{CfgError, Document, Value};

fn sample() -> Document {
    let mut doc = Document::new();
    doc.set("application", "config/name", "Demo");
    doc.set("application", "run/max_fps", 60);
    doc.set("display", "window/size/viewport_width", 1280);
    doc
}

// ============================================================================
// Lookups
// ============================================================================

#[test]
fn get_existing_value() {
    let doc = sample();
    assert_eq!(doc.get("application", "config/name").unwrap(), &Value::from("Demo"));
}

#[test]
fn get_missing_section_is_usage_error() {
    match sample().get("nope", "k") {
        Err(CfgError::MissingSection(section)) => assert_eq!(section, "nope"),
        other => panic!("expected MissingSection, got {other:?}"),
    }
}

#[test]
fn get_missing_key_is_usage_error() {
    let err = sample().get("application", "missing").unwrap_err();
    assert!(matches!(err, CfgError::MissingKey { .. }));
    assert_eq!(err.to_string(), "key not found: [application] missing");
}

#[test]
fn get_or_falls_back_to_default() {
    let doc = sample();
    let default = Value::Number(30.0);
    assert_eq!(doc.get_or("application", "run/max_fps", &default), &Value::Number(60.0));
    assert_eq!(doc.get_or("application", "missing", &default), &default);
    assert_eq!(doc.get_or("missing", "missing", &default), &default);
}

#[test]
fn has_section_and_key() {
    let doc = sample();
    assert!(doc.has_section("display"));
    assert!(!doc.has_section("audio"));
    assert!(doc.has_key("display", "window/size/viewport_width"));
    assert!(!doc.has_key("display", "nope"));
    assert!(!doc.has_key("audio", "nope"));
}

#[test]
fn keys_of_missing_section_is_usage_error() {
    assert!(matches!(
        sample().keys("audio").map(|k| k.count()),
        Err(CfgError::MissingSection(_))
    ));
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn set_overwrites_in_place() {
    let mut doc = sample();
    let previous = doc.set("application", "config/name", "Renamed");
    assert_eq!(previous, Some(Value::from("Demo")));
    let keys: Vec<&str> = doc.keys("application").unwrap().collect();
    assert_eq!(keys, vec!["config/name", "run/max_fps"]);
}

#[test]
fn set_creates_sections_in_order() {
    let mut doc = Document::new();
    doc.set("b", "k", 1);
    doc.set("a", "k", 1);
    let names: Vec<&str> = doc.section_names().collect();
    assert_eq!(names, vec!["b", "a"]);
    assert_eq!(doc.len(), 2);
}

#[test]
fn erase_key_keeps_remaining_order() {
    let mut doc = Document::new();
    doc.set("s", "a", 1);
    doc.set("s", "b", 2);
    doc.set("s", "c", 3);
    assert_eq!(doc.erase_key("s", "b"), Some(Value::Number(2.0)));
    let keys: Vec<&str> = doc.keys("s").unwrap().collect();
    assert_eq!(keys, vec!["a", "c"]);
    assert_eq!(doc.erase_key("s", "b"), None);
    assert_eq!(doc.erase_key("missing", "b"), None);
}

#[test]
fn erase_section() {
    let mut doc = sample();
    assert!(doc.erase_section("application").is_some());
    let names: Vec<&str> = doc.section_names().collect();
    assert_eq!(names, vec!["display"]);
}

#[test]
fn retain_sections_filters_by_name() {
    let mut doc = sample();
    doc.retain_sections(|name| name.starts_with("disp"));
    assert_eq!(doc.len(), 1);
    assert!(doc.has_section("display"));
}

#[test]
fn merge_from_overlays_entries() {
    let mut base = sample();
    let mut overlay = Document::new();
    overlay.set("application", "run/max_fps", 120);
    overlay.set("audio", "buses/default_bus_layout", "res://bus.tres");
    base.merge_from(&overlay);

    assert_eq!(base.get("application", "run/max_fps").unwrap(), &Value::Number(120.0));
    assert_eq!(base.get("application", "config/name").unwrap(), &Value::from("Demo"));
    let names: Vec<&str> = base.section_names().collect();
    assert_eq!(names, vec!["application", "display", "audio"]);
}

// ============================================================================
// Equality and JSON
// ============================================================================

#[test]
fn equality_is_order_sensitive() {
    let mut a = Document::new();
    a.set("s", "x", 1);
    a.set("s", "y", 2);
    let mut b = Document::new();
    b.set("s", "y", 2);
    b.set("s", "x", 1);
    assert_ne!(a, b);

    let mut c = Document::new();
    c.set("s", "x", 1);
    c.set("s", "y", 2);
    assert_eq!(a, c);
}

#[test]
fn document_serializes_to_ordered_json() {
    let json = serde_json::to_string(&sample()).unwrap();
    assert_eq!(
        json,
        r#"{"application":{"config/name":"Demo","run/max_fps":60.0},"display":{"window/size/viewport_width":1280.0}}"#
    );
}
