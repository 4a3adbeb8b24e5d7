//! The value model shared by the parser, serializer and preset layer.
//!
//! `Value` is a closed sum type: consumers match on it exhaustively instead of
//! probing shapes at runtime. Constructed engine types (`Color`, `Vector2`,
//! generic `Object(...)` literals) are explicit variants, so a dictionary that
//! happens to have `r`/`g`/`b`/`a` keys is never mistaken for a color.

use crate::error::SyntaxError;
use crate::serializer::{format_number, serialize_value};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Reserved key holding the class name in the dictionary view of a [`ClassObject`].
pub const CLASS_KEY: &str = "__class__";

/// Ordered string-keyed mapping; insertion order is significant.
pub type Dictionary = IndexMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The engine's generic object literal: `Object(ClassName, "key": value, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassObject {
    pub class_name: String,
    pub properties: Dictionary,
}

impl ClassObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            properties: Dictionary::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Dictionary view: the class name under [`CLASS_KEY`], followed by the properties.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut map = Dictionary::with_capacity(self.properties.len() + 1);
        map.insert(CLASS_KEY.to_string(), Value::String(self.class_name.clone()));
        for (key, value) in &self.properties {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

/// A parsed configuration value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Always double precision; NaN and the infinities are legal.
    Number(f64),
    String(String),
    Color(Color),
    Vector2(Vector2),
    Array(Vec<Value>),
    Dictionary(Dictionary),
    Object(ClassObject),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Color(_) => "Color",
            Value::Vector2(_) => "Vector2",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&Color> {
        match self {
            Value::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_vector2(&self) -> Option<&Vector2> {
        match self {
            Value::Vector2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ClassObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_value(self))
    }
}

impl FromStr for Value {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_value_str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

impl From<Vector2> for Value {
    fn from(v: Vector2) -> Self {
        Value::Vector2(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Dictionary> for Value {
    fn from(map: Dictionary) -> Self {
        Value::Dictionary(map)
    }
}

impl From<ClassObject> for Value {
    fn from(obj: ClassObject) -> Self {
        Value::Object(obj)
    }
}

// ----------------------------------------------------------------------------
// JSON view
// ----------------------------------------------------------------------------

/// Serializes finite numbers as JSON numbers and non-finite ones as the
/// strings `nan`, `inf`, `-inf` (JSON has no literal for them).
struct JsonNumber(f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_str(&format_number(self.0))
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Color", 4)?;
        s.serialize_field("r", &JsonNumber(self.r))?;
        s.serialize_field("g", &JsonNumber(self.g))?;
        s.serialize_field("b", &JsonNumber(self.b))?;
        s.serialize_field("a", &JsonNumber(self.a))?;
        s.end()
    }
}

impl Serialize for Vector2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Vector2", 2)?;
        s.serialize_field("x", &JsonNumber(self.x))?;
        s.serialize_field("y", &JsonNumber(self.y))?;
        s.end()
    }
}

impl Serialize for ClassObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len() + 1))?;
        map.serialize_entry(CLASS_KEY, &self.class_name)?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => JsonNumber(*n).serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Color(c) => c.serialize(serializer),
            Value::Vector2(v) => v.serialize(serializer),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Dictionary(map) => serializer.collect_map(map),
            Value::Object(obj) => obj.serialize(serializer),
        }
    }
}
