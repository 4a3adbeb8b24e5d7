//! Serializer, the inverse of the parser.
//!
//! Output layout:
//!
//! ```text
//! prologue_key="value"
//!
//! [section]
//! key=1
//! other=Color(1, 0.5, 0, 1)
//! ```
//!
//! - the section-less `""` bucket is written first, without a header
//! - one blank line between blocks, exactly one trailing newline
//! - section headers escape `\` and `]` with a backslash
//! - keys are bare unless they need quoting (see [`encode_key`])
//! - numbers use the shortest decimal that parses back to the same `f64`;
//!   non-finite values are written as `nan`, `inf`, `-inf`
//! - strings escape only `\` and `"`, so multi-line values stay multi-line

use crate::document::{Document, Section};
use crate::value::{Color, Dictionary, Value, Vector2};

/// Serialize a whole document.
pub fn serialize_document(document: &Document) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(document.len());

    if let Some(prologue) = document.section("") {
        if !prologue.is_empty() {
            let mut block = String::new();
            encode_entries(prologue, &mut block);
            blocks.push(block);
        }
    }

    for (name, entries) in document.sections() {
        if name.is_empty() {
            continue;
        }
        let mut block = String::new();
        block.push('[');
        encode_section_name(name, &mut block);
        block.push(']');
        if !entries.is_empty() {
            block.push('\n');
            encode_entries(entries, &mut block);
        }
        blocks.push(block);
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Serialize a single value using the same syntax the parser accepts.
pub fn serialize_value(value: &Value) -> String {
    let mut out = String::new();
    encode_value(value, &mut out);
    out
}

/// Encode a key for the left-hand side of `key=value`.
///
/// A key is written bare when it is non-empty, every character is printable
/// ASCII (33..=126), and it contains none of `= " ; [ ]`. A key starting with
/// `#` is also quoted since it would otherwise read as a comment. Quoted keys
/// escape `\` and `"`.
pub fn encode_key(key: &str) -> String {
    if key_needs_quoting(key) {
        quote(key)
    } else {
        key.to_string()
    }
}

fn key_needs_quoting(key: &str) -> bool {
    key.is_empty()
        || key.starts_with('#')
        || key.chars().any(|c| {
            matches!(c, '=' | '"' | ';' | '[' | ']') || !(33..=126).contains(&(c as u32))
        })
}

/// Shortest round-tripping decimal text for `n`, or `nan` / `inf` / `-inf`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n.is_sign_negative() { "-inf" } else { "inf" }.to_string()
    } else {
        // Display for f64 is the shortest representation that parses back
        // exactly, and never uses exponent notation.
        format!("{}", n)
    }
}

/// `\` and `]` are backslash-escaped so every name reads back unchanged.
fn encode_section_name(name: &str, out: &mut String) {
    for c in name.chars() {
        if matches!(c, '\\' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
}

fn encode_entries(entries: &Section, out: &mut String) {
    let mut first = true;
    for (key, value) in entries {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(&encode_key(key));
        out.push('=');
        encode_value(value, out);
    }
}

fn encode_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Color(c) => encode_color(c, out),
        Value::Vector2(v) => encode_vector2(v, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                encode_value(item, out);
            }
            out.push(']');
        }
        Value::Dictionary(map) => {
            out.push('{');
            encode_pairs(map, out);
            out.push('}');
        }
        Value::Object(obj) => {
            out.push_str("Object(");
            out.push_str(&obj.class_name);
            if !obj.properties.is_empty() {
                out.push_str(", ");
                encode_pairs(&obj.properties, out);
            }
            out.push(')');
        }
    }
}

/// `"k": v, "k2": v2`
fn encode_pairs(map: &Dictionary, out: &mut String) {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&quote(key));
        out.push_str(": ");
        encode_value(value, out);
    }
}

fn encode_color(c: &Color, out: &mut String) {
    out.push_str(&format!(
        "Color({}, {}, {}, {})",
        format_number(c.r),
        format_number(c.g),
        format_number(c.b),
        format_number(c.a)
    ));
}

fn encode_vector2(v: &Vector2, out: &mut String) {
    out.push_str(&format!(
        "Vector2({}, {})",
        format_number(v.x),
        format_number(v.y)
    ));
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
