//! # cfgtext-core
//!
//! Lexer, parser and serializer for the INI-like text format used by game engine
//! project and export configuration files (`project.godot`, `export_presets.cfg`),
//! plus the export-preset model built on top of it.
//!
//! ## Quick start
//!
//! ```rust
//! use cfgtext_core::{parse_document, serialize_document, Value};
//!
//! let text = "[application]\nconfig/name=\"Demo\"\nrun/max_fps=60\n";
//! let outcome = parse_document(text);
//! assert!(outcome.error.is_none());
//!
//! let mut doc = outcome.document;
//! assert_eq!(doc.get("application", "run/max_fps").unwrap(), &Value::Number(60.0));
//!
//! doc.set("application", "a=b", 7);
//! assert!(serialize_document(&doc).contains("\"a=b\"=7"));
//! ```
//!
//! ## Modules
//!
//! - [`lexer`]: text → tokens, with line tracking and comment skipping
//! - [`parser`]: value and document parsing (`parse_document`, `parse_value_str`)
//! - [`serializer`]: document/value → canonical text
//! - [`document`]: ordered section → key → value store
//! - [`value`]: the `Value` sum type and its constructed payloads
//! - [`preset`]: export presets: extraction, write-back, merge, lookup
//! - [`error`]: `SyntaxError` and `CfgError`

pub mod document;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod preset;
pub mod serializer;
pub mod value;

pub use document::{Document, Section};
pub use error::{CfgError, Result, SyntaxError};
pub use parser::{parse_document, parse_value_str, ParseOutcome, MAX_NESTING_DEPTH};
pub use preset::{
    find_preset, merge_presets, presets_to_document, write_presets, Preset, PresetQuery,
};
pub use serializer::{encode_key, serialize_document, serialize_value};
pub use value::{ClassObject, Color, Dictionary, Value, Vector2, CLASS_KEY};
