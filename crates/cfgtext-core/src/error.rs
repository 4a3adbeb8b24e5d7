//! Error types for parsing, lookup and preset operations.

use thiserror::Error;

/// A malformed-input error raised by the lexer or parser.
///
/// Carries the 1-based line number where the problem was detected. For an
/// unterminated string this is the line of the opening quote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the public API.
#[derive(Error, Debug)]
pub enum CfgError {
    /// The input text was not well-formed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Lookup of a section that does not exist, with no default supplied.
    #[error("section not found: [{0}]")]
    MissingSection(String),

    /// Lookup of a key that does not exist, with no default supplied.
    #[error("key not found: [{section}] {key}")]
    MissingKey { section: String, key: String },

    /// `merge_presets` was called with no presets.
    #[error("cannot merge an empty list of presets")]
    EmptyMerge,

    /// A `preset.<N>` section lacks a required field or has it with the wrong type.
    #[error("invalid preset in [{section}]: {reason}")]
    InvalidPreset { section: String, reason: String },

    /// JSON export failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout cfgtext-core.
pub type Result<T> = std::result::Result<T, CfgError>;
