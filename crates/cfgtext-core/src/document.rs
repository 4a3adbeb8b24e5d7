//! Ordered section → key → value store.
//!
//! A `Document` is an owned value: parsing produces a fresh one and nothing is
//! shared between instances. Section order and key order within a section are
//! insertion order and take part in equality, so two documents with the same
//! entries in a different order are not equal.

use crate::error::{CfgError, Result};
use crate::parser::parse_document;
use crate::serializer::serialize_document;
use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Keys of one section, in insertion order.
pub type Section = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sections, including the section-less `""` bucket if present.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|entries| entries.contains_key(key))
    }

    pub fn section(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    /// Get the section, creating it empty (at the end) if absent.
    pub fn ensure_section(&mut self, section: &str) -> &mut Section {
        self.sections.entry(section.to_string()).or_default()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, entries)| (name.as_str(), entries))
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(|name| name.as_str())
    }

    pub fn keys(&self, section: &str) -> Result<impl Iterator<Item = &str>> {
        let entries = self
            .sections
            .get(section)
            .ok_or_else(|| CfgError::MissingSection(section.to_string()))?;
        Ok(entries.keys().map(|key| key.as_str()))
    }

    /// Look up a value; a missing section or key is a usage error.
    pub fn get(&self, section: &str, key: &str) -> Result<&Value> {
        let entries = self
            .sections
            .get(section)
            .ok_or_else(|| CfgError::MissingSection(section.to_string()))?;
        entries.get(key).ok_or_else(|| CfgError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    /// Look up a value, falling back to `default` when the section or key is absent.
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a Value) -> &'a Value {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .unwrap_or(default)
    }

    /// Store a value, creating the section if needed. An existing key keeps
    /// its position; the previous value is returned.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.ensure_section(section)
            .insert(key.to_string(), value.into())
    }

    /// Remove a whole section, keeping the order of the rest.
    pub fn erase_section(&mut self, section: &str) -> Option<Section> {
        self.sections.shift_remove(section)
    }

    /// Remove one key, keeping the order of the rest of the section.
    pub fn erase_key(&mut self, section: &str, key: &str) -> Option<Value> {
        self.sections
            .get_mut(section)
            .and_then(|entries| entries.shift_remove(key))
    }

    /// Keep only the sections for which `keep` returns true.
    pub fn retain_sections<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.sections.retain(|name, _| keep(name));
    }

    /// Overlay every entry of `other` onto this document. Existing keys take
    /// the incoming value in place; new sections and keys are appended.
    pub fn merge_from(&mut self, other: &Document) {
        for (name, entries) in &other.sections {
            let target = self.ensure_section(name);
            for (key, value) in entries {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.sections.len() == other.sections.len()
            && self
                .sections
                .iter()
                .zip(&other.sections)
                .all(|((name_a, a), (name_b, b))| {
                    name_a == name_b
                        && a.len() == b.len()
                        && a.iter().zip(b).all(|(ea, eb)| ea == eb)
                })
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_document(self))
    }
}

impl FromStr for Document {
    type Err = CfgError;

    /// Strict parse: any syntax error is returned and the partial document dropped.
    fn from_str(s: &str) -> Result<Self> {
        parse_document(s).into_result()
    }
}
