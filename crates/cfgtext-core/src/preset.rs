//! Export presets: a typed view over `preset.<N>` / `preset.<N>.options` sections.
//!
//! ```text
//! [preset.0]
//! name="Android"
//! platform="Android"
//! runnable=true
//! export_path="build/game.apk"
//!
//! [preset.0.options]
//! gradle_build/use_gradle_build=false
//! ```
//!
//! Presets are extracted by copying, never by reference, so callers can mutate
//! them freely and write them back with [`write_presets`].
//!
//! # Merging
//!
//! [`merge_presets`] folds left to right. Regular fields merge deeply: when both
//! sides hold a dictionary the entries are merged key by key, recursively, and
//! at every level the later value wins. `options` is a flat overlay with no
//! recursion, since option values are leaves.

use crate::document::{Document, Section};
use crate::error::{CfgError, Result};
use crate::value::{Dictionary, Value};
use serde::Serialize;
use tracing::debug;

const SECTION_PREFIX: &str = "preset.";
const OPTIONS_SUFFIX: &str = ".options";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub platform: String,
    pub runnable: bool,
    /// Every other key of the `preset.<N>` section, in file order.
    #[serde(flatten)]
    pub fields: Dictionary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Dictionary>,
}

impl Preset {
    pub fn new(name: impl Into<String>, platform: impl Into<String>, runnable: bool) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            runnable,
            fields: Dictionary::new(),
            options: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_option(key, value);
        self
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options
            .get_or_insert_with(Dictionary::new)
            .insert(key.into(), value.into());
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.as_ref().and_then(|options| options.get(key))
    }

    /// Read every `preset.<N>` section of `document`, ordered by `N`.
    ///
    /// `N` must be written canonically (no leading zeros, fits in a `u64`), so
    /// no two sections share an index. Other `preset.`-prefixed sections are
    /// skipped.
    pub fn extract_all(document: &Document) -> Result<Vec<Preset>> {
        let mut indexed: Vec<(u64, &str, &Section)> = Vec::new();
        for (name, entries) in document.sections() {
            match preset_index(name) {
                Some(n) => indexed.push((n, name, entries)),
                None if name.starts_with(SECTION_PREFIX) && !is_preset_section(name) => {
                    debug!(section = name, "skipping section with a non-canonical preset index");
                }
                None => {}
            }
        }
        indexed.sort_by_key(|(n, _, _)| *n);

        indexed
            .into_iter()
            .map(|(_, name, entries)| {
                let options = document.section(&format!("{}{}", name, OPTIONS_SUFFIX));
                Preset::from_sections(name, entries, options)
            })
            .collect()
    }

    fn from_sections(section: &str, entries: &Section, options: Option<&Section>) -> Result<Self> {
        let mut fields = entries.clone();
        let name = take_string(&mut fields, section, "name")?;
        let platform = take_string(&mut fields, section, "platform")?;
        let runnable = match fields.shift_remove("runnable") {
            Some(Value::Bool(b)) => b,
            Some(other) => return Err(wrong_type(section, "runnable", "bool", &other)),
            None => return Err(missing(section, "runnable")),
        };
        if fields.shift_remove("options").is_some() {
            debug!(section, "ignoring 'options' key inside preset section");
        }

        debug!(section, name = %name, platform = %platform, "preset extracted");
        Ok(Self {
            name,
            platform,
            runnable,
            fields,
            options: options.cloned(),
        })
    }

    /// Overlay `other` onto this preset: deep for fields, shallow for options.
    pub fn merge_from(&mut self, other: &Preset) {
        self.name.clone_from(&other.name);
        self.platform.clone_from(&other.platform);
        self.runnable = other.runnable;
        deep_merge(&mut self.fields, &other.fields);

        if let Some(overlay) = &other.options {
            let base = self.options.get_or_insert_with(Dictionary::new);
            for (key, value) in overlay {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merge presets left to right; see the module docs for the policy.
///
/// A single preset yields an independent copy. An empty input is a usage error.
pub fn merge_presets<'a, I>(presets: I) -> Result<Preset>
where
    I: IntoIterator<Item = &'a Preset>,
{
    let mut iter = presets.into_iter();
    let first = iter.next().ok_or(CfgError::EmptyMerge)?;
    Ok(iter.fold(first.clone(), |mut merged, next| {
        merged.merge_from(next);
        merged
    }))
}

/// Replace every preset section of `document` with `presets`, renumbered from 0.
pub fn write_presets(document: &mut Document, presets: &[Preset]) {
    document.retain_sections(|name| !is_preset_section(name));

    for (i, preset) in presets.iter().enumerate() {
        let section = format!("{}{}", SECTION_PREFIX, i);
        document.set(&section, "name", preset.name.as_str());
        document.set(&section, "platform", preset.platform.as_str());
        document.set(&section, "runnable", preset.runnable);
        for (key, value) in &preset.fields {
            document.set(&section, key, value.clone());
        }

        if let Some(options) = &preset.options {
            let options_section = document.ensure_section(&format!("{}{}", section, OPTIONS_SUFFIX));
            for (key, value) in options {
                options_section.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Build a document holding only `presets`.
pub fn presets_to_document(presets: &[Preset]) -> Document {
    let mut document = Document::new();
    write_presets(&mut document, presets);
    document
}

/// How [`find_preset`] selects a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetQuery {
    /// Position in the list.
    Index(usize),
    /// Case-insensitive, whitespace-trimmed match on `platform` or `name`.
    Name(String),
}

impl PresetQuery {
    /// All-digit input is an index; anything else matches by name or platform.
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim();
        match trimmed.parse::<usize>() {
            Ok(index) if trimmed.bytes().all(|b| b.is_ascii_digit()) => PresetQuery::Index(index),
            _ => PresetQuery::Name(query.to_string()),
        }
    }
}

impl From<usize> for PresetQuery {
    fn from(index: usize) -> Self {
        PresetQuery::Index(index)
    }
}

impl From<&str> for PresetQuery {
    fn from(name: &str) -> Self {
        PresetQuery::Name(name.to_string())
    }
}

/// First preset matching `query`, scanning in order.
pub fn find_preset<'a>(presets: &'a [Preset], query: &PresetQuery) -> Option<&'a Preset> {
    match query {
        PresetQuery::Index(index) => presets.get(*index),
        PresetQuery::Name(needle) => {
            let needle = needle.trim().to_lowercase();
            presets.iter().find(|preset| {
                preset.platform.trim().to_lowercase() == needle
                    || preset.name.trim().to_lowercase() == needle
            })
        }
    }
}

fn deep_merge(base: &mut Dictionary, overlay: &Dictionary) {
    for (key, incoming) in overlay {
        match base.get_mut(key) {
            Some(existing) => deep_merge_value(existing, incoming),
            None => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}

fn deep_merge_value(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Dictionary(base), Value::Dictionary(overlay)) => deep_merge(base, overlay),
        (slot, value) => *slot = value.clone(),
    }
}

/// `N` for a section named `preset.<N>`. `0` is the only index allowed to
/// start with a zero.
fn preset_index(section: &str) -> Option<u64> {
    let digits = section.strip_prefix(SECTION_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

fn is_preset_section(section: &str) -> bool {
    preset_index(section).is_some()
        || section
            .strip_suffix(OPTIONS_SUFFIX)
            .and_then(preset_index)
            .is_some()
}

fn take_string(fields: &mut Section, section: &str, key: &str) -> Result<String> {
    match fields.shift_remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(wrong_type(section, key, "string", &other)),
        None => Err(missing(section, key)),
    }
}

fn missing(section: &str, key: &str) -> CfgError {
    CfgError::InvalidPreset {
        section: section.to_string(),
        reason: format!("missing required field '{}'", key),
    }
}

fn wrong_type(section: &str, key: &str, expected: &str, found: &Value) -> CfgError {
    CfgError::InvalidPreset {
        section: section.to_string(),
        reason: format!(
            "field '{}' must be a {}, found {}",
            key,
            expected,
            found.type_name()
        ),
    }
}
