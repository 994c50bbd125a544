//! Settings file access
//!
//! Handles locating, reading and rewriting `steamvr.vrsettings`. Saves are
//! whole-file: the document is re-read, the driver section is updated in place
//! and everything else is written back untouched.

pub mod gaze;
pub mod general;
pub mod locate;

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calibration::CalibrationError;
use crate::config::SETTINGS_SECTION;

pub use general::GeneralSettings;
pub use locate::{FilePicker, LocatedBy, RfdPicker, SettingsLocator};

/// Settings-related errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid settings document: {0}")]
    InvalidDocument(String),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(serde_json::Error),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("Could not find config directory")]
    NoConfigDir,
}

/// Output layout used when rewriting the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStyle {
    /// Spaces per indentation level
    pub indent: usize,
    /// Sort object keys at every level
    pub sort_keys: bool,
}

impl JsonStyle {
    /// Layout written by the general settings panel
    pub const GENERAL: JsonStyle = JsonStyle {
        indent: 4,
        sort_keys: false,
    };

    /// Layout written by the gaze calibration editor
    pub const CALIBRATION: JsonStyle = JsonStyle {
        indent: 3,
        sort_keys: true,
    };
}

/// Parsed `steamvr.vrsettings` document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsDocument {
    root: Map<String, Value>,
}

impl SettingsDocument {
    /// Parse document text. Blank text is an empty document.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, SettingsError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(SettingsError::InvalidDocument(
                "top level is not a JSON object".to_string(),
            )),
        }
    }

    /// Read and parse a settings file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// The driver section, if present
    pub fn section(&self) -> Result<Option<&Map<String, Value>>, SettingsError> {
        match self.root.get(SETTINGS_SECTION) {
            None => Ok(None),
            Some(Value::Object(section)) => Ok(Some(section)),
            Some(_) => Err(section_not_object()),
        }
    }

    /// The driver section, created empty if missing
    pub fn section_mut(&mut self) -> Result<&mut Map<String, Value>, SettingsError> {
        let section = self
            .root
            .entry(SETTINGS_SECTION)
            .or_insert_with(|| Value::Object(Map::new()));

        match section {
            Value::Object(section) => Ok(section),
            _ => Err(section_not_object()),
        }
    }

    /// Render the document with the given layout
    pub fn to_json_string(&self, style: JsonStyle) -> Result<String, SettingsError> {
        let value = if style.sort_keys {
            sorted(&Value::Object(self.root.clone()))
        } else {
            Value::Object(self.root.clone())
        };

        let indent = " ".repeat(style.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value
            .serialize(&mut serializer)
            .map_err(SettingsError::Serialize)?;

        String::from_utf8(buffer).map_err(|e| SettingsError::InvalidDocument(e.to_string()))
    }

    /// Rewrite the whole file
    pub fn write(&self, path: &Path, style: JsonStyle) -> Result<(), SettingsError> {
        let json = self.to_json_string(style)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote settings to {:?}", path);
        Ok(())
    }
}

fn section_not_object() -> SettingsError {
    SettingsError::InvalidDocument(format!("\"{}\" is not a JSON object", SETTINGS_SECTION))
}

/// Copy of `value` with object keys sorted at every level
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
