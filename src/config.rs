//! Editor defaults and persisted preferences
//!
//! Preferences are stored as JSON in the platform config directory and are
//! loaded leniently: a missing or unreadable file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::SettingsError;

/// Top-level key of the driver's block in `steamvr.vrsettings`
pub const SETTINGS_SECTION: &str = "playstation_vr2_ex";

/// Settings file location relative to the Steam install directory
pub const SETTINGS_RELATIVE_PATH: [&str; 2] = ["config", "steamvr.vrsettings"];

/// Sample count for a reset or for an eye without calibration data
pub const DEFAULT_SAMPLE_COUNT: usize = 32;

/// Sample counts offered by the reset control
pub const SAMPLE_COUNT_PRESETS: [usize; 4] = [6, 16, 32, 64];

/// Radius of a drawn handle in points
pub const HANDLE_RADIUS: f32 = 4.0;

/// Pointer distance in points within which a handle can be grabbed
pub const HANDLE_GRAB_DISTANCE: f32 = 12.0;

/// Fraction of the canvas half-size used as the unit radius
pub const CANVAS_RADIUS_FRACTION: f32 = 0.9;

const PREFERENCES_DIR: &str = "PSVR2SettingsEditor";
const PREFERENCES_FILE: &str = "preferences.json";

/// User preferences (stored in config directory)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Settings file the user picked manually last time
    #[serde(rename = "lastSettingsFile", default, skip_serializing_if = "Option::is_none")]
    pub last_settings_file: Option<String>,

    /// Sample count preselected in the reset control
    #[serde(rename = "resetSampleCount", default = "default_reset_sample_count")]
    pub reset_sample_count: usize,
}

fn default_reset_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            last_settings_file: None,
            reset_sample_count: default_reset_sample_count(),
        }
    }
}

impl EditorPreferences {
    /// Get the preferences file path
    fn get_prefs_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(PREFERENCES_DIR);
            p.push(PREFERENCES_FILE);
            p
        })
    }

    /// Load preferences from config directory
    pub fn load() -> Self {
        match Self::get_prefs_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load preferences from an explicit file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable preferences {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_prefs_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save preferences to an explicit file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remember a manually picked settings file and save
    pub fn set_last_settings_file(&mut self, path: &Path) {
        self.last_settings_file = Some(path.to_string_lossy().to_string());
        if let Err(e) = self.save() {
            log::warn!("Failed to save preferences: {}", e);
        }
    }

    /// Get the last picked settings file if it still exists
    pub fn get_last_settings_file(&self) -> Option<PathBuf> {
        self.last_settings_file
            .as_ref()
            .map(PathBuf::from)
            .filter(|p| p.exists())
    }

    /// Remember the preferred reset sample count and save
    pub fn set_reset_sample_count(&mut self, count: usize) {
        if count == 0 || count == self.reset_sample_count {
            return;
        }
        self.reset_sample_count = count;
        if let Err(e) = self.save() {
            log::warn!("Failed to save preferences: {}", e);
        }
    }
}
