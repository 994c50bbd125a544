//! General driver toggles
//!
//! Five booleans in the driver section. Saving keeps the file's key order and
//! drops keys the driver no longer reads.

use serde_json::{Map, Value};
use std::path::Path;

use super::{JsonStyle, SettingsDocument, SettingsError};

/// Keys removed from the section whenever the toggles are saved
pub const OBSOLETE_KEYS: [&str; 1] = ["enableHDR10"];

/// Driver feature toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneralSettings {
    pub disable_chaperone: bool,
    pub disable_overlay: bool,
    pub disable_dialog: bool,
    pub disable_sense: bool,
    pub disable_gaze: bool,
}

impl GeneralSettings {
    /// Settings keys paired with their UI labels, in display order
    pub const FIELDS: [(&'static str, &'static str); 5] = [
        ("disableChaperone", "Disable Chaperone"),
        ("disableOverlay", "Disable Overlay"),
        ("disableDialog", "Disable Dialog"),
        ("disableSense", "Disable Sense Haptics"),
        ("disableGaze", "Disable Gaze"),
    ];

    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        match key {
            "disableChaperone" => Some(&mut self.disable_chaperone),
            "disableOverlay" => Some(&mut self.disable_overlay),
            "disableDialog" => Some(&mut self.disable_dialog),
            "disableSense" => Some(&mut self.disable_sense),
            "disableGaze" => Some(&mut self.disable_gaze),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> bool {
        match key {
            "disableChaperone" => self.disable_chaperone,
            "disableOverlay" => self.disable_overlay,
            "disableDialog" => self.disable_dialog,
            "disableSense" => self.disable_sense,
            "disableGaze" => self.disable_gaze,
            _ => false,
        }
    }

    /// Labelled mutable flags for building checkboxes
    pub fn labelled_flags_mut(&mut self) -> [(&'static str, &mut bool); 5] {
        [
            (Self::FIELDS[0].1, &mut self.disable_chaperone),
            (Self::FIELDS[1].1, &mut self.disable_overlay),
            (Self::FIELDS[2].1, &mut self.disable_dialog),
            (Self::FIELDS[3].1, &mut self.disable_sense),
            (Self::FIELDS[4].1, &mut self.disable_gaze),
        ]
    }

    /// Read the toggles from a driver section. Missing or non-boolean values
    /// are off.
    pub fn from_section(section: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        for (key, _) in Self::FIELDS {
            let value = section.get(key).and_then(Value::as_bool).unwrap_or(false);
            if let Some(flag) = settings.flag_mut(key) {
                *flag = value;
            }
        }
        settings
    }

    pub fn from_document(document: &SettingsDocument) -> Result<Self, SettingsError> {
        Ok(document
            .section()?
            .map(Self::from_section)
            .unwrap_or_default())
    }

    /// Write the toggles into a driver section, replacing existing values in
    /// place and removing obsolete keys.
    pub fn apply_to_section(&self, section: &mut Map<String, Value>) {
        for (key, _) in Self::FIELDS {
            section.insert(key.to_string(), Value::Bool(self.flag(key)));
        }
        for key in OBSOLETE_KEYS {
            if section.shift_remove(key).is_some() {
                log::info!("Removed obsolete setting \"{}\"", key);
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let settings = Self::from_document(&SettingsDocument::read(path)?)?;
        log::info!("Loaded general settings from {:?}", path);
        Ok(settings)
    }

    /// Re-read the file, update the driver section and rewrite it
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let mut document = SettingsDocument::read(path)?;
        self.apply_to_section(document.section_mut()?);
        document.write(path, JsonStyle::GENERAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_flags_leniently() {
        let section: Map<String, Value> = serde_json::from_str(
            r#"{ "disableChaperone": true, "disableGaze": "yes", "disableDialog": false }"#,
        )
        .unwrap();
        let settings = GeneralSettings::from_section(&section);
        assert!(settings.disable_chaperone);
        assert!(!settings.disable_gaze);
        assert!(!settings.disable_overlay);
    }

    #[test]
    fn test_apply_strips_hdr_and_keeps_order() {
        let mut section: Map<String, Value> = serde_json::from_str(
            r#"{ "disableGaze": false, "enableHDR10": true, "LeftEye_Center": "0.00 0.00" }"#,
        )
        .unwrap();

        let settings = GeneralSettings {
            disable_gaze: true,
            ..Default::default()
        };
        settings.apply_to_section(&mut section);

        assert!(!section.contains_key("enableHDR10"));
        assert_eq!(section.get("disableGaze"), Some(&Value::Bool(true)));
        assert_eq!(section.keys().next().map(String::as_str), Some("disableGaze"));
        assert_eq!(section.get("LeftEye_Center"), Some(&Value::from("0.00 0.00")));
        assert_eq!(section.len(), 6);
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steamvr.vrsettings");
        fs::write(
            &path,
            r#"{ "steamvr": { "enableHomeApp": false }, "playstation_vr2_ex": { "enableHDR10": true } }"#,
        )
        .unwrap();

        let settings = GeneralSettings {
            disable_overlay: true,
            disable_sense: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n    \"steamvr\""));
        assert!(!written.contains("enableHDR10"));
        assert_eq!(GeneralSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_section_is_all_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steamvr.vrsettings");
        fs::write(&path, "{}").unwrap();
        assert_eq!(GeneralSettings::load(&path).unwrap(), GeneralSettings::default());
    }
}
