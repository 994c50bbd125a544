//! Gaze calibration keys in the driver section
//!
//! Each eye stores `<Eye>_Center` and `<Eye>_Calibration` as scaled strings.

use serde_json::{Map, Value};
use std::path::Path;

use super::{JsonStyle, SettingsDocument, SettingsError};
use crate::calibration::{CalibrationEditorSession, Eye};

pub fn center_key(eye: Eye) -> String {
    format!("{}_Center", eye.key_prefix())
}

pub fn calibration_key(eye: Eye) -> String {
    format!("{}_Calibration", eye.key_prefix())
}

fn string_value<'a>(
    section: Option<&'a Map<String, Value>>,
    key: &str,
) -> Result<Option<&'a str>, SettingsError> {
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(SettingsError::InvalidDocument(format!(
            "\"{}\" is not a string",
            key
        ))),
    }
}

/// Load both eyes of `session` from a parsed settings document.
pub fn load_session(
    document: &SettingsDocument,
    session: &mut CalibrationEditorSession,
) -> Result<(), SettingsError> {
    let section = document.section()?;

    let left_center = center_key(Eye::LeftEye);
    let left_calibration = calibration_key(Eye::LeftEye);
    let right_center = center_key(Eye::RightEye);
    let right_calibration = calibration_key(Eye::RightEye);

    session.load(
        (
            string_value(section, &left_center)?,
            string_value(section, &left_calibration)?,
        ),
        (
            string_value(section, &right_center)?,
            string_value(section, &right_calibration)?,
        ),
    )?;
    Ok(())
}

/// Read a settings file into `session`.
pub fn load_session_from(
    path: &Path,
    session: &mut CalibrationEditorSession,
) -> Result<(), SettingsError> {
    let document = SettingsDocument::read(path)?;
    load_session(&document, session)?;
    log::info!("Loaded gaze calibration from {:?}", path);
    Ok(())
}

/// Write both eyes of `session` into a driver section.
pub fn apply_to_section(session: &CalibrationEditorSession, section: &mut Map<String, Value>) {
    for eye in Eye::ALL {
        let (center, samples) = session.serialize(eye);
        section.insert(center_key(eye), Value::String(center));
        section.insert(calibration_key(eye), Value::String(samples));
    }
}

/// Re-read the file, replace the gaze keys and rewrite it with sorted keys.
/// The session is marked saved only when the write succeeds.
pub fn save_session(
    path: &Path,
    session: &mut CalibrationEditorSession,
) -> Result<(), SettingsError> {
    if !session.state().is_loaded() {
        return Err(crate::calibration::CalibrationError::NotLoaded.into());
    }

    let mut document = SettingsDocument::read(path)?;
    apply_to_section(session, document.section_mut()?);
    document.write(path, JsonStyle::CALIBRATION)?;

    session.mark_saved();
    log::info!("Saved gaze calibration to {:?}", path);
    Ok(())
}
