//! PSVR2 Settings Editor Library
//!
//! Editing of the PSVR2 SteamVR driver settings: the general feature toggles
//! and the per-eye gaze calibration curves stored in `steamvr.vrsettings`.

pub mod app;
pub mod calibration;
pub mod config;
pub mod settings;
pub mod ui;

// Re-export commonly used types
pub use app::SettingsEditorApp;
pub use calibration::{CalibrationEditorSession, CalibrationError, CalibrationSet, Eye, SymmetryPolicy};
pub use config::EditorPreferences;
pub use settings::{GeneralSettings, SettingsDocument, SettingsError, SettingsLocator};
