//! UI module for the settings editor
//!
//! Panels and windows drawn by the app. All edits go through the
//! calibration session; widgets only read from it to draw.

pub mod calibration_canvas;
pub mod general_panel;
pub mod raw_editor;

pub use calibration_canvas::CalibrationCanvas;
pub use general_panel::{GeneralPanel, GeneralPanelAction};
pub use raw_editor::RawValuesEditor;

/// Show a blocking error dialog and log the message.
pub fn show_error(title: &str, description: &str) {
    log::error!("{}: {}", title, description);
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Show a blocking information dialog.
pub fn show_info(title: &str, description: &str) {
    log::info!("{}: {}", title, description);
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Ask a yes/no question; true when the user answers yes.
pub fn confirm(title: &str, description: &str) -> bool {
    let result = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    result == rfd::MessageDialogResult::Yes
}
