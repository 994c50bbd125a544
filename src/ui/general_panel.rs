//! General settings window
//!
//! Checkbox toggles for the driver's feature switches.

use eframe::egui::{self, Vec2};
use std::path::Path;

use crate::settings::{GeneralSettings, SettingsError};

/// General settings window state
#[derive(Default)]
pub struct GeneralPanel {
    /// Toggles as last loaded or edited
    pub settings: GeneralSettings,
    /// Whether the window is open
    pub is_open: bool,
}

/// Action requested from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralPanelAction {
    Save,
    Reload,
}

impl GeneralPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the toggles from `path` and open the window
    pub fn open(&mut self, path: &Path) -> Result<(), SettingsError> {
        self.settings = GeneralSettings::load(path)?;
        self.is_open = true;
        Ok(())
    }

    /// Save the toggles to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.settings.save(path)?;
        log::info!("Saved general settings {:?}", self.settings);
        Ok(())
    }

    /// Show the window
    pub fn show(&mut self, ctx: &egui::Context) -> Option<GeneralPanelAction> {
        if !self.is_open {
            return None;
        }

        let mut action = None;
        let mut is_open = self.is_open;
        egui::Window::new("General Settings")
            .id(egui::Id::new("general_settings_window"))
            .default_size(Vec2::new(360.0, 160.0))
            .resizable(false)
            .collapsible(false)
            .open(&mut is_open)
            .show(ctx, |ui| {
                egui::Grid::new("general_toggles")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        for (i, (label, flag)) in self.settings.labelled_flags_mut().into_iter().enumerate() {
                            ui.checkbox(flag, label);
                            if i % 2 == 1 {
                                ui.end_row();
                            }
                        }
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save Settings").clicked() {
                        action = Some(GeneralPanelAction::Save);
                    }
                    if ui.button("Reload").clicked() {
                        action = Some(GeneralPanelAction::Reload);
                    }
                });
            });
        self.is_open = is_open;

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steamvr.vrsettings");
        fs::write(&path, r#"{ "playstation_vr2_ex": { "disableDialog": true } }"#).unwrap();

        let mut panel = GeneralPanel::new();
        panel.open(&path).unwrap();
        assert!(panel.is_open);
        assert!(panel.settings.disable_dialog);

        panel.settings.disable_gaze = true;
        panel.save(&path).unwrap();
        let reloaded = GeneralSettings::load(&path).unwrap();
        assert!(reloaded.disable_dialog && reloaded.disable_gaze);
    }

    #[test]
    fn test_open_failure_keeps_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = GeneralPanel::new();
        assert!(panel.open(&dir.path().join("missing.vrsettings")).is_err());
        assert!(!panel.is_open);
    }
}
