//! Main application state and UI
//!
//! One window with both eyes' calibration canvases side by side, the
//! symmetry toggles and reset controls above them, and the general driver
//! toggles in a separate window.

use anyhow::Context as _;
use eframe::egui::{self, Color32, RichText};
use std::path::{Path, PathBuf};

use crate::calibration::{CalibrationEditorSession, Eye, EyePair};
use crate::config::{EditorPreferences, SAMPLE_COUNT_PRESETS};
use crate::settings::{gaze, FilePicker, LocatedBy, RfdPicker, SettingsDocument, SettingsLocator};
use crate::ui::{self, CalibrationCanvas, GeneralPanel, GeneralPanelAction, RawValuesEditor};

/// Per-eye button presses handled after the panels are drawn
#[derive(Debug, Clone, Copy)]
enum EyeAction {
    Reset(Eye),
    RawEdit(Eye),
}

/// Main application state
pub struct SettingsEditorApp {
    prefs: EditorPreferences,
    settings_path: Option<PathBuf>,
    session: CalibrationEditorSession,

    // UI panels
    canvases: EyePair<CalibrationCanvas>,
    raw_editor: RawValuesEditor,
    general_panel: GeneralPanel,

    /// Sample count typed or picked in the reset control
    reset_count_text: String,
    /// Last status message
    status: String,
    /// Close the viewport on the next frame
    close_requested: bool,
    /// Close confirmed while there were unsaved changes
    close_confirmed: bool,
}

impl SettingsEditorApp {
    /// Create the app, locate the settings file and load it.
    ///
    /// If no file is found or it is not a readable settings document, an
    /// error is shown and the window closes. Bad gaze values only disable the
    /// calibration editor; the general settings stay editable.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Initializing PSVR2 Settings Editor...");

        let mut app = Self::with_preferences(EditorPreferences::load());
        let locator = SettingsLocator::from_system(&app.prefs);

        match locator.locate(&RfdPicker) {
            Some((path, located_by)) => {
                if located_by == LocatedBy::Picked {
                    app.prefs.set_last_settings_file(&path);
                }
                if let Err(e) = app.load_settings(&path) {
                    ui::show_error("Error", &format!("{:#}", e));
                    app.close_requested = app.settings_path.is_none();
                }
            }
            None => {
                ui::show_error("Error", "steamvr.vrsettings file not found. Exiting.");
                app.close_requested = true;
            }
        }

        app
    }

    /// App with no settings file loaded yet
    pub fn with_preferences(prefs: EditorPreferences) -> Self {
        let reset_count_text = prefs.reset_sample_count.to_string();
        Self {
            session: CalibrationEditorSession::default(),
            settings_path: None,
            canvases: EyePair::new(
                CalibrationCanvas::new(Eye::LeftEye),
                CalibrationCanvas::new(Eye::RightEye),
            ),
            raw_editor: RawValuesEditor::new(),
            general_panel: GeneralPanel::new(),
            reset_count_text,
            status: String::new(),
            close_requested: false,
            close_confirmed: false,
            prefs,
        }
    }

    pub fn session(&self) -> &CalibrationEditorSession {
        &self.session
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    /// Make `path` the edited file and load its gaze calibration.
    ///
    /// An unreadable document leaves everything as it was. Once the document
    /// parses, the file is kept even if its gaze values are invalid; the
    /// calibration session is then left unloaded.
    pub fn load_settings(&mut self, path: &Path) -> anyhow::Result<()> {
        let document = SettingsDocument::read(path)
            .with_context(|| format!("Could not load settings from {}", path.display()))?;

        self.settings_path = Some(path.to_path_buf());
        self.raw_editor.close();
        self.general_panel.is_open = false;
        self.session = CalibrationEditorSession::new(self.session.default_sample_count());

        if let Err(e) = gaze::load_session(&document, &mut self.session) {
            self.status = format!("Gaze calibration unavailable in {}", path.display());
            return Err(anyhow::Error::new(e).context(format!(
                "Could not load gaze calibration from {}. General settings remain editable",
                path.display()
            )));
        }

        log::info!("Loaded gaze calibration from {:?}", path);
        self.status = format!("Loaded {}", path.display());
        Ok(())
    }

    /// Write the calibration back to the settings file
    pub fn save_settings(&mut self) -> anyhow::Result<()> {
        let path = self
            .settings_path
            .clone()
            .context("No settings file is open")?;
        gaze::save_session(&path, &mut self.session)
            .with_context(|| format!("Failed to save settings to {}", path.display()))?;
        self.status = format!("Saved {}", path.display());
        Ok(())
    }

    fn save_with_feedback(&mut self) {
        match self.save_settings() {
            Ok(()) => ui::show_info(
                "Success",
                "Gaze calibration saved successfully!\nPlease restart SteamVR for changes to take effect.",
            ),
            Err(e) => ui::show_error("Error", &format!("{:#}", e)),
        }
    }

    fn open_with_picker(&mut self, picker: &dyn FilePicker) {
        if self.session.state().has_unsaved_changes()
            && !ui::confirm("Unsaved Changes", "Discard unsaved calibration changes?")
        {
            return;
        }

        if let Some(path) = picker.pick_settings_file() {
            match self.load_settings(&path) {
                Ok(()) => self.prefs.set_last_settings_file(&path),
                Err(e) => ui::show_error("Error", &format!("{:#}", e)),
            }
        }
    }

    fn reset_eye(&mut self, eye: Eye) {
        let count = parse_sample_count(&self.reset_count_text, self.session.default_sample_count());
        self.reset_count_text = count.to_string();

        match self.session.reset(eye, count) {
            Ok(()) => {
                self.prefs.set_reset_sample_count(count);
                self.status = format!("Reset {} to {} samples", eye.display_name(), count);
            }
            Err(e) => ui::show_error("Error", &e.to_string()),
        }
    }

    fn handle_eye_action(&mut self, action: EyeAction) {
        match action {
            EyeAction::Reset(eye) => self.reset_eye(eye),
            EyeAction::RawEdit(eye) => self.raw_editor.open(eye, &self.session),
        }
    }

    fn handle_general_action(&mut self, action: GeneralPanelAction) {
        let Some(path) = self.settings_path.clone() else {
            return;
        };
        match action {
            GeneralPanelAction::Save => match self.general_panel.save(&path) {
                Ok(()) => ui::show_info(
                    "Success",
                    "Settings saved successfully!\nPlease restart SteamVR for changes to take effect.",
                ),
                Err(e) => ui::show_error("Error", &format!("Failed to save settings: {}", e)),
            },
            GeneralPanelAction::Reload => {
                if let Err(e) = self.general_panel.open(&path) {
                    ui::show_error("Error", &format!("Failed to load settings: {}", e));
                }
            }
        }
    }

    fn open_general_settings(&mut self) {
        if let Some(path) = self.settings_path.clone() {
            if let Err(e) = self.general_panel.open(&path) {
                ui::show_error("Error", &format!("Failed to load settings: {}", e));
            }
        }
    }

    fn show_eye(&mut self, ui: &mut egui::Ui, eye: Eye) -> Option<EyeAction> {
        let mut action = None;

        ui.heading(eye.display_name());

        // Center offset
        ui.horizontal(|ui| {
            ui.label("Center Offset");
            let mut center = self.session.eye(eye).center;
            let mut changed = false;
            changed |= ui
                .add(egui::DragValue::new(&mut center.x).speed(0.001).fixed_decimals(4).prefix("X: "))
                .changed();
            changed |= ui
                .add(egui::DragValue::new(&mut center.y).speed(0.001).fixed_decimals(4).prefix("Y: "))
                .changed();
            if changed {
                if let Err(e) = self.session.set_center(eye, center) {
                    log::warn!("Center edit rejected: {}", e);
                }
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Reset to Default").clicked() {
                action = Some(EyeAction::Reset(eye));
            }
            if ui.button("Raw Edit...").clicked() {
                action = Some(EyeAction::RawEdit(eye));
            }
            ui.label(
                RichText::new(format!("{} samples", self.session.eye(eye).sample_count()))
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(4.0);

        if let Some(e) = self.canvases.get_mut(eye).show(ui, &mut self.session) {
            ui::show_error("Error", &e.to_string());
        }

        action
    }
}

/// Sample count from the reset control text; anything that is not a number
/// falls back to `default`.
pub fn parse_sample_count(text: &str, default: usize) -> usize {
    text.trim().parse().unwrap_or(default)
}

impl eframe::App for SettingsEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.close_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Confirm before discarding unsaved edits
        if ctx.input(|i| i.viewport().close_requested())
            && self.session.state().has_unsaved_changes()
            && !self.close_confirmed
        {
            if ui::confirm("Unsaved Changes", "Quit without saving calibration changes?") {
                self.close_confirmed = true;
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            }
        }

        // Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Settings...").clicked() {
                        ui.close_menu();
                        self.open_with_picker(&RfdPicker);
                    }
                    if ui.button("Save Settings").clicked() {
                        ui.close_menu();
                        self.save_with_feedback();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Tools", |ui| {
                    if ui.button("General Settings...").clicked() {
                        ui.close_menu();
                        self.open_general_settings();
                    }
                });
            });
        });

        // File path and save
        egui::TopBottomPanel::top("file_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let path_text = match &self.settings_path {
                    Some(path) => format!("Editing: {}", path.display()),
                    None => "Locating steamvr.vrsettings...".to_string(),
                };
                ui.label(path_text);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let enabled = self.session.state().is_loaded();
                    if ui.add_enabled(enabled, egui::Button::new("Save Settings")).clicked() {
                        self.save_with_feedback();
                    }
                });
            });
        });

        // Symmetry and reset controls
        egui::TopBottomPanel::top("controls_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.group(|ui| {
                    ui.label("Symmetry Modes");
                    let policy = &mut self.session.policy;
                    ui.checkbox(&mut policy.global, "Edit Both Eyes (Global)");
                    ui.checkbox(&mut policy.x_axis, "X-Axis Symmetry (Top/Bottom Mirror)");
                    ui.checkbox(&mut policy.y_axis, "Y-Axis Symmetry (Left/Right Mirror)");
                });

                ui.group(|ui| {
                    ui.label("Sample Count:");
                    ui.add(egui::TextEdit::singleline(&mut self.reset_count_text).desired_width(40.0));
                    egui::ComboBox::from_id_source("sample_count_presets")
                        .selected_text("Presets")
                        .width(70.0)
                        .show_ui(ui, |ui| {
                            for count in SAMPLE_COUNT_PRESETS {
                                let selected = self.reset_count_text.trim() == count.to_string();
                                if ui.selectable_label(selected, count.to_string()).clicked() {
                                    self.reset_count_text = count.to_string();
                                }
                            }
                        });
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.session.state();
                let color = if state.has_unsaved_changes() {
                    Color32::from_rgb(255, 200, 100)
                } else {
                    Color32::GRAY
                };
                ui.label(RichText::new(state.to_string()).color(color));
                ui.separator();
                ui.label(&self.status);
            });
        });

        // Central panel: both eyes
        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.session.state().is_loaded() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(
                            "Gaze calibration is not loaded.\nGeneral settings are available under Tools.",
                        )
                        .color(Color32::GRAY),
                    );
                });
                return;
            }
            ui.columns(2, |columns| {
                for (column, eye) in columns.iter_mut().zip(Eye::ALL) {
                    if let Some(action) = self.show_eye(column, eye) {
                        actions.push(action);
                    }
                }
            });
        });

        for action in actions {
            self.handle_eye_action(action);
        }

        if self.raw_editor.show(ctx, &mut self.session) {
            self.status = "Applied raw values".to_string();
        }

        if let Some(action) = self.general_panel.show(ctx) {
            self.handle_general_action(action);
        }
    }
}
