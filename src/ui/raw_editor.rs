//! Raw values window
//!
//! Text editing of one eye's center and samples in actual units.

use eframe::egui::{self, Color32, RichText, Vec2};

use crate::calibration::{to_raw_text, CalibrationEditorSession, Eye};

/// Raw values editor window
#[derive(Default)]
pub struct RawValuesEditor {
    /// Eye being edited, `None` when closed
    eye: Option<Eye>,
    center_text: String,
    samples_text: String,
    /// Last apply error
    error: Option<String>,
}

impl RawValuesEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.eye.is_some()
    }

    /// Open the window for `eye` with its current values.
    pub fn open(&mut self, eye: Eye, session: &CalibrationEditorSession) {
        let (center, samples) = to_raw_text(session.eye(eye));
        self.eye = Some(eye);
        self.center_text = center;
        self.samples_text = samples;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.eye = None;
        self.error = None;
    }

    /// Parse the text fields and replace the eye's data. The window stays
    /// open with the error shown when parsing fails.
    pub fn apply(&mut self, session: &mut CalibrationEditorSession) -> bool {
        let Some(eye) = self.eye else {
            return false;
        };

        match session.bulk_replace_text(eye, &self.center_text, &self.samples_text) {
            Ok(()) => {
                log::info!(
                    "Applied raw values to {} ({} samples)",
                    eye,
                    session.eye(eye).sample_count()
                );
                self.close();
                true
            }
            Err(e) => {
                log::warn!("Rejected raw values for {}: {}", eye, e);
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Show the window. Returns true when new values were applied.
    pub fn show(&mut self, ctx: &egui::Context, session: &mut CalibrationEditorSession) -> bool {
        let Some(eye) = self.eye else {
            return false;
        };

        let mut is_open = true;
        let mut applied = false;
        let mut close_clicked = false;

        egui::Window::new(format!("Raw Edit: {}", eye.display_name()))
            .id(egui::Id::new("raw_values_editor"))
            .default_size(Vec2::new(480.0, 320.0))
            .resizable(true)
            .collapsible(false)
            .open(&mut is_open)
            .show(ctx, |ui| {
                ui.label("Center (X Y)");
                ui.add(egui::TextEdit::singleline(&mut self.center_text).desired_width(f32::INFINITY));

                ui.add_space(6.0);
                ui.label("Calibration Data (Space-separated)");
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.samples_text)
                            .desired_width(f32::INFINITY)
                            .desired_rows(8)
                            .font(egui::TextStyle::Monospace),
                    );
                });

                if let Some(ref error) = self.error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("⚠ {}", error)).color(Color32::YELLOW));
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply Changes").clicked() {
                        applied = self.apply(session);
                    }
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                });
            });

        if !is_open || close_clicked {
            self.close();
        }
        applied
    }
}
