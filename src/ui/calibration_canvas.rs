//! Calibration canvas
//!
//! Draws one eye's calibration polygon over the unit circle and lets the user
//! drag handles radially. Hovering shows where the driver would remap that
//! gaze position.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Shape, Stroke, Vec2};
use glam::DVec2;

use crate::calibration::{remap, CalibrationEditorSession, CalibrationError, Eye};
use crate::config::{CANVAS_RADIUS_FRACTION, HANDLE_GRAB_DISTANCE, HANDLE_RADIUS};

const POLYGON_COLOR: Color32 = Color32::from_rgb(100, 180, 255);
const ACTIVE_COLOR: Color32 = Color32::from_rgb(255, 200, 100);
const PREVIEW_COLOR: Color32 = Color32::from_rgb(120, 220, 120);
const MIN_CANVAS_SIZE: f32 = 160.0;

/// Interactive editor for a single eye
pub struct CalibrationCanvas {
    eye: Eye,
    /// Handle being dragged
    active_handle: Option<usize>,
}

impl CalibrationCanvas {
    pub fn new(eye: Eye) -> Self {
        Self {
            eye,
            active_handle: None,
        }
    }

    /// Draw the canvas and apply any handle drag to `session`.
    ///
    /// Returns the error of a rejected drag. The drag is dropped so the error
    /// is reported once.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &mut CalibrationEditorSession,
    ) -> Option<CalibrationError> {
        let side = ui
            .available_width()
            .min(ui.available_height())
            .max(MIN_CANVAS_SIZE);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), egui::Sense::click_and_drag());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.5 * CANVAS_RADIUS_FRACTION;

        let mut error = None;

        // Handle interaction
        if response.drag_started() {
            let points = handle_positions(session, self.eye, center, radius);
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            self.active_handle = origin.and_then(|pos| closest_handle(&points, pos));
        }

        if response.dragged() {
            if let (Some(index), Some(pos)) = (self.active_handle, response.interact_pointer_pos()) {
                let pointer = to_model(pos, center, radius) * radius as f64;
                if let Err(e) = session.drag_handle(self.eye, index, pointer, radius as f64) {
                    self.active_handle = None;
                    error = Some(e);
                }
            }
        }

        if self.active_handle.is_some() && ui.input(|i| i.pointer.any_released()) {
            self.active_handle = None;
        }

        // Background and reference
        painter.rect_filled(rect, 4.0, Color32::from_gray(30));
        draw_reference(&painter, center, radius);
        painter.text(
            rect.left_top() + Vec2::new(6.0, 4.0),
            Align2::LEFT_TOP,
            self.eye.display_name(),
            FontId::proportional(13.0),
            Color32::from_gray(200),
        );

        // Calibration polygon
        let points = handle_positions(session, self.eye, center, radius);
        if points.len() > 1 {
            painter.add(Shape::closed_line(points.clone(), Stroke::new(2.0, POLYGON_COLOR)));
        }

        for (i, pos) in points.iter().enumerate() {
            let is_active = self.active_handle == Some(i);
            let color = if is_active { ACTIVE_COLOR } else { POLYGON_COLOR };
            let size = if is_active { HANDLE_RADIUS * 1.5 } else { HANDLE_RADIUS };
            painter.circle_filled(*pos, size, color);
            painter.circle_stroke(*pos, size, Stroke::new(1.0, Color32::WHITE));
        }

        // Center offset marker
        let set = session.eye(self.eye);
        let offset = to_screen(set.center, center, radius);
        let cross = 5.0;
        painter.line_segment(
            [offset - Vec2::new(cross, 0.0), offset + Vec2::new(cross, 0.0)],
            Stroke::new(1.5, ACTIVE_COLOR),
        );
        painter.line_segment(
            [offset - Vec2::new(0.0, cross), offset + Vec2::new(0.0, cross)],
            Stroke::new(1.5, ACTIVE_COLOR),
        );

        // Remap preview
        if self.active_handle.is_none() {
            if let Some(hover) = response.hover_pos() {
                let gaze = to_model(hover, center, radius);
                let remapped = remap(set, gaze);
                let target = to_screen(remapped, center, radius);

                painter.line_segment([hover, target], Stroke::new(1.0, PREVIEW_COLOR.gamma_multiply(0.5)));
                painter.circle_filled(target, 3.0, PREVIEW_COLOR);
                painter.text(
                    rect.left_bottom() + Vec2::new(6.0, -4.0),
                    Align2::LEFT_BOTTOM,
                    format!(
                        "gaze ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                        gaze.x, gaze.y, remapped.x, remapped.y
                    ),
                    FontId::monospace(11.0),
                    PREVIEW_COLOR,
                );
            }
        }

        error
    }
}

/// Unit circle and axes
fn draw_reference(painter: &egui::Painter, center: Pos2, radius: f32) {
    let stroke = Stroke::new(1.0, Color32::from_gray(80));
    painter.circle_stroke(center, radius, stroke);
    painter.extend(Shape::dashed_line(
        &[center - Vec2::new(radius, 0.0), center + Vec2::new(radius, 0.0)],
        stroke,
        4.0,
        4.0,
    ));
    painter.extend(Shape::dashed_line(
        &[center - Vec2::new(0.0, radius), center + Vec2::new(0.0, radius)],
        stroke,
        4.0,
        4.0,
    ));
}

fn handle_positions(
    session: &CalibrationEditorSession,
    eye: Eye,
    center: Pos2,
    radius: f32,
) -> Vec<Pos2> {
    session
        .eye(eye)
        .polygon(DVec2::new(center.x as f64, center.y as f64), radius as f64)
        .into_iter()
        .map(|p| Pos2::new(p.x as f32, p.y as f32))
        .collect()
}

/// Screen position to model units (unit radius, Y up)
fn to_model(pos: Pos2, center: Pos2, radius: f32) -> DVec2 {
    DVec2::new(
        ((pos.x - center.x) / radius) as f64,
        ((center.y - pos.y) / radius) as f64,
    )
}

/// Model units to screen position
fn to_screen(point: DVec2, center: Pos2, radius: f32) -> Pos2 {
    Pos2::new(
        center.x + point.x as f32 * radius,
        center.y - point.y as f32 * radius,
    )
}

/// Index of the handle nearest `pos`, if within grab distance
fn closest_handle(points: &[Pos2], pos: Pos2) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(pos)))
        .filter(|(_, dist)| *dist <= HANDLE_GRAB_DISTANCE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_model_conversion() {
        let center = Pos2::new(200.0, 200.0);
        let model = to_model(Pos2::new(250.0, 100.0), center, 100.0);
        assert!((model - DVec2::new(0.5, 1.0)).length() < 1e-6);
        assert_eq!(to_screen(model, center, 100.0), Pos2::new(250.0, 100.0));
    }

    #[test]
    fn test_closest_handle_within_reach() {
        let points = [Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0), Pos2::new(100.0, 0.0)];
        assert_eq!(closest_handle(&points, Pos2::new(7.0, 1.0)), Some(1));
        assert_eq!(closest_handle(&points, Pos2::new(50.0, 0.0)), None);
        assert_eq!(closest_handle(&[], Pos2::ZERO), None);
    }

    #[test]
    fn test_handle_positions_follow_session() {
        let mut session = CalibrationEditorSession::new(4);
        session.load((None, None), (None, None)).unwrap();
        session.policy = Default::default();
        session.apply_edit(Eye::RightEye, 1, 0.5).unwrap();

        let points = handle_positions(&session, Eye::RightEye, Pos2::new(100.0, 100.0), 80.0);
        assert_eq!(points.len(), 4);
        assert!(points[0].distance(Pos2::new(180.0, 100.0)) < 1e-3);
        assert!(points[1].distance(Pos2::new(100.0, 60.0)) < 1e-3);
    }
}
