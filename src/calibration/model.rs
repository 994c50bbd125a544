//! Radial calibration model
//!
//! A calibration curve is a polygon around a unit circle: sample `i` of `N` is a
//! scale factor applied to the base radius along the direction `i * 2π / N`.

use glam::DVec2;
use std::collections::BTreeSet;
use std::f64::consts::TAU;

use crate::config::DEFAULT_SAMPLE_COUNT;

/// One of the two eyes of the headset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Eye {
    LeftEye,
    RightEye,
}

impl Eye {
    /// Both eyes in file order
    pub const ALL: [Eye; 2] = [Eye::LeftEye, Eye::RightEye];

    /// The paired eye used for global symmetry
    pub fn other(self) -> Eye {
        match self {
            Eye::LeftEye => Eye::RightEye,
            Eye::RightEye => Eye::LeftEye,
        }
    }

    /// Prefix of this eye's keys in the settings section
    pub fn key_prefix(self) -> &'static str {
        match self {
            Eye::LeftEye => "LeftEye",
            Eye::RightEye => "RightEye",
        }
    }

    /// Get display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            Eye::LeftEye => "Left Eye",
            Eye::RightEye => "Right Eye",
        }
    }
}

impl std::fmt::Display for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_prefix())
    }
}

/// A value held for each eye, addressed by [`Eye`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EyePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> EyePair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, eye: Eye) -> &T {
        match eye {
            Eye::LeftEye => &self.left,
            Eye::RightEye => &self.right,
        }
    }

    pub fn get_mut(&mut self, eye: Eye) -> &mut T {
        match eye {
            Eye::LeftEye => &mut self.left,
            Eye::RightEye => &mut self.right,
        }
    }

    /// Borrow `eye` and its paired eye mutably at the same time.
    pub fn split_mut(&mut self, eye: Eye) -> (&mut T, &mut T) {
        match eye {
            Eye::LeftEye => (&mut self.left, &mut self.right),
            Eye::RightEye => (&mut self.right, &mut self.left),
        }
    }
}

/// Per-eye calibration data in actual units
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSet {
    /// Gaze center offset
    pub center: DVec2,
    /// Radial scale factors, one per angular position
    pub samples: Vec<f64>,
}

impl Default for CalibrationSet {
    fn default() -> Self {
        Self::uniform(DEFAULT_SAMPLE_COUNT)
    }
}

impl CalibrationSet {
    /// Centered set with every sample at 1.0
    pub fn uniform(sample_count: usize) -> Self {
        Self {
            center: DVec2::ZERO,
            samples: vec![1.0; sample_count],
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Polygon vertices for this set in screen space
    pub fn polygon(&self, center_pixel: DVec2, radius_pixel: f64) -> Vec<DVec2> {
        to_polygon(&self.samples, center_pixel, radius_pixel)
    }
}

/// Symmetry constraints applied while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymmetryPolicy {
    /// Keep left and right eye samples identical
    pub global: bool,
    /// Mirror index `i` onto `N - i` (top/bottom)
    pub x_axis: bool,
    /// Mirror index `i` onto `N/2 - i` (left/right)
    pub y_axis: bool,
}

/// Angle of sample `index` out of `sample_count`, counter-clockwise from +X.
pub fn sample_angle(index: usize, sample_count: usize) -> f64 {
    index as f64 * TAU / sample_count as f64
}

/// Unit direction of sample `index` in model space (Y up).
pub fn sample_direction(index: usize, sample_count: usize) -> DVec2 {
    let angle = sample_angle(index, sample_count);
    DVec2::new(angle.cos(), angle.sin())
}

/// Convert samples to screen-space vertices around `center_pixel`.
///
/// Vertex 0 points along +X; screen Y grows downward so the model Y is negated.
pub fn to_polygon(samples: &[f64], center_pixel: DVec2, radius_pixel: f64) -> Vec<DVec2> {
    let n = samples.len();
    samples
        .iter()
        .enumerate()
        .map(|(i, scale)| {
            let dir = sample_direction(i, n);
            center_pixel + DVec2::new(dir.x, -dir.y) * (scale * radius_pixel)
        })
        .collect()
}

/// Scale for handle `index` given the pointer position relative to the canvas
/// center in model space (Y up).
///
/// Only the radial component of the pointer counts; the result is never
/// negative.
pub fn drag_to_scale(
    index: usize,
    sample_count: usize,
    pointer_from_center: DVec2,
    radius_pixel: f64,
) -> f64 {
    if sample_count == 0 || radius_pixel <= 0.0 {
        return 0.0;
    }
    let projected = pointer_from_center.dot(sample_direction(index, sample_count));
    (projected / radius_pixel).max(0.0)
}

/// Indices that must receive the same value as `index` under `policy`.
///
/// The Y mirror is applied to the X-expanded set so that combined X+Y
/// symmetry yields the full 4-way closure.
pub fn symmetry_closure(index: usize, sample_count: usize, policy: &SymmetryPolicy) -> BTreeSet<usize> {
    let mut indices = BTreeSet::new();
    if sample_count == 0 {
        return indices;
    }
    let n = sample_count;
    indices.insert(index % n);

    if policy.x_axis {
        let mirrored: Vec<usize> = indices.iter().map(|&i| (n - i) % n).collect();
        indices.extend(mirrored);
    }

    if policy.y_axis {
        let half = n / 2;
        let mirrored: Vec<usize> = indices.iter().map(|&i| (half + n - i) % n).collect();
        indices.extend(mirrored);
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_polygon_vertex_count_and_start() {
        for n in [1, 3, 6, 32] {
            let samples = vec![1.0; n];
            let points = to_polygon(&samples, DVec2::new(200.0, 200.0), 100.0);
            assert_eq!(points.len(), n);
            assert!(close(points[0], DVec2::new(300.0, 200.0)));
        }
    }

    #[test]
    fn test_polygon_screen_y_is_inverted() {
        let samples = [1.0, 0.5, 1.0, 1.0];
        let points = to_polygon(&samples, DVec2::new(0.0, 0.0), 100.0);
        // Index 1 of 4 points up on screen (negative screen Y).
        assert!(close(points[1], DVec2::new(0.0, -50.0)));
        assert!(close(points[2], DVec2::new(-100.0, 0.0)));
        assert!(close(points[3], DVec2::new(0.0, 100.0)));
    }

    #[test]
    fn test_drag_projects_onto_ray() {
        // Handle 0 points along +X; tangential motion is ignored.
        let scale = drag_to_scale(0, 8, DVec2::new(50.0, 30.0), 100.0);
        assert!((scale - 0.5).abs() < 1e-12);

        // Handle 2 of 8 points along +Y.
        let scale = drag_to_scale(2, 8, DVec2::new(-20.0, 150.0), 100.0);
        assert!((scale - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_drag_opposite_ray_clamps_to_zero() {
        for index in 0..8 {
            let dir = sample_direction(index, 8);
            assert_eq!(drag_to_scale(index, 8, -dir * 80.0, 100.0), 0.0);
        }
        assert_eq!(drag_to_scale(0, 8, DVec2::new(50.0, 0.0), 0.0), 0.0);
    }

    #[test]
    fn test_closure_without_symmetry() {
        let policy = SymmetryPolicy::default();
        let indices: Vec<_> = symmetry_closure(5, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![5]);
    }

    #[test]
    fn test_closure_x_axis() {
        let policy = SymmetryPolicy { x_axis: true, ..Default::default() };
        let indices: Vec<_> = symmetry_closure(5, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![5, 27]);

        // Index 0 mirrors onto itself.
        let indices: Vec<_> = symmetry_closure(0, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn test_closure_y_axis() {
        let policy = SymmetryPolicy { y_axis: true, ..Default::default() };
        let indices: Vec<_> = symmetry_closure(5, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![5, 11]);

        // 20 mirrors to (16 - 20 + 32) % 32 = 28.
        let indices: Vec<_> = symmetry_closure(20, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![20, 28]);
    }

    #[test]
    fn test_closure_both_axes() {
        let policy = SymmetryPolicy { x_axis: true, y_axis: true, global: false };
        let indices: Vec<_> = symmetry_closure(5, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![5, 11, 21, 27]);

        // Boundary indices collapse to two entries.
        let indices: Vec<_> = symmetry_closure(0, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![0, 16]);
        let indices: Vec<_> = symmetry_closure(8, 32, &policy).into_iter().collect();
        assert_eq!(indices, vec![8, 24]);
    }

    #[test]
    fn test_eye_pair_split() {
        let mut pair = EyePair::new(1, 2);
        let (edited, paired) = pair.split_mut(Eye::RightEye);
        *edited += 10;
        *paired += 20;
        assert_eq!(pair, EyePair::new(21, 12));
        assert_eq!(Eye::LeftEye.other(), Eye::RightEye);
    }
}
