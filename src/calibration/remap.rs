//! Gaze remapping through a calibration polygon
//!
//! Mirrors what the headset driver does with the saved values, so the editor
//! can preview where a raw gaze direction ends up.

use glam::DVec2;
use std::f64::consts::TAU;

use super::model::{sample_angle, CalibrationSet};

const PARALLEL_EPSILON: f64 = 1e-5;
const SEGMENT_EPSILON: f64 = 1e-5;
const MIN_RADIUS: f64 = 1e-6;

/// Distance from the origin along `ray_dir` to the segment `p1`-`p2`, if the
/// ray crosses it.
fn ray_segment_distance(ray_dir: DVec2, p1: DVec2, p2: DVec2) -> Option<f64> {
    let segment = p1 - p2;
    let normal = DVec2::new(-ray_dir.y, ray_dir.x);
    let dot = segment.dot(normal);
    if dot.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = p1.dot(normal) / dot;
    if !(-SEGMENT_EPSILON..=1.0 + SEGMENT_EPSILON).contains(&t) {
        return None;
    }

    Some((p2.x * p1.y - p2.y * p1.x) / dot)
}

/// Radius of the calibration polygon at `angle` (radians, counter-clockwise
/// from +X).
///
/// Falls back to the preceding sample when the ray misses the bracketing
/// segment; an empty sample list behaves like the unit circle.
pub fn radius_at_angle(samples: &[f64], angle: f64) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 1.0;
    }

    let angle = angle.rem_euclid(TAU);
    let position = angle / TAU * n as f64;
    let prev = (position as usize) % n;
    if n == 1 {
        return samples[prev];
    }
    let next = (prev + 1) % n;

    let p1 = DVec2::from_angle(sample_angle(prev, n)) * samples[prev];
    let p2 = DVec2::from_angle(sample_angle(next, n)) * samples[next];

    ray_segment_distance(DVec2::from_angle(angle), p1, p2).unwrap_or(samples[prev])
}

/// Remap a raw gaze position: remove the center offset, then normalize the
/// distance by the calibrated radius in that direction.
pub fn remap(set: &CalibrationSet, gaze: DVec2) -> DVec2 {
    let centered = gaze - set.center;
    if set.samples.is_empty() {
        return centered;
    }

    let angle = centered.y.atan2(centered.x).rem_euclid(TAU);
    let radius = radius_at_angle(&set.samples, angle);
    let scale = if radius > MIN_RADIUS { radius } else { 1.0 };

    DVec2::from_angle(angle) * (centered.length() / scale)
}
