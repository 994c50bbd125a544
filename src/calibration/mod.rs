//! Gaze calibration model and editing session

mod codec;
mod model;
mod remap;
mod session;
mod symmetry;

pub use codec::{load, parse_center, parse_values, serialize, to_raw_text, CONFIG_SCALE, DEFAULT_CENTER};
pub use model::{
    drag_to_scale, sample_angle, sample_direction, symmetry_closure, to_polygon, CalibrationSet,
    Eye, EyePair, SymmetryPolicy,
};
pub use remap::{radius_at_angle, remap};
pub use session::{CalibrationEditorSession, SampleRef, SessionState};
pub use symmetry::{detect, detect_global, is_close, AxisSymmetry, ABS_TOL, REL_TOL};

/// Errors raised while loading or editing calibration data
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CalibrationError {
    #[error("Invalid calibration values: {0}")]
    Format(String),
    #[error("No calibration data is loaded")]
    NotLoaded,
    #[error("Sample index {index} is out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Global symmetry needs equal sample counts (left {left}, right {right})")]
    SampleCountMismatch { left: usize, right: usize },
    #[error("Sample count must be at least 1")]
    InvalidSampleCount,
}
