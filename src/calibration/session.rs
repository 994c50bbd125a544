//! Calibration editor session
//!
//! Owns both eyes and the symmetry toggles, and applies every edit the UI
//! requests. The UI only reads from the session and redraws.

use glam::DVec2;

use super::codec;
use super::model::{drag_to_scale, symmetry_closure, CalibrationSet, Eye, EyePair, SymmetryPolicy};
use super::symmetry::{detect, detect_global};
use super::CalibrationError;
use crate::config::DEFAULT_SAMPLE_COUNT;

/// Lifecycle of the editor session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No settings have been parsed yet
    Unloaded,
    /// Data matches what was last loaded or saved
    Loaded,
    /// Data has been edited since the last load or save
    Modified,
}

impl SessionState {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, SessionState::Unloaded)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        matches!(self, SessionState::Modified)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Unloaded => write!(f, "Not loaded"),
            SessionState::Loaded => write!(f, "Saved"),
            SessionState::Modified => write!(f, "Unsaved changes"),
        }
    }
}

/// A single sample changed by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SampleRef {
    pub eye: Eye,
    pub index: usize,
}

/// Editing session over the left and right eye calibration sets
#[derive(Debug, Clone)]
pub struct CalibrationEditorSession {
    /// Calibration data for each eye
    eyes: EyePair<CalibrationSet>,
    /// Active symmetry toggles
    pub policy: SymmetryPolicy,
    /// Current lifecycle state
    state: SessionState,
    /// Sample count used when the file has no calibration for an eye
    default_sample_count: usize,
}

impl Default for CalibrationEditorSession {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_COUNT)
    }
}

impl CalibrationEditorSession {
    pub fn new(default_sample_count: usize) -> Self {
        let default_sample_count = default_sample_count.max(1);
        Self {
            eyes: EyePair::new(
                CalibrationSet::uniform(default_sample_count),
                CalibrationSet::uniform(default_sample_count),
            ),
            policy: SymmetryPolicy::default(),
            state: SessionState::Unloaded,
            default_sample_count,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn default_sample_count(&self) -> usize {
        self.default_sample_count
    }

    pub fn eye(&self, eye: Eye) -> &CalibrationSet {
        self.eyes.get(eye)
    }

    pub fn eyes(&self) -> &EyePair<CalibrationSet> {
        &self.eyes
    }

    /// Load both eyes from their serialized `(center, calibration)` strings.
    ///
    /// Nothing changes unless both eyes parse.
    pub fn load(
        &mut self,
        left: (Option<&str>, Option<&str>),
        right: (Option<&str>, Option<&str>),
    ) -> Result<(), CalibrationError> {
        let left = codec::load(left.0, left.1, self.default_sample_count)?;
        let right = codec::load(right.0, right.1, self.default_sample_count)?;

        self.eyes = EyePair::new(left, right);
        self.state = SessionState::Loaded;
        self.infer_policy();

        log::info!(
            "Loaded gaze calibration ({} left / {} right samples)",
            self.eyes.left.sample_count(),
            self.eyes.right.sample_count()
        );
        Ok(())
    }

    /// Serialized `(center, calibration)` strings for an eye.
    pub fn serialize(&self, eye: Eye) -> (String, String) {
        codec::serialize(self.eyes.get(eye))
    }

    /// Record that the current data has been written to disk.
    pub fn mark_saved(&mut self) {
        if self.state.is_loaded() {
            self.state = SessionState::Loaded;
        }
    }

    /// Set the symmetry toggles from the current data.
    ///
    /// An axis is reported only when both eyes are symmetric about it.
    pub fn infer_policy(&mut self) {
        let left = detect(&self.eyes.left.samples);
        let right = detect(&self.eyes.right.samples);

        self.policy = SymmetryPolicy {
            global: detect_global(&self.eyes.left.samples, &self.eyes.right.samples),
            x_axis: left.x_axis && right.x_axis,
            y_axis: left.y_axis && right.y_axis,
        };

        log::debug!("Inferred symmetry policy: {:?}", self.policy);
    }

    fn ensure_loaded(&self) -> Result<(), CalibrationError> {
        if self.state.is_loaded() {
            Ok(())
        } else {
            Err(CalibrationError::NotLoaded)
        }
    }

    /// Set sample `index` of `eye` to `new_scale`, propagating through the
    /// active symmetry policy.
    ///
    /// Returns every changed sample. Under global symmetry both eyes must have
    /// the same sample count; otherwise nothing is changed.
    pub fn apply_edit(
        &mut self,
        eye: Eye,
        index: usize,
        new_scale: f64,
    ) -> Result<Vec<SampleRef>, CalibrationError> {
        self.ensure_loaded()?;

        let policy = self.policy;
        let (edited, paired) = self.eyes.split_mut(eye);
        let len = edited.samples.len();
        if index >= len {
            return Err(CalibrationError::IndexOutOfRange { index, len });
        }
        if policy.global && paired.samples.len() != len {
            let (left, right) = match eye {
                Eye::LeftEye => (len, paired.samples.len()),
                Eye::RightEye => (paired.samples.len(), len),
            };
            return Err(CalibrationError::SampleCountMismatch { left, right });
        }

        let indices = symmetry_closure(index, len, &policy);
        let mut changed = Vec::with_capacity(indices.len() * 2);

        for &i in &indices {
            edited.samples[i] = new_scale;
            changed.push(SampleRef { eye, index: i });
        }

        if policy.global {
            for &i in &indices {
                paired.samples[i] = new_scale;
                changed.push(SampleRef { eye: eye.other(), index: i });
            }
        }

        self.state = SessionState::Modified;
        Ok(changed)
    }

    /// Apply a handle drag: the pointer position relative to the canvas center
    /// (model space, Y up) is projected onto the handle's ray.
    pub fn drag_handle(
        &mut self,
        eye: Eye,
        index: usize,
        pointer_from_center: DVec2,
        radius_pixel: f64,
    ) -> Result<Vec<SampleRef>, CalibrationError> {
        let sample_count = self.eyes.get(eye).sample_count();
        let new_scale = drag_to_scale(index, sample_count, pointer_from_center, radius_pixel);
        self.apply_edit(eye, index, new_scale)
    }

    /// Replace an eye's center offset; under global symmetry the paired eye
    /// follows.
    pub fn set_center(&mut self, eye: Eye, center: DVec2) -> Result<(), CalibrationError> {
        self.ensure_loaded()?;

        let global = self.policy.global;
        let (edited, paired) = self.eyes.split_mut(eye);
        if edited.center == center && (!global || paired.center == center) {
            return Ok(());
        }

        edited.center = center;
        if global {
            paired.center = center;
        }
        self.state = SessionState::Modified;
        Ok(())
    }

    /// Reset an eye to a centered uniform set of `sample_count` ones. Under
    /// global symmetry both eyes are reset.
    pub fn reset(&mut self, eye: Eye, sample_count: usize) -> Result<(), CalibrationError> {
        self.ensure_loaded()?;
        if sample_count == 0 {
            return Err(CalibrationError::InvalidSampleCount);
        }

        *self.eyes.get_mut(eye) = CalibrationSet::uniform(sample_count);
        if self.policy.global {
            *self.eyes.get_mut(eye.other()) = CalibrationSet::uniform(sample_count);
        }

        log::info!(
            "Reset {} to {} samples{}",
            eye,
            sample_count,
            if self.policy.global { " (both eyes)" } else { "" }
        );

        self.state = SessionState::Modified;
        self.infer_policy();
        Ok(())
    }

    /// Replace an eye's data wholesale. Values are taken as given; the
    /// symmetry toggles are re-detected afterwards.
    pub fn bulk_replace(
        &mut self,
        eye: Eye,
        center: DVec2,
        samples: Vec<f64>,
    ) -> Result<(), CalibrationError> {
        self.ensure_loaded()?;
        if samples.is_empty() {
            return Err(CalibrationError::Format("at least one sample is required".to_string()));
        }

        *self.eyes.get_mut(eye) = CalibrationSet { center, samples };
        self.state = SessionState::Modified;
        self.infer_policy();
        Ok(())
    }

    /// Parse raw (unscaled) text and replace an eye's data. On any parse
    /// error the session is left untouched.
    pub fn bulk_replace_text(
        &mut self,
        eye: Eye,
        center_text: &str,
        samples_text: &str,
    ) -> Result<(), CalibrationError> {
        let center = codec::parse_center(center_text)?;
        let samples = codec::parse_values(samples_text)?;
        self.bulk_replace(eye, center, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_session() -> CalibrationEditorSession {
        let mut session = CalibrationEditorSession::new(32);
        session.load((None, None), (None, None)).unwrap();
        session
    }

    fn count_equal(samples: &[f64], value: f64) -> usize {
        samples.iter().filter(|v| **v == value).count()
    }

    #[test]
    fn test_load_defaults_and_inference() {
        let session = loaded_session();
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.eye(Eye::LeftEye).samples, vec![1.0; 32]);
        assert_eq!(session.eye(Eye::RightEye).center, DVec2::ZERO);
        assert_eq!(
            session.policy,
            SymmetryPolicy { global: true, x_axis: true, y_axis: true }
        );
    }

    #[test]
    fn test_failed_load_stays_unloaded() {
        let mut session = CalibrationEditorSession::new(32);
        let result = session.load((Some("1"), None), (None, None));
        assert!(matches!(result, Err(CalibrationError::Format(_))));
        assert_eq!(session.state(), SessionState::Unloaded);
        assert_eq!(session.apply_edit(Eye::LeftEye, 0, 0.5), Err(CalibrationError::NotLoaded));
    }

    #[test]
    fn test_x_axis_edit_scenario() {
        let mut session = loaded_session();
        session.policy = SymmetryPolicy { x_axis: true, ..Default::default() };

        let changed = session.apply_edit(Eye::LeftEye, 5, 0.7).unwrap();
        assert_eq!(
            changed,
            vec![
                SampleRef { eye: Eye::LeftEye, index: 5 },
                SampleRef { eye: Eye::LeftEye, index: 27 },
            ]
        );

        let left = &session.eye(Eye::LeftEye).samples;
        assert_eq!(left[5], 0.7);
        assert_eq!(left[27], 0.7);
        assert_eq!(count_equal(left, 1.0), 30);
        assert_eq!(session.eye(Eye::RightEye).samples, vec![1.0; 32]);
        assert_eq!(session.state(), SessionState::Modified);
    }

    #[test]
    fn test_combined_axes_edit() {
        let mut session = loaded_session();
        session.policy = SymmetryPolicy { x_axis: true, y_axis: true, global: false };

        session.apply_edit(Eye::RightEye, 5, 0.4).unwrap();
        let right = &session.eye(Eye::RightEye).samples;
        for i in [5, 11, 21, 27] {
            assert_eq!(right[i], 0.4, "index {}", i);
        }
        assert_eq!(count_equal(right, 1.0), 28);

        session.apply_edit(Eye::RightEye, 0, 0.9).unwrap();
        let right = &session.eye(Eye::RightEye).samples;
        assert_eq!(right[0], 0.9);
        assert_eq!(right[16], 0.9);
        assert_eq!(count_equal(right, 0.9), 2);
    }

    #[test]
    fn test_global_edit_scenario() {
        let mut session = loaded_session();
        session.policy = SymmetryPolicy { global: true, ..Default::default() };

        let changed = session.apply_edit(Eye::LeftEye, 0, 0.5).unwrap();
        assert_eq!(changed.len(), 2);

        assert_eq!(session.eye(Eye::LeftEye).samples[0], 0.5);
        let right = &session.eye(Eye::RightEye).samples;
        assert_eq!(right[0], 0.5);
        assert_eq!(count_equal(right, 1.0), 31);
    }

    #[test]
    fn test_global_edit_rejects_mismatched_counts() {
        let mut session = CalibrationEditorSession::new(32);
        session
            .load((None, Some("100 100 100 100")), (None, None))
            .unwrap();
        session.policy.global = true;

        let result = session.apply_edit(Eye::RightEye, 2, 0.3);
        assert_eq!(
            result,
            Err(CalibrationError::SampleCountMismatch { left: 4, right: 32 })
        );
        assert_eq!(session.eye(Eye::RightEye).samples, vec![1.0; 32]);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut session = loaded_session();
        assert_eq!(
            session.apply_edit(Eye::LeftEye, 32, 0.5),
            Err(CalibrationError::IndexOutOfRange { index: 32, len: 32 })
        );
    }

    #[test]
    fn test_drag_handle_clamps() {
        let mut session = loaded_session();
        session.policy = SymmetryPolicy::default();

        // Handle 0 points along +X; dragging to the left clamps at zero.
        session
            .drag_handle(Eye::LeftEye, 0, DVec2::new(-40.0, 5.0), 100.0)
            .unwrap();
        assert_eq!(session.eye(Eye::LeftEye).samples[0], 0.0);

        session
            .drag_handle(Eye::LeftEye, 0, DVec2::new(75.0, 40.0), 100.0)
            .unwrap();
        assert!((session.eye(Eye::LeftEye).samples[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_reset_with_global() {
        let mut session = CalibrationEditorSession::new(32);
        session.load((Some("5 5"), Some("90 80")), (None, None)).unwrap();
        session.policy.global = true;

        session.reset(Eye::LeftEye, 16).unwrap();
        assert_eq!(session.eye(Eye::LeftEye), &CalibrationSet::uniform(16));
        assert_eq!(session.eye(Eye::RightEye), &CalibrationSet::uniform(16));
        assert!(session.policy.global && session.policy.x_axis && session.policy.y_axis);

        assert_eq!(session.reset(Eye::LeftEye, 0), Err(CalibrationError::InvalidSampleCount));
    }

    #[test]
    fn test_reset_single_eye() {
        let mut session = loaded_session();
        session.policy.global = false;
        session.reset(Eye::RightEye, 6).unwrap();
        assert_eq!(session.eye(Eye::RightEye).sample_count(), 6);
        assert_eq!(session.eye(Eye::LeftEye).sample_count(), 32);
        // 6 is not divisible by 4 and the eyes now differ.
        assert_eq!(session.policy, SymmetryPolicy::default());
    }

    #[test]
    fn test_bulk_replace_redetects_policy() {
        let mut session = loaded_session();
        session
            .bulk_replace_text(Eye::LeftEye, "0.1 0.2", "1 0.9 0.8 0.9")
            .unwrap();

        let left = session.eye(Eye::LeftEye);
        assert_eq!(left.center, DVec2::new(0.1, 0.2));
        assert_eq!(left.samples, vec![1.0, 0.9, 0.8, 0.9]);
        assert!(!session.policy.global);
        assert_eq!(session.state(), SessionState::Modified);
    }

    #[test]
    fn test_bad_bulk_replace_leaves_model_untouched() {
        let mut session = loaded_session();
        let before = session.eyes().clone();

        assert!(session.bulk_replace_text(Eye::LeftEye, "0 0 0", "1 1").is_err());
        assert!(session.bulk_replace_text(Eye::LeftEye, "0 0", "1 x").is_err());
        assert!(session.bulk_replace_text(Eye::LeftEye, "0 0", "").is_err());

        assert_eq!(session.eyes(), &before);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn test_set_center_follows_global() {
        let mut session = loaded_session();
        session.policy.global = true;
        session.set_center(Eye::RightEye, DVec2::new(0.02, -0.01)).unwrap();
        assert_eq!(session.eye(Eye::LeftEye).center, DVec2::new(0.02, -0.01));

        session.policy.global = false;
        session.set_center(Eye::LeftEye, DVec2::ZERO).unwrap();
        assert_eq!(session.eye(Eye::RightEye).center, DVec2::new(0.02, -0.01));
    }

    #[test]
    fn test_save_returns_to_loaded() {
        let mut session = loaded_session();
        session.apply_edit(Eye::LeftEye, 1, 0.2).unwrap();
        assert!(session.state().has_unsaved_changes());
        session.mark_saved();
        assert_eq!(session.state(), SessionState::Loaded);

        let mut fresh = CalibrationEditorSession::new(32);
        fresh.mark_saved();
        assert_eq!(fresh.state(), SessionState::Unloaded);
    }
}
