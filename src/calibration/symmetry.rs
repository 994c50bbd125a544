//! Symmetry detection for calibration sample arrays
//!
//! Samples are laid out counter-clockwise starting at 3 o'clock, so index `i`
//! and index `N - i` are mirrored about the horizontal axis, and index `i` and
//! index `N/2 - i` are mirrored about the vertical axis.

/// Relative tolerance used by [`is_close`].
pub const REL_TOL: f64 = 1e-9;

/// Absolute tolerance used by [`is_close`], so that values at or near zero
/// still compare equal.
pub const ABS_TOL: f64 = 1e-12;

/// Approximate float equality:
/// `|a - b| <= max(REL_TOL * max(|a|, |b|), ABS_TOL)`.
pub fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    diff <= (REL_TOL * a.abs().max(b.abs())).max(ABS_TOL)
}

/// Result of running the detector on a single eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSymmetry {
    /// Top/bottom mirror symmetry
    pub x_axis: bool,
    /// Left/right mirror symmetry
    pub y_axis: bool,
}

/// Detect top/bottom and left/right mirror symmetry of one eye's samples.
///
/// Only sample counts divisible by 4 have the quadrant structure required for
/// either check; every other count reports no symmetry.
pub fn detect(samples: &[f64]) -> AxisSymmetry {
    let n = samples.len();
    if n == 0 || n % 4 != 0 {
        return AxisSymmetry::default();
    }

    let half = n / 2;
    let quarter = n / 4;

    // Index 0 and N/2 sit on the axis and mirror onto themselves.
    let x_axis = (1..half).all(|i| is_close(samples[i], samples[n - i]));

    let y_axis = (1..=quarter).all(|i| {
        is_close(samples[i], samples[half - i]) && is_close(samples[n - i], samples[half + i])
    });

    AxisSymmetry { x_axis, y_axis }
}

/// True when both eyes hold the same number of samples and every pair is close.
pub fn detect_global(left: &[f64], right: &[f64]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| is_close(*a, *b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_samples_are_symmetric() {
        for n in [4, 8, 16, 32, 64] {
            let samples = vec![0.8; n];
            assert_eq!(
                detect(&samples),
                AxisSymmetry { x_axis: true, y_axis: true },
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_counts_not_divisible_by_four() {
        for n in [0, 1, 2, 3, 5, 6, 7, 10, 30] {
            let samples = vec![1.0; n];
            assert_eq!(detect(&samples), AxisSymmetry::default(), "n = {}", n);
        }

        let uneven = [0.1, 0.9, 0.3, 0.7, 0.5, 0.2];
        assert_eq!(detect(&uneven), AxisSymmetry::default());
        let mirrored = [0.4, 0.9, 0.3, 0.5, 0.3, 0.9];
        assert_eq!(detect(&mirrored), AxisSymmetry::default());
    }

    #[test]
    fn test_x_only_symmetry() {
        // 8 samples: pairs (1,7), (2,6), (3,5) match, but 1 != 3 breaks Y.
        let samples = [1.0, 0.9, 0.8, 0.7, 0.6, 0.7, 0.8, 0.9];
        let result = detect(&samples);
        assert!(result.x_axis);
        assert!(!result.y_axis);
    }

    #[test]
    fn test_y_only_symmetry() {
        // Y pairs: (1,3), (7,5); (2) is on the vertical axis.
        let samples = [1.0, 0.9, 0.5, 0.9, 0.6, 0.4, 0.3, 0.4];
        let result = detect(&samples);
        assert!(!result.x_axis);
        assert!(result.y_axis);
    }

    #[test]
    fn test_y_checks_lower_half_independently() {
        // Upper half mirrors, lower half does not.
        let samples = [1.0, 0.9, 0.5, 0.9, 0.6, 0.4, 0.3, 0.2];
        assert!(!detect(&samples).y_axis);
    }

    #[test]
    fn test_axis_samples_do_not_affect_detection() {
        let mut samples = vec![1.0; 16];
        samples[0] = 0.2;
        samples[8] = 1.7;
        let result = detect(&samples);
        assert!(result.x_axis);
        // Index 0 and 8 are not compared by the Y check either.
        assert!(result.y_axis);
    }

    #[test]
    fn test_tolerance() {
        assert!(is_close(1.0, 1.0 + 1e-12));
        assert!(is_close(0.0, 0.0));
        assert!(is_close(0.0, 1e-13));
        assert!(!is_close(1.0, 1.0001));
        assert!(!is_close(0.0, 1e-6));
    }

    #[test]
    fn test_global_detection() {
        let left = vec![1.0, 0.5, 0.25];
        let mut right = left.clone();
        assert!(detect_global(&left, &right));

        right[1] = 0.51;
        assert!(!detect_global(&left, &right));

        assert!(!detect_global(&left, &left[..2]));
        assert!(detect_global(&[], &[]));
    }
}
