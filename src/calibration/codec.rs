//! Text encoding of calibration values
//!
//! The settings file stores every value multiplied by [`CONFIG_SCALE`] as a
//! space-separated string with two decimals.

use glam::DVec2;

use super::model::CalibrationSet;
use super::CalibrationError;

/// Multiplier applied to values in the settings file
pub const CONFIG_SCALE: f64 = 100.0;

/// Center string used when a file has no center key
pub const DEFAULT_CENTER: &str = "0.0 0.0";

/// Parse whitespace-separated decimal numbers.
pub fn parse_values(text: &str) -> Result<Vec<f64>, CalibrationError> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| CalibrationError::Format(format!("'{}' is not a number", token)))
        })
        .collect()
}

/// Parse a center string that must contain exactly two numbers.
pub fn parse_center(text: &str) -> Result<DVec2, CalibrationError> {
    let values = parse_values(text)?;
    match values.as_slice() {
        [x, y] => Ok(DVec2::new(*x, *y)),
        _ => Err(CalibrationError::Format(format!(
            "center must have 2 values, found {}",
            values.len()
        ))),
    }
}

/// Build a calibration set from its serialized settings strings.
///
/// A missing center falls back to [`DEFAULT_CENTER`]. A missing or blank
/// calibration string yields `default_sample_count` samples of 1.0.
pub fn load(
    center: Option<&str>,
    samples: Option<&str>,
    default_sample_count: usize,
) -> Result<CalibrationSet, CalibrationError> {
    let center = parse_center(center.unwrap_or(DEFAULT_CENTER))? / CONFIG_SCALE;

    let samples = match samples.map(str::trim) {
        Some(text) if !text.is_empty() => parse_values(text)?
            .into_iter()
            .map(|v| v / CONFIG_SCALE)
            .collect(),
        _ => vec![1.0; default_sample_count],
    };

    Ok(CalibrationSet { center, samples })
}

fn format_value(value: f64) -> String {
    format!("{:.2}", value * CONFIG_SCALE)
}

/// Serialize a set into its `(center, calibration)` settings strings.
pub fn serialize(set: &CalibrationSet) -> (String, String) {
    let center = format!("{} {}", format_value(set.center.x), format_value(set.center.y));
    let samples = set
        .samples
        .iter()
        .map(|v| format_value(*v))
        .collect::<Vec<_>>()
        .join(" ");
    (center, samples)
}

/// Human-editable raw text (actual units, no scaling) for a set.
pub fn to_raw_text(set: &CalibrationSet) -> (String, String) {
    let center = format!("{} {}", set.center.x, set.center.y);
    let samples = set
        .samples
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    (center, samples)
}
