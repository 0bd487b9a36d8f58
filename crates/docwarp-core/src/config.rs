// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Tuning constants for the detection and rectification pipeline.
///
/// The defaults reproduce the empirically tuned values the scanner ships with.
/// A JSON file may override any subset of fields; missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Width (pixels) of the working copy used for detection.
    pub working_width: u32,
    /// Spatial scale of the edge-preserving filter.
    pub enhance_sigma_s: f32,
    /// Range similarity of the edge-preserving filter (intensities in 0..1).
    pub enhance_sigma_r: f32,
    /// Multiplier applied to the detail layer when recombining.
    pub detail_gain: f32,
    /// Gaussian sigma before edge detection (1.1 matches a 5x5 kernel).
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Radius of the square structuring element (2 gives 5x5).
    pub morph_radius: u8,
    /// Polygon simplification tolerance as a fraction of contour perimeter.
    pub approx_epsilon_ratio: f64,
    /// Encoding used for the rectified output.
    pub output_format: crate::OutputFormat,
    /// JPEG quality (1-100), ignored for PNG output.
    pub jpeg_quality: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            working_width: 500,
            enhance_sigma_s: 20.0,
            enhance_sigma_r: 0.15,
            detail_gain: 3.0,
            blur_sigma: 1.1,
            canny_low: 75.0,
            canny_high: 200.0,
            morph_radius: 2,
            approx_epsilon_ratio: 0.02,
            output_format: crate::OutputFormat::Jpeg,
            jpeg_quality: 90,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a pipeline stage panic or misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.working_width == 0 {
            return Err(invalid("working_width must be positive"));
        }
        if !positive(self.enhance_sigma_s.into()) || !positive(self.enhance_sigma_r.into()) {
            return Err(invalid("enhance sigmas must be positive"));
        }
        if !self.detail_gain.is_finite() {
            return Err(invalid("detail_gain must be finite"));
        }
        if !positive(self.blur_sigma.into()) {
            return Err(invalid("blur_sigma must be positive"));
        }
        if self.canny_low.is_nan() || self.canny_high.is_nan() || self.canny_low < 0.0 || self.canny_low > self.canny_high {
            return Err(invalid("canny thresholds must satisfy 0 <= low <= high"));
        }
        if !positive(self.approx_epsilon_ratio) || self.approx_epsilon_ratio >= 1.0 {
            return Err(invalid("approx_epsilon_ratio must be in (0, 1)"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(invalid("jpeg_quality must be in 1..=100"));
        }
        Ok(())
    }
}

/// Finite and strictly greater than zero.
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(reason: &str) -> ScanError {
    ScanError::InvalidConfig(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_canny_thresholds_rejected() {
        let config = ScanConfig {
            canny_low: 210.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn zero_working_width_rejected() {
        let config = ScanConfig {
            working_width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "working_width": 800, "output_format": "png" }}"#).expect("write");

        let config = ScanConfig::from_json_file(file.path()).expect("load config");
        assert_eq!(config.working_width, 800);
        assert_eq!(config.output_format, crate::OutputFormat::Png);
        assert_eq!(config.canny_high, 200.0);
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        assert!(matches!(
            ScanConfig::from_json_file(file.path()),
            Err(ScanError::Serialization(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(
            ScanConfig::from_json_file(dir.path().join("absent.json")),
            Err(ScanError::Io(_))
        ));
    }
}
