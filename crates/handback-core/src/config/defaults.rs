//! On-disk default values for the verification engine.

use serde::Deserialize;

use crate::models::{
    default_binarize_threshold_fraction, default_contrast_clip_limit, default_severity_threshold,
    default_true, VerifyOptions,
};

/// Deployment-tunable defaults applied to options the caller leaves unset.
///
/// The severity threshold lives here deliberately: the built-in 0.5 is an
/// aggressive claims-workflow calibration, and raising it is a deployment
/// decision rather than a code change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineDefaults {
    /// Severity above which a pair is flagged as damaged (~0-100 scale)
    pub severity_threshold: f32,

    /// CLAHE clip limit for contrast enhancement
    pub contrast_clip_limit: f32,

    /// Fraction of the field maximum used as the binarization threshold
    pub binarize_threshold_fraction: f32,

    /// Apply the denoise pass during normalization
    pub denoise: bool,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            severity_threshold: default_severity_threshold(),
            contrast_clip_limit: default_contrast_clip_limit(),
            binarize_threshold_fraction: default_binarize_threshold_fraction(),
            denoise: default_true(),
        }
    }
}

impl EngineDefaults {
    /// Clamp out-of-range values from a hand-edited config file
    pub fn sanitize(&mut self) {
        self.severity_threshold = self.severity_threshold.max(0.0);
        self.contrast_clip_limit = self.contrast_clip_limit.clamp(0.001, 1.0);
        self.binarize_threshold_fraction = self.binarize_threshold_fraction.clamp(0.0, 1.0);
    }

    /// Overlay these defaults onto a preset's options
    pub fn apply_to(&self, options: &mut VerifyOptions) {
        options.severity_threshold = self.severity_threshold;
        options.contrast_clip_limit = self.contrast_clip_limit;
        options.binarize_threshold_fraction = self.binarize_threshold_fraction;
        options.denoise = self.denoise;
    }
}
