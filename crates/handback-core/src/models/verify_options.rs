//! Verification options for the damage pipeline.

use serde::{Deserialize, Serialize};

use super::defaults::{
    default_binarize_threshold_fraction, default_contrast_clip_limit,
    default_continuous_target_size, default_continuous_weights, default_discrete_target_size,
    default_discrete_weights, default_severity_threshold, default_true,
};

/// Fusion weights, one per cue: structural / color / edge
pub type FusionWeights = [f32; 3];

/// Output mode of the verification pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Continuous damage-intensity heatmap (CLAHE-enhanced fused field)
    #[default]
    Continuous,

    /// Binary damage mask (adaptive threshold + morphological cleanup)
    Discrete,
}

/// Configuration bundle for one verification call.
///
/// Pure configuration: the engine holds no state across calls, so options
/// pass explicitly into every invocation rather than living in a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Output mode selector
    #[serde(default)]
    pub output_mode: OutputMode,

    /// Canonical working size (width, height) both photos resize to
    #[serde(default = "default_continuous_target_size")]
    pub target_size: (u32, u32),

    /// Cue fusion weights: structural / color / edge
    #[serde(default = "default_continuous_weights")]
    pub fusion_weights: FusionWeights,

    /// CLAHE clip limit for contrast enhancement (continuous mode)
    #[serde(default = "default_contrast_clip_limit")]
    pub contrast_clip_limit: f32,

    /// Fraction of the field maximum used as the binarization threshold
    #[serde(default = "default_binarize_threshold_fraction")]
    pub binarize_threshold_fraction: f32,

    /// Severity above which the pair is flagged as damaged (~0-100 scale)
    #[serde(default = "default_severity_threshold")]
    pub severity_threshold: f32,

    /// Apply the 3x3 Gaussian denoise pass during normalization
    #[serde(default = "default_true")]
    pub denoise: bool,

    /// Enable debug output showing intermediate statistics
    #[serde(default)]
    pub debug: bool,
}

impl VerifyOptions {
    /// Continuous-heatmap preset: 512x512, weights 0.45/0.35/0.20
    pub fn continuous() -> Self {
        Self {
            output_mode: OutputMode::Continuous,
            target_size: default_continuous_target_size(),
            fusion_weights: default_continuous_weights(),
            contrast_clip_limit: default_contrast_clip_limit(),
            binarize_threshold_fraction: default_binarize_threshold_fraction(),
            severity_threshold: default_severity_threshold(),
            denoise: true,
            debug: false,
        }
    }

    /// Discrete-mask preset: 256x256, weights 0.40/0.40/0.20
    pub fn discrete() -> Self {
        Self {
            output_mode: OutputMode::Discrete,
            target_size: default_discrete_target_size(),
            fusion_weights: default_discrete_weights(),
            ..Self::continuous()
        }
    }

    /// Look up a built-in preset by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "continuous" => Some(Self::continuous()),
            "discrete" => Some(Self::discrete()),
            _ => None,
        }
    }

    /// Clamp out-of-range values into something the pipeline can run with
    pub fn sanitize(&mut self) {
        let (w, h) = self.target_size;
        self.target_size = (w.clamp(16, 4096), h.clamp(16, 4096));

        for weight in self.fusion_weights.iter_mut() {
            *weight = weight.max(0.0);
        }
        if self.fusion_weights.iter().sum::<f32>() == 0.0 {
            self.fusion_weights = default_continuous_weights();
        }

        self.contrast_clip_limit = self.contrast_clip_limit.clamp(0.001, 1.0);
        self.binarize_threshold_fraction = self.binarize_threshold_fraction.clamp(0.0, 1.0);
        self.severity_threshold = self.severity_threshold.max(0.0);
    }
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self::continuous()
    }
}
