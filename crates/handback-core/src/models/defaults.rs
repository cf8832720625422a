//! Default values for verification options, shared with serde attributes.

use super::FusionWeights;

/// Canonical working size of the continuous (heatmap) pipeline
pub(crate) fn default_continuous_target_size() -> (u32, u32) {
    (512, 512)
}

/// Canonical working size of the discrete (overlay) pipeline
pub(crate) fn default_discrete_target_size() -> (u32, u32) {
    (256, 256)
}

/// Fusion weights of the continuous pipeline (structural / color / edge)
pub(crate) fn default_continuous_weights() -> FusionWeights {
    [0.45, 0.35, 0.20]
}

/// Fusion weights of the discrete pipeline (structural / color / edge)
pub(crate) fn default_discrete_weights() -> FusionWeights {
    [0.40, 0.40, 0.20]
}

/// CLAHE clip limit for contrast enhancement
pub(crate) fn default_contrast_clip_limit() -> f32 {
    0.02
}

/// Fraction of the field maximum used as the adaptive binarization threshold
pub(crate) fn default_binarize_threshold_fraction() -> f32 {
    0.5
}

/// Severity threshold for the damage verdict, on the ~0-100 severity scale.
///
/// 0.5 is the observed production value: an extremely low bar that flags
/// nearly any nonzero mean difference, favoring false positives over false
/// negatives in a damage-claims workflow. Deployments that want fewer
/// claims should raise it via options or config.
pub(crate) fn default_severity_threshold() -> f32 {
    0.5
}

pub(crate) fn default_true() -> bool {
    true
}
