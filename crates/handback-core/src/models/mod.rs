//! Data model for verification options.

mod defaults;
mod verify_options;

pub use verify_options::{FusionWeights, OutputMode, VerifyOptions};

// Re-export default functions for use in serde attributes elsewhere
pub(crate) use defaults::{
    default_binarize_threshold_fraction, default_contrast_clip_limit, default_severity_threshold,
    default_true,
};
