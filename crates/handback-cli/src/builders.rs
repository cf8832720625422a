//! Assembly of verification options from presets, config, and CLI flags.

use handback_core::config;
use handback_core::presets;
use handback_core::{FusionWeights, OutputMode, VerifyOptions};

use crate::parsers::{parse_size, parse_weights};

/// Flag-level overrides collected from the command line.
///
/// `None` means "not given on the command line": the value then comes from
/// the preset, overlaid with the deployment config defaults.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub mode: Option<OutputMode>,
    pub size: Option<String>,
    pub weights: Option<String>,
    pub contrast_clip_limit: Option<f32>,
    pub binarize_threshold_fraction: Option<f32>,
    pub severity_threshold: Option<f32>,
    pub no_denoise: bool,
    pub debug: bool,
}

/// Build the effective options for a verification run.
///
/// Precedence, lowest to highest: preset (built-in or file), deployment
/// config defaults, explicit CLI flags. The result is sanitized.
pub fn build_verify_options(
    preset: Option<&str>,
    overrides: &OptionOverrides,
) -> Result<VerifyOptions, String> {
    let mut options = match preset {
        Some(name) => presets::resolve_preset(name)?,
        None => VerifyOptions::continuous(),
    };

    config::engine_config_handle()
        .config
        .defaults
        .apply_to(&mut options);

    if let Some(mode) = overrides.mode {
        options.output_mode = mode;
        // switching to discrete without a preset pulls in its observed
        // parameter set as the baseline
        if preset.is_none() && mode == OutputMode::Discrete {
            let discrete = VerifyOptions::discrete();
            options.target_size = discrete.target_size;
            options.fusion_weights = discrete.fusion_weights;
        }
    }

    if let Some(size_str) = &overrides.size {
        options.target_size = parse_size(size_str)?;
    }

    if let Some(weights_str) = &overrides.weights {
        let weights: FusionWeights = parse_weights(weights_str)?;
        options.fusion_weights = weights;
    }

    if let Some(clip) = overrides.contrast_clip_limit {
        options.contrast_clip_limit = clip;
    }

    if let Some(fraction) = overrides.binarize_threshold_fraction {
        options.binarize_threshold_fraction = fraction;
    }

    if let Some(threshold) = overrides.severity_threshold {
        options.severity_threshold = threshold;
    }

    if overrides.no_denoise {
        options.denoise = false;
    }
    options.debug = overrides.debug;

    options.sanitize();
    Ok(options)
}
