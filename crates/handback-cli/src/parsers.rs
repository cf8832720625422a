//! Parsers for CLI argument strings.

use handback_core::{FusionWeights, OutputMode};

/// Parse a canonical size argument ("512x512" or "512,512")
pub fn parse_size(size_str: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = if size_str.contains('x') {
        size_str.split('x').collect()
    } else {
        size_str.split(',').collect()
    };

    if parts.len() != 2 {
        return Err(format!(
            "Invalid size format: '{}' (expected WxH, e.g. 512x512)",
            size_str
        ));
    }

    let width = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("Invalid width '{}': {}", parts[0], e))?;
    let height = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("Invalid height '{}': {}", parts[1], e))?;

    if width == 0 || height == 0 {
        return Err("Size components must be non-zero".to_string());
    }

    Ok((width, height))
}

/// Parse a fusion weight triple ("0.45,0.35,0.20" — structural/color/edge)
pub fn parse_weights(weights_str: &str) -> Result<FusionWeights, String> {
    let parts: Vec<&str> = weights_str.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid weights format: '{}' (expected W1,W2,W3)",
            weights_str
        ));
    }

    let mut weights = [0.0f32; 3];
    for (i, part) in parts.iter().enumerate() {
        weights[i] = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("Invalid weight '{}': {}", part, e))?;
        if weights[i] < 0.0 {
            return Err(format!("Weights must be non-negative, got {}", weights[i]));
        }
    }

    Ok(weights)
}

/// Parse an output mode name
pub fn parse_mode(mode_str: &str) -> Result<OutputMode, String> {
    match mode_str.to_lowercase().as_str() {
        "continuous" | "heatmap" => Ok(OutputMode::Continuous),
        "discrete" | "mask" => Ok(OutputMode::Discrete),
        other => Err(format!(
            "Unknown output mode: '{}' (expected continuous or discrete)",
            other
        )),
    }
}
