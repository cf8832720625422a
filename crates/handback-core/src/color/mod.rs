//! Color space conversions used by the cue extractors.

mod lab;

#[cfg(test)]
mod tests;

pub use lab::{delta_e, rgb_to_lab, Lab};

/// Convert interleaved RGB data to a single luma channel (Rec.709 weights)
pub fn rgb_to_luma(data: &[f32]) -> Vec<f32> {
    data.chunks_exact(3)
        .map(|rgb| 0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2])
        .collect()
}

/// Decode an sRGB-encoded component to linear light
#[inline]
pub(crate) fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
