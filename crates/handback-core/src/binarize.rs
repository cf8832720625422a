//! Binary damage mask extraction (discrete output mode).
//!
//! Alternate reduction of the cue fields into a {0,1} mask suitable for
//! overlay rendering: adaptive thresholding followed by morphological
//! opening and closing to drop isolated speckle and close small gaps.

use crate::cues::CueFields;
use crate::field::ScalarField;
use crate::fusion::weighted_sum;
use crate::mask::{apply_mask, RegionMask};
use crate::models::FusionWeights;

/// Structuring element side (3x3 square)
const MORPH_KERNEL: i64 = 3;

/// Opening/closing iteration count
const MORPH_ITERATIONS: usize = 2;

/// Reduce the cue fields to a cleaned-up binary damage mask.
///
/// The cues combine with the discrete-mode weights, normalize, and
/// threshold at `threshold_fraction x max(field)` — a per-image adaptive
/// threshold, so the mask is invariant to absolute lighting and exposure
/// differences between the pair. Morphological open then close (3x3
/// square element, 2 iterations each) cleans the mask, and the optional
/// region mask gates the result. Output values are exactly {0, 1}.
pub fn binarize_cues(
    cues: &CueFields,
    weights: FusionWeights,
    threshold_fraction: f32,
    mask: Option<&RegionMask>,
) -> ScalarField {
    let combined = weighted_sum(cues, weights).normalized();

    let (_, max) = combined.min_max();
    let threshold = threshold_fraction * max;

    let mut binary = combined;
    for value in binary.data.iter_mut() {
        *value = if max > 0.0 && *value > threshold {
            1.0
        } else {
            0.0
        };
    }

    // opening removes isolated speckle, closing fills small gaps
    binary = opened(binary, MORPH_ITERATIONS);
    binary = closed(binary, MORPH_ITERATIONS);

    let mut gated = apply_mask(binary, mask);
    // a fractional region mask must not produce non-binary output
    for value in gated.data.iter_mut() {
        *value = if *value >= 0.5 { 1.0 } else { 0.0 };
    }
    gated
}

/// Morphological opening: erode then dilate, `iterations` passes each
fn opened(mut field: ScalarField, iterations: usize) -> ScalarField {
    for _ in 0..iterations {
        field = erode(&field);
    }
    for _ in 0..iterations {
        field = dilate(&field);
    }
    field
}

/// Morphological closing: dilate then erode, `iterations` passes each
fn closed(mut field: ScalarField, iterations: usize) -> ScalarField {
    for _ in 0..iterations {
        field = dilate(&field);
    }
    for _ in 0..iterations {
        field = erode(&field);
    }
    field
}

/// Morphological erosion with a 3x3 square element, window clamped at borders
fn erode(field: &ScalarField) -> ScalarField {
    morph(field, |acc, v| acc.min(v))
}

/// Morphological dilation with a 3x3 square element, window clamped at borders
fn dilate(field: &ScalarField) -> ScalarField {
    morph(field, |acc, v| acc.max(v))
}

fn morph(field: &ScalarField, combine: impl Fn(f32, f32) -> f32) -> ScalarField {
    let w = field.width as i64;
    let h = field.height as i64;
    let half = MORPH_KERNEL / 2;
    let mut out = ScalarField::zeros(field.width, field.height);

    for y in 0..h {
        for x in 0..w {
            let mut acc = field.data[(y * w + x) as usize];
            for ky in -half..=half {
                let sy = (y + ky).clamp(0, h - 1);
                for kx in -half..=half {
                    let sx = (x + kx).clamp(0, w - 1);
                    acc = combine(acc, field.data[(sy * w + sx) as usize]);
                }
            }
            out.data[(y * w + x) as usize] = acc;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue_set_from(field: ScalarField) -> CueFields {
        CueFields {
            structural: field.clone(),
            color: field.clone(),
            edge: field,
        }
    }

    fn field_with_block(width: u32, height: u32, x0: u32, y0: u32, side: u32) -> ScalarField {
        let mut field = ScalarField::zeros(width, height);
        for y in y0..(y0 + side).min(height) {
            for x in x0..(x0 + side).min(width) {
                field.data[(y * width + x) as usize] = 1.0;
            }
        }
        field
    }

    #[test]
    fn test_output_is_binary() {
        let field = field_with_block(32, 32, 8, 8, 10);
        let mask = binarize_cues(&cue_set_from(field), [0.4, 0.4, 0.2], 0.5, None);
        assert!(mask.data.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_zero_cues_stay_zero() {
        let mask = binarize_cues(
            &cue_set_from(ScalarField::zeros(16, 16)),
            [0.4, 0.4, 0.2],
            0.5,
            None,
        );
        assert!(mask.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_large_block_survives() {
        let field = field_with_block(32, 32, 8, 8, 12);
        let mask = binarize_cues(&cue_set_from(field), [0.4, 0.4, 0.2], 0.5, None);

        let center = mask.data[(14 * 32 + 14) as usize];
        assert_eq!(center, 1.0);
    }

    #[test]
    fn test_isolated_speckle_removed_by_opening() {
        let mut field = field_with_block(32, 32, 4, 4, 12);
        // lone pixel far from the block
        field.data[(28 * 32 + 28) as usize] = 1.0;

        let mask = binarize_cues(&cue_set_from(field), [0.4, 0.4, 0.2], 0.5, None);
        assert_eq!(mask.data[(28 * 32 + 28) as usize], 0.0, "speckle kept");
        assert_eq!(mask.data[(10 * 32 + 10) as usize], 1.0, "block lost");
    }

    #[test]
    fn test_region_mask_gates_result() {
        let field = field_with_block(16, 16, 2, 2, 12);
        let mask = RegionMask::from_luma8(16, 16, &[0u8; 256]).unwrap();
        let out = binarize_cues(&cue_set_from(field), [0.4, 0.4, 0.2], 0.5, Some(&mask));
        assert!(out.data.iter().all(|&v| v == 0.0));
    }
}
