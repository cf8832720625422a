//! Weighted fusion of the cue fields into one damage-intensity field.

use crate::clahe::equalize_adapthist;
use crate::cues::CueFields;
use crate::field::ScalarField;
use crate::mask::{apply_mask, RegionMask};
use crate::models::FusionWeights;

/// Fuse the three cue fields into a continuous damage-intensity field.
///
/// Weighted linear combination, min-max renormalization, local contrast
/// enhancement (CLAHE with the configured clip limit), a second
/// renormalization, and a final mask gate. Contrast enhancement can shift
/// the effective range, so the second renormalization re-anchors the
/// extremes at 0 and 1 before severity scoring regardless of the weight
/// choice.
///
/// The cue fields must share a shape; a mismatch means the normalizer
/// upstream is broken and is treated as a fatal assertion.
pub fn fuse_cues(
    cues: &CueFields,
    weights: FusionWeights,
    contrast_clip_limit: f32,
    mask: Option<&RegionMask>,
) -> ScalarField {
    assert!(
        cues.structural.same_shape(&cues.color) && cues.structural.same_shape(&cues.edge),
        "Cue field shape mismatch: {}x{} / {}x{} / {}x{}",
        cues.structural.width,
        cues.structural.height,
        cues.color.width,
        cues.color.height,
        cues.edge.width,
        cues.edge.height,
    );

    let fused = weighted_sum(cues, weights).normalized();
    let enhanced = equalize_adapthist(&fused, contrast_clip_limit).normalized();
    apply_mask(enhanced, mask)
}

/// Weighted linear combination of the three cue fields
pub(crate) fn weighted_sum(cues: &CueFields, weights: FusionWeights) -> ScalarField {
    let [w_structural, w_color, w_edge] = weights;

    let data = cues
        .structural
        .data
        .iter()
        .zip(cues.color.data.iter())
        .zip(cues.edge.data.iter())
        .map(|((&s, &c), &e)| w_structural * s + w_color * c + w_edge * e)
        .collect();

    ScalarField {
        width: cues.structural.width,
        height: cues.structural.height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::RegionMask;

    fn cue_set(width: u32, height: u32, s: f32, c: f32, e: f32) -> CueFields {
        let n = (width * height) as usize;
        CueFields {
            structural: ScalarField::from_vec(width, height, vec![s; n]).unwrap(),
            color: ScalarField::from_vec(width, height, vec![c; n]).unwrap(),
            edge: ScalarField::from_vec(width, height, vec![e; n]).unwrap(),
        }
    }

    #[test]
    fn test_zero_cues_fuse_to_zero() {
        let cues = cue_set(16, 16, 0.0, 0.0, 0.0);
        let fused = fuse_cues(&cues, [0.45, 0.35, 0.20], 0.02, None);
        assert!(fused.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_saturated_cues_fuse_high() {
        let cues = cue_set(16, 16, 1.0, 1.0, 0.0);
        let fused = fuse_cues(&cues, [0.45, 0.35, 0.20], 0.02, None);

        // uniform 0.8 survives both degenerate renormalizations
        assert!(fused.data.iter().all(|&v| (v - 0.8).abs() < 1e-5));
    }

    #[test]
    fn test_weighted_sum_applies_weights() {
        let cues = cue_set(4, 4, 1.0, 0.5, 0.25);
        let sum = weighted_sum(&cues, [0.4, 0.4, 0.2]);
        let expected = 0.4 * 1.0 + 0.4 * 0.5 + 0.2 * 0.25;
        assert!(sum.data.iter().all(|&v| (v - expected).abs() < 1e-6));
    }

    #[test]
    fn test_fused_extremes_anchored() {
        // one hot pixel over a quiet background
        let mut cues = cue_set(32, 32, 0.0, 0.0, 0.0);
        cues.structural.data[5] = 1.0;
        cues.color.data[5] = 1.0;
        cues.edge.data[5] = 1.0;

        let fused = fuse_cues(&cues, [0.45, 0.35, 0.20], 0.02, None);
        let (min, max) = fused.min_max();
        assert!((min - 0.0).abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_final_mask_gate() {
        let cues = cue_set(8, 8, 1.0, 1.0, 1.0);
        let mask = RegionMask::from_luma8(8, 8, &[0u8; 64]).unwrap();
        let fused = fuse_cues(&cues, [0.45, 0.35, 0.20], 0.02, Some(&mask));
        assert!(fused.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic(expected = "Cue field shape mismatch")]
    fn test_shape_mismatch_panics() {
        let cues = CueFields {
            structural: ScalarField::zeros(8, 8),
            color: ScalarField::zeros(4, 4),
            edge: ScalarField::zeros(8, 8),
        };
        fuse_cues(&cues, [0.45, 0.35, 0.20], 0.02, None);
    }
}
