//! Per-pixel dissimilarity cues between the two photographs.
//!
//! Three independent comparators, each a pure function of the normalized
//! image pair and an optional region mask:
//! - `structural`: local-window structural dissimilarity (1 - SSIM)
//! - `color`: perceptual color difference (ΔE in LAB space)
//! - `edge`: Sobel gradient-magnitude difference
//!
//! Every cue returns a min-max normalized [`ScalarField`] with the mask
//! already applied.

mod color;
mod edge;
mod structural;

pub use color::color_difference;
pub use edge::edge_difference;
pub use structural::structural_dissimilarity;

use crate::decoders::DecodedImage;
use crate::field::ScalarField;
use crate::mask::RegionMask;

/// The three cue fields extracted from one image pair
#[derive(Debug, Clone)]
pub struct CueFields {
    pub structural: ScalarField,
    pub color: ScalarField,
    pub edge: ScalarField,
}

/// Run all three cue extractors on a normalized image pair
pub fn extract_cues(
    reference: &DecodedImage,
    test: &DecodedImage,
    mask: Option<&RegionMask>,
) -> Result<CueFields, String> {
    Ok(CueFields {
        structural: structural_dissimilarity(reference, test, mask)?,
        color: color_difference(reference, test, mask)?,
        edge: edge_difference(reference, test, mask)?,
    })
}

/// Verify the two images share a shape, as the normalizer guarantees
pub(crate) fn check_pair_shape(
    reference: &DecodedImage,
    test: &DecodedImage,
) -> Result<(u32, u32), String> {
    if reference.width != test.width || reference.height != test.height {
        return Err(format!(
            "Image size mismatch: {}x{} vs {}x{}",
            reference.width, reference.height, test.width, test.height
        ));
    }
    Ok((reference.width, reference.height))
}
