//! Perceptual color difference cue (ΔE in LAB space).

use rayon::prelude::*;

use crate::color::{delta_e, rgb_to_lab};
use crate::decoders::DecodedImage;
use crate::field::ScalarField;
use crate::mask::{apply_mask, RegionMask};

use super::check_pair_shape;

/// Pixel count above which the ΔE loop runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 100_000;

/// Compute the per-pixel perceptual color difference map.
///
/// Both images convert to CIE LAB and the Euclidean distance between the
/// two color vectors becomes the raw dissimilarity. Sensitive to surface
/// discoloration, staining, and paint loss that structural similarity
/// under-weights. Min-max normalized and masked.
pub fn color_difference(
    reference: &DecodedImage,
    test: &DecodedImage,
    mask: Option<&RegionMask>,
) -> Result<ScalarField, String> {
    let (width, height) = check_pair_shape(reference, test)?;

    let pixel_de = |(ref_px, test_px): (&[f32], &[f32])| {
        let a = rgb_to_lab(ref_px[0], ref_px[1], ref_px[2]);
        let b = rgb_to_lab(test_px[0], test_px[1], test_px[2]);
        delta_e(a, b)
    };

    let num_pixels = (width * height) as usize;
    let de: Vec<f32> = if num_pixels >= PARALLEL_THRESHOLD {
        reference
            .data
            .par_chunks_exact(3)
            .zip(test.data.par_chunks_exact(3))
            .map(pixel_de)
            .collect()
    } else {
        reference
            .data
            .chunks_exact(3)
            .zip(test.data.chunks_exact(3))
            .map(pixel_de)
            .collect()
    };

    let field = ScalarField::from_vec(width, height, de)?.normalized();
    Ok(apply_mask(field, mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [f32; 3]) -> DecodedImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        DecodedImage {
            width,
            height,
            data,
            channels: 3,
        }
    }

    #[test]
    fn test_identical_images_yield_zero_field() {
        let img = solid(8, 8, [0.3, 0.7, 0.2]);
        let field = color_difference(&img, &img, None).unwrap();
        assert!(field.data.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_black_vs_white_saturates() {
        let black = solid(8, 8, [0.0, 0.0, 0.0]);
        let white = solid(8, 8, [1.0, 1.0, 1.0]);
        let field = color_difference(&black, &white, None).unwrap();

        // ΔE is ~100 everywhere; the degenerate-range rule clamps to 1.0
        assert!(field.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_recolored_patch_dominates_field() {
        let reference = solid(16, 16, [0.8, 0.8, 0.8]);
        let mut test = reference.clone();
        for y in 4..8u32 {
            for x in 4..8u32 {
                let idx = ((y * 16 + x) * 3) as usize;
                test.data[idx] = 0.9;
                test.data[idx + 1] = 0.1;
                test.data[idx + 2] = 0.1;
            }
        }

        let field = color_difference(&reference, &test, None).unwrap();
        let inside = field.data[(5 * 16 + 5) as usize];
        let outside = field.data[(12 * 16 + 12) as usize];
        assert!((inside - 1.0).abs() < 1e-6);
        assert!(outside.abs() < 1e-6);
    }

    #[test]
    fn test_mask_suppresses_difference() {
        let reference = solid(8, 8, [0.2, 0.2, 0.2]);
        let test = solid(8, 8, [0.9, 0.9, 0.9]);

        let mask = crate::mask::RegionMask::from_luma8(8, 8, &[0u8; 64]).unwrap();
        let field = color_difference(&reference, &test, Some(&mask)).unwrap();
        assert!(field.data.iter().all(|&v| v == 0.0));
    }
}
