//! Edge/texture difference cue (Sobel gradient magnitude).

use crate::color::rgb_to_luma;
use crate::decoders::DecodedImage;
use crate::field::ScalarField;
use crate::mask::{apply_mask, RegionMask};

use super::check_pair_shape;

/// Compute the edge/texture difference map.
///
/// A Sobel gradient-magnitude map is computed for each image independently
/// on its luma channel; the cue is the absolute per-pixel difference of the
/// two magnitude maps. Sensitive to cracks, tears, and texture disruption
/// that color and structure alone can miss. Min-max normalized and masked.
pub fn edge_difference(
    reference: &DecodedImage,
    test: &DecodedImage,
    mask: Option<&RegionMask>,
) -> Result<ScalarField, String> {
    let (width, height) = check_pair_shape(reference, test)?;

    let ref_edges = sobel_magnitude(&rgb_to_luma(&reference.data), width, height);
    let test_edges = sobel_magnitude(&rgb_to_luma(&test.data), width, height);

    let diff: Vec<f32> = ref_edges
        .iter()
        .zip(test_edges.iter())
        .map(|(a, b)| (a - b).abs())
        .collect();

    let field = ScalarField::from_vec(width, height, diff)?.normalized();
    Ok(apply_mask(field, mask))
}

/// Sobel gradient magnitude over a luma buffer, borders clamped
pub(crate) fn sobel_magnitude(luma: &[f32], width: u32, height: u32) -> Vec<f32> {
    const GX: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    const GY: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

    let w = width as i64;
    let h = height as i64;
    let mut out = Vec::with_capacity(luma.len());

    for y in 0..h {
        for x in 0..w {
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;
            for ky in 0..3i64 {
                let sy = (y + ky - 1).clamp(0, h - 1);
                for kx in 0..3i64 {
                    let sx = (x + kx - 1).clamp(0, w - 1);
                    let v = luma[(sy * w + sx) as usize];
                    gx += GX[ky as usize][kx as usize] * v;
                    gy += GY[ky as usize][kx as usize] * v;
                }
            }
            out.push((gx * gx + gy * gy).sqrt());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: f32) -> DecodedImage {
        DecodedImage {
            width,
            height,
            data: vec![value; (width * height * 3) as usize],
            channels: 3,
        }
    }

    /// Left half dark, right half bright: one strong vertical edge
    fn half_split(width: u32, height: u32) -> DecodedImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0.1 } else { 0.9 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage {
            width,
            height,
            data,
            channels: 3,
        }
    }

    #[test]
    fn test_flat_images_have_no_edges() {
        let flat = solid(16, 16, 0.5);
        let edges = sobel_magnitude(&rgb_to_luma(&flat.data), 16, 16);
        assert!(edges.iter().all(|&v| v.abs() < 1e-5));
    }

    #[test]
    fn test_identical_images_yield_zero_field() {
        let img = half_split(16, 16);
        let field = edge_difference(&img, &img, None).unwrap();
        assert!(field.data.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_new_edge_registers() {
        let flat = solid(16, 16, 0.5);
        let split = half_split(16, 16);
        let field = edge_difference(&flat, &split, None).unwrap();

        // the seam column carries the difference after normalization
        let seam = field.data[(8 * 16 + 8) as usize];
        let far = field.data[(8 * 16 + 2) as usize];
        assert!((field.min_max().1 - 1.0).abs() < 1e-6);
        assert!(seam > far, "seam {} far {}", seam, far);
    }

    #[test]
    fn test_gradient_orientation_symmetry() {
        // a horizontal split must register like a vertical one
        let vertical = half_split(16, 16);
        let mut data = Vec::new();
        for y in 0..16u32 {
            for _ in 0..16u32 {
                let v = if y < 8 { 0.1 } else { 0.9 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let horizontal = DecodedImage {
            width: 16,
            height: 16,
            data,
            channels: 3,
        };

        let ve = sobel_magnitude(&rgb_to_luma(&vertical.data), 16, 16);
        let he = sobel_magnitude(&rgb_to_luma(&horizontal.data), 16, 16);

        let vmax = ve.iter().cloned().fold(0.0f32, f32::max);
        let hmax = he.iter().cloned().fold(0.0f32, f32::max);
        assert!((vmax - hmax).abs() < 1e-5);
    }
}
