//! Structural dissimilarity cue (inverted local-window SSIM).

use crate::color::rgb_to_luma;
use crate::decoders::DecodedImage;
use crate::field::ScalarField;
use crate::mask::{apply_mask, RegionMask};

use super::check_pair_shape;

/// Side length of the local comparison window
const SSIM_WINDOW: i64 = 7;

/// SSIM stabilization constants for unit dynamic range
const SSIM_C1: f64 = 0.01 * 0.01;
const SSIM_C2: f64 = 0.03 * 0.03;

/// Compute the structural dissimilarity map between two images.
///
/// Both images convert to luma, a sliding-window SSIM map captures local
/// luminance, contrast, and structure correlation, and the result inverts
/// to `1 - ssim` so higher values mean more visual difference. The map is
/// min-max normalized and masked.
pub fn structural_dissimilarity(
    reference: &DecodedImage,
    test: &DecodedImage,
    mask: Option<&RegionMask>,
) -> Result<ScalarField, String> {
    let (width, height) = check_pair_shape(reference, test)?;

    let ref_luma = rgb_to_luma(&reference.data);
    let test_luma = rgb_to_luma(&test.data);

    let ssim = ssim_map(&ref_luma, &test_luma, width, height);
    let dissim: Vec<f32> = ssim.iter().map(|&s| (1.0 - s) as f32).collect();

    let field = ScalarField::from_vec(width, height, dissim)?.normalized();
    Ok(apply_mask(field, mask))
}

/// Per-pixel SSIM over a clamped sliding window.
///
/// Window sums come from integral images so the cost is independent of the
/// window size. Windows are clipped at the borders rather than padded.
fn ssim_map(x: &[f32], y: &[f32], width: u32, height: u32) -> Vec<f64> {
    let ix = integral(x, width, height, |v| v);
    let iy = integral(y, width, height, |v| v);
    let ixx = integral(x, width, height, |v| v * v);
    let iyy = integral(y, width, height, |v| v * v);
    let ixy = integral2(x, y, width, height);

    let w = width as i64;
    let h = height as i64;
    let half = SSIM_WINDOW / 2;
    let mut out = Vec::with_capacity((width * height) as usize);

    for py in 0..h {
        let y0 = (py - half).max(0);
        let y1 = (py + half).min(h - 1);
        for px in 0..w {
            let x0 = (px - half).max(0);
            let x1 = (px + half).min(w - 1);
            let n = ((y1 - y0 + 1) * (x1 - x0 + 1)) as f64;

            let sx = window_sum(&ix, width, x0, y0, x1, y1);
            let sy = window_sum(&iy, width, x0, y0, x1, y1);
            let sxx = window_sum(&ixx, width, x0, y0, x1, y1);
            let syy = window_sum(&iyy, width, x0, y0, x1, y1);
            let sxy = window_sum(&ixy, width, x0, y0, x1, y1);

            let mu_x = sx / n;
            let mu_y = sy / n;
            let var_x = (sxx / n - mu_x * mu_x).max(0.0);
            let var_y = (syy / n - mu_y * mu_y).max(0.0);
            let cov = sxy / n - mu_x * mu_y;

            let numerator = (2.0 * mu_x * mu_y + SSIM_C1) * (2.0 * cov + SSIM_C2);
            let denominator = (mu_x * mu_x + mu_y * mu_y + SSIM_C1) * (var_x + var_y + SSIM_C2);
            out.push(numerator / denominator);
        }
    }

    out
}

/// Build an (w+1)x(h+1) integral image of `f(value)`
fn integral(data: &[f32], width: u32, height: u32, f: impl Fn(f64) -> f64) -> Vec<f64> {
    let w = width as usize;
    let h = height as usize;
    let mut out = vec![0.0f64; (w + 1) * (h + 1)];

    for y in 0..h {
        let mut row_sum = 0.0;
        for x in 0..w {
            row_sum += f(data[y * w + x] as f64);
            out[(y + 1) * (w + 1) + x + 1] = out[y * (w + 1) + x + 1] + row_sum;
        }
    }

    out
}

/// Integral image of the element-wise product of two buffers
fn integral2(a: &[f32], b: &[f32], width: u32, height: u32) -> Vec<f64> {
    let w = width as usize;
    let h = height as usize;
    let mut out = vec![0.0f64; (w + 1) * (h + 1)];

    for y in 0..h {
        let mut row_sum = 0.0;
        for x in 0..w {
            row_sum += a[y * w + x] as f64 * b[y * w + x] as f64;
            out[(y + 1) * (w + 1) + x + 1] = out[y * (w + 1) + x + 1] + row_sum;
        }
    }

    out
}

/// Sum over the inclusive window [x0, x1] x [y0, y1]
#[inline]
fn window_sum(integral: &[f64], width: u32, x0: i64, y0: i64, x1: i64, y1: i64) -> f64 {
    let stride = width as i64 + 1;
    let a = integral[((y1 + 1) * stride + x1 + 1) as usize];
    let b = integral[(y0 * stride + x1 + 1) as usize];
    let c = integral[((y1 + 1) * stride + x0) as usize];
    let d = integral[(y0 * stride + x0) as usize];
    a - b - c + d
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

    #[test]
    fn test_identical_images_yield_zero_field() {
        let img = solid(16, 16, 0.5);
        let field = structural_dissimilarity(&img, &img, None).unwrap();
        assert!(field.data.iter().all(|&v| v.abs() < 1e-5));
    }

    #[test]
    fn test_black_vs_white_saturates() {
        let black = solid(16, 16, 0.0);
        let white = solid(16, 16, 1.0);
        let field = structural_dissimilarity(&black, &white, None).unwrap();

        // Uniform maximal dissimilarity survives the degenerate-range rule
        assert!(field.data.iter().all(|&v| v > 0.99), "min: {:?}", field.min_max());
    }

    #[test]
    fn test_altered_patch_dominates_field() {
        let reference = solid(32, 32, 0.5);
        let mut test = reference.clone();
        for y in 8..16u32 {
            for x in 8..16u32 {
                let idx = ((y * 32 + x) * 3) as usize;
                test.data[idx] = 0.0;
                test.data[idx + 1] = 0.0;
                test.data[idx + 2] = 0.0;
            }
        }

        let field = structural_dissimilarity(&reference, &test, None).unwrap();
        let inside = field.data[(12 * 32 + 12) as usize];
        let outside = field.data[(28 * 32 + 28) as usize];
        assert!(inside > outside, "inside {} outside {}", inside, outside);
        assert!((field.min_max().1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let a = solid(16, 16, 0.5);
        let b = solid(8, 8, 0.5);
        assert!(structural_dissimilarity(&a, &b, None).is_err());
    }
}
