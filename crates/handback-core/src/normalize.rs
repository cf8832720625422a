//! Canonical-size image normalization.
//!
//! Every verification call resizes both photographs to the same canonical
//! working size before any cue runs, which is what guarantees the cue
//! extractors always see identical shapes. An optional 3x3 Gaussian pass
//! suppresses sensor noise that would otherwise register as false damage.

use rayon::prelude::*;

use crate::decoders::DecodedImage;

/// Pixel count above which per-row loops run on the rayon pool
const PARALLEL_THRESHOLD: usize = 100_000;

/// Resize to the canonical working size and optionally denoise.
///
/// Area-average resampling when shrinking, bilinear when enlarging.
/// Component values stay in [0, 1]. Two inputs normalized with the same
/// target are guaranteed to come out with identical dimensions.
pub fn normalize_image(image: &DecodedImage, target: (u32, u32), denoise: bool) -> DecodedImage {
    let (tw, th) = target;

    let mut data = if image.width == tw && image.height == th {
        image.data.clone()
    } else {
        resize_rgb(&image.data, image.width, image.height, tw, th)
    };

    if denoise {
        data = gaussian3x3(&data, tw, th);
    }

    DecodedImage {
        width: tw,
        height: th,
        data,
        channels: 3,
    }
}

/// Resample interleaved RGB data to a new resolution.
///
/// Shrinking averages the source box under each output pixel; enlarging
/// samples bilinearly.
pub(crate) fn resize_rgb(data: &[f32], sw: u32, sh: u32, tw: u32, th: u32) -> Vec<f32> {
    let shrinking = tw <= sw && th <= sh;
    let row_len = (tw * 3) as usize;
    let mut out = vec![0.0f32; (tw * th * 3) as usize];

    let resample_row = |oy: usize, row: &mut [f32]| {
        if shrinking {
            area_row(data, sw, sh, tw, th, oy as u32, row);
        } else {
            bilinear_row(data, sw, sh, tw, th, oy as u32, row);
        }
    };

    if (tw * th) as usize >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(oy, row)| resample_row(oy, row));
    } else {
        for (oy, row) in out.chunks_mut(row_len).enumerate() {
            resample_row(oy, row);
        }
    }

    out
}

/// Fill one output row by averaging source boxes
fn area_row(data: &[f32], sw: u32, sh: u32, tw: u32, th: u32, oy: u32, row: &mut [f32]) {
    let y0 = (oy as u64 * sh as u64 / th as u64) as u32;
    let y1 = (((oy + 1) as u64 * sh as u64).div_ceil(th as u64) as u32).max(y0 + 1);

    for ox in 0..tw {
        let x0 = (ox as u64 * sw as u64 / tw as u64) as u32;
        let x1 = (((ox + 1) as u64 * sw as u64).div_ceil(tw as u64) as u32).max(x0 + 1);

        let mut sum = [0.0f32; 3];
        for sy in y0..y1.min(sh) {
            for sx in x0..x1.min(sw) {
                let idx = ((sy * sw + sx) * 3) as usize;
                sum[0] += data[idx];
                sum[1] += data[idx + 1];
                sum[2] += data[idx + 2];
            }
        }

        let count = ((y1.min(sh) - y0) * (x1.min(sw) - x0)).max(1) as f32;
        let out_idx = (ox * 3) as usize;
        row[out_idx] = sum[0] / count;
        row[out_idx + 1] = sum[1] / count;
        row[out_idx + 2] = sum[2] / count;
    }
}

/// Fill one output row by bilinear sampling
fn bilinear_row(data: &[f32], sw: u32, sh: u32, tw: u32, th: u32, oy: u32, row: &mut [f32]) {
    let sy = (oy as f32 + 0.5) * sh as f32 / th as f32 - 0.5;
    let y0 = sy.floor().clamp(0.0, (sh - 1) as f32) as u32;
    let y1 = (y0 + 1).min(sh - 1);
    let fy = (sy - y0 as f32).clamp(0.0, 1.0);

    for ox in 0..tw {
        let sx = (ox as f32 + 0.5) * sw as f32 / tw as f32 - 0.5;
        let x0 = sx.floor().clamp(0.0, (sw - 1) as f32) as u32;
        let x1 = (x0 + 1).min(sw - 1);
        let fx = (sx - x0 as f32).clamp(0.0, 1.0);

        let out_idx = (ox * 3) as usize;
        for c in 0..3usize {
            let p00 = data[((y0 * sw + x0) * 3) as usize + c];
            let p10 = data[((y0 * sw + x1) * 3) as usize + c];
            let p01 = data[((y1 * sw + x0) * 3) as usize + c];
            let p11 = data[((y1 * sw + x1) * 3) as usize + c];

            let top = p00 + (p10 - p00) * fx;
            let bottom = p01 + (p11 - p01) * fx;
            row[out_idx + c] = top + (bottom - top) * fy;
        }
    }
}

/// 3x3 Gaussian smoothing per channel (kernel 1-2-1, borders clamped)
fn gaussian3x3(data: &[f32], width: u32, height: u32) -> Vec<f32> {
    const KERNEL: [f32; 3] = [1.0, 2.0, 1.0];

    let mut out = vec![0.0f32; data.len()];
    let row_len = (width * 3) as usize;

    let smooth_row = |y: usize, row: &mut [f32]| {
        let y = y as i64;
        for x in 0..width as i64 {
            for c in 0..3i64 {
                let mut sum = 0.0;
                let mut weight = 0.0;
                for (ky, wy) in KERNEL.iter().enumerate() {
                    let sy = (y + ky as i64 - 1).clamp(0, height as i64 - 1);
                    for (kx, wx) in KERNEL.iter().enumerate() {
                        let sx = (x + kx as i64 - 1).clamp(0, width as i64 - 1);
                        let w = wy * wx;
                        sum += w * data[((sy * width as i64 + sx) * 3 + c) as usize];
                        weight += w;
                    }
                }
                row[(x * 3 + c) as usize] = sum / weight;
            }
        }
    };

    if (width * height) as usize >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| smooth_row(y, row));
    } else {
        for (y, row) in out.chunks_mut(row_len).enumerate() {
            smooth_row(y, row);
        }
    }

    out
}
