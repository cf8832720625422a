//! Contrast-limited adaptive histogram equalization over a unit-range field.
//!
//! Used by the fusion engine to amplify low-contrast but spatially coherent
//! damage regions without saturating already-high-contrast noise. The clip
//! limit bounds how much any single intensity can be stretched.

use crate::field::{ScalarField, NORM_EPSILON};

/// Tile grid dimension (8x8 tiles across the field)
const TILE_GRID: u32 = 8;

/// Histogram resolution per tile
const NUM_BINS: usize = 256;

/// Apply contrast-limited adaptive histogram equalization.
///
/// The field splits into an 8x8 tile grid; each tile gets a clipped,
/// renormalized histogram CDF as its intensity mapping, and every output
/// pixel bilinearly blends the mappings of its four nearest tiles.
///
/// A degenerate (uniform) field passes through unchanged: there is no
/// contrast to enhance, and equalizing it would fabricate intensity.
/// Input values are expected in [0, 1]; output values stay in [0, 1].
pub fn equalize_adapthist(field: &ScalarField, clip_limit: f32) -> ScalarField {
    let (min, max) = field.min_max();
    if max - min <= NORM_EPSILON {
        return field.clone();
    }

    let tiles_x = TILE_GRID.min(field.width).max(1);
    let tiles_y = TILE_GRID.min(field.height).max(1);
    let tile_w = field.width.div_ceil(tiles_x);
    let tile_h = field.height.div_ceil(tiles_y);

    let mappings = build_tile_mappings(field, tiles_x, tiles_y, tile_w, tile_h, clip_limit);

    let mut out = ScalarField::zeros(field.width, field.height);
    for y in 0..field.height {
        let ty = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let ty0 = ty.floor().clamp(0.0, (tiles_y - 1) as f32) as u32;
        let ty1 = (ty0 + 1).min(tiles_y - 1);
        let fy = (ty - ty0 as f32).clamp(0.0, 1.0);

        for x in 0..field.width {
            let tx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
            let tx0 = tx.floor().clamp(0.0, (tiles_x - 1) as f32) as u32;
            let tx1 = (tx0 + 1).min(tiles_x - 1);
            let fx = (tx - tx0 as f32).clamp(0.0, 1.0);

            let idx = (y * field.width + x) as usize;
            let bin = value_bin(field.data[idx]);

            let m00 = mappings[(ty0 * tiles_x + tx0) as usize][bin];
            let m10 = mappings[(ty0 * tiles_x + tx1) as usize][bin];
            let m01 = mappings[(ty1 * tiles_x + tx0) as usize][bin];
            let m11 = mappings[(ty1 * tiles_x + tx1) as usize][bin];

            let top = m00 + (m10 - m00) * fx;
            let bottom = m01 + (m11 - m01) * fx;
            out.data[idx] = (top + (bottom - top) * fy).clamp(0.0, 1.0);
        }
    }

    out
}

/// Map a unit-range value to its histogram bin
#[inline]
fn value_bin(value: f32) -> usize {
    ((value.clamp(0.0, 1.0) * (NUM_BINS - 1) as f32) as usize).min(NUM_BINS - 1)
}

/// Build one clipped-CDF intensity mapping per tile
fn build_tile_mappings(
    field: &ScalarField,
    tiles_x: u32,
    tiles_y: u32,
    tile_w: u32,
    tile_h: u32,
    clip_limit: f32,
) -> Vec<Vec<f32>> {
    let mut mappings = Vec::with_capacity((tiles_x * tiles_y) as usize);

    for ty in 0..tiles_y {
        let y0 = ty * tile_h;
        let y1 = ((ty + 1) * tile_h).min(field.height);

        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let x1 = ((tx + 1) * tile_w).min(field.width);

            let mut histogram = [0.0f32; NUM_BINS];
            let mut count = 0usize;
            for y in y0..y1 {
                for x in x0..x1 {
                    let bin = value_bin(field.data[(y * field.width + x) as usize]);
                    histogram[bin] += 1.0;
                    count += 1;
                }
            }

            if count == 0 {
                mappings.push(vec![0.0; NUM_BINS]);
                continue;
            }

            // Clip the histogram and redistribute the excess uniformly
            let clip = (clip_limit * count as f32).max(1.0);
            let mut excess = 0.0f32;
            for bin in histogram.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let bonus = excess / NUM_BINS as f32;
            for bin in histogram.iter_mut() {
                *bin += bonus;
            }

            // Cumulative distribution as the intensity mapping
            let mut mapping = Vec::with_capacity(NUM_BINS);
            let mut cumulative = 0.0f32;
            for &bin in histogram.iter() {
                cumulative += bin;
                mapping.push(cumulative / count as f32);
            }

            mappings.push(mapping);
        }
    }

    mappings
}
