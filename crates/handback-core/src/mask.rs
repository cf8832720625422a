//! Caller-supplied region-of-interest masks.
//!
//! A mask restricts which pixels contribute to cue and fusion output.
//! It is read-only to the engine and may arrive at any resolution; it is
//! resized to the working field's shape with nearest-neighbor sampling
//! before the element-wise multiply.

use crate::field::ScalarField;

/// Region-of-interest mask
///
/// Values in [0, 1]: 1 retains a pixel, 0 suppresses it. Fractional values
/// attenuate proportionally.
#[derive(Debug, Clone)]
pub struct RegionMask {
    /// Mask width in pixels
    pub width: u32,

    /// Mask height in pixels
    pub height: u32,

    /// Row-major retention weights (f32, 0.0-1.0 range)
    pub data: Vec<f32>,
}

impl RegionMask {
    /// Build a mask from a single-channel byte buffer, rescaling [0, 255] to [0, 1]
    pub fn from_luma8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, String> {
        let expected = (width * height) as usize;
        if bytes.len() != expected {
            return Err(format!(
                "Mask buffer size mismatch: expected {}, got {}",
                expected,
                bytes.len()
            ));
        }
        let data = bytes.iter().map(|&v| v as f32 / 255.0).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Resample the mask to a new resolution with nearest-neighbor sampling
    pub fn resized(&self, width: u32, height: u32) -> RegionMask {
        if width == self.width && height == self.height {
            return self.clone();
        }

        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64).min(self.height as u64 - 1);
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64).min(self.width as u64 - 1);
                data.push(self.data[(sy * self.width as u64 + sx) as usize]);
            }
        }

        RegionMask {
            width,
            height,
            data,
        }
    }
}

/// Apply an optional region mask to a field.
///
/// The mask is resized to the field's resolution if necessary and multiplied
/// element-wise. Without a mask this is the identity function. Masking never
/// increases field values; for inputs in [0, 1] the output stays in [0, 1].
pub fn apply_mask(mut field: ScalarField, mask: Option<&RegionMask>) -> ScalarField {
    let Some(mask) = mask else {
        return field;
    };

    let resized;
    let mask = if mask.width == field.width && mask.height == field.height {
        mask
    } else {
        resized = mask.resized(field.width, field.height);
        &resized
    };

    for (value, &weight) in field.data.iter_mut().zip(mask.data.iter()) {
        *value *= weight.clamp(0.0, 1.0);
    }

    field
}
