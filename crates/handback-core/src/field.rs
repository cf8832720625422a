//! Scalar field type shared by the cue extractors and the fusion engine.

/// Epsilon guarding min-max normalization against zero dynamic range.
pub const NORM_EPSILON: f32 = 1e-6;

/// A 2-D grid of f32 values, one per pixel.
///
/// Cue extraction, fusion, and binarization all operate on this type.
/// After any normalization step the values lie in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// Field width in pixels
    pub width: u32,

    /// Field height in pixels
    pub height: u32,

    /// Row-major values, one per pixel
    pub data: Vec<f32>,
}

impl ScalarField {
    /// Create a field filled with zeros
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width * height) as usize],
        }
    }

    /// Wrap an existing value buffer, validating its length
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Result<Self, String> {
        let expected = (width * height) as usize;
        if data.len() != expected {
            return Err(format!(
                "Field buffer size mismatch: expected {}, got {}",
                expected,
                data.len()
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Number of pixels in the field
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the field has no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True if `other` has the same spatial dimensions
    pub fn same_shape(&self, other: &ScalarField) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Compute minimum and maximum value
    pub fn min_max(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &value in &self.data {
            min = min.min(value);
            max = max.max(value);
        }
        if self.data.is_empty() {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }

    /// Mean value over all pixels (0.0 for an empty field)
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.data.iter().sum();
        sum / self.data.len() as f32
    }

    /// Min-max normalize in place.
    ///
    /// When the field has dynamic range above `NORM_EPSILON` the minimum
    /// maps to 0 and the maximum to 1. A degenerate (uniform) field keeps
    /// its values, clamped into [0, 1]: an identical image pair yields a
    /// uniform zero field, while a uniformly saturated difference survives
    /// as a uniform high field instead of collapsing to zero.
    pub fn normalize(&mut self) {
        let (min, max) = self.min_max();
        let range = max - min;

        if range > NORM_EPSILON {
            for value in self.data.iter_mut() {
                *value = (*value - min) / range;
            }
        } else {
            for value in self.data.iter_mut() {
                *value = value.clamp(0.0, 1.0);
            }
        }
    }

    /// Consuming variant of [`normalize`](Self::normalize)
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let result = ScalarField::from_vec(4, 4, vec![0.0; 15]);
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_maps_extremes() {
        let mut field = ScalarField::from_vec(2, 2, vec![0.2, 0.4, 0.6, 0.8]).unwrap();
        field.normalize();

        let (min, max) = field.min_max();
        assert!((min - 0.0).abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
        assert!((field.data[1] - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_uniform_zero_stays_zero() {
        let mut field = ScalarField::zeros(3, 3);
        field.normalize();
        assert!(field.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_normalize_uniform_value_is_kept_and_clamped() {
        let mut field = ScalarField::from_vec(2, 2, vec![0.7; 4]).unwrap();
        field.normalize();
        assert!(field.data.iter().all(|&v| (v - 0.7).abs() < 1e-6));

        let mut saturated = ScalarField::from_vec(2, 2, vec![100.0; 4]).unwrap();
        saturated.normalize();
        assert!(saturated.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_mean() {
        let field = ScalarField::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        assert!((field.mean() - 0.5).abs() < 1e-6);
    }
}
