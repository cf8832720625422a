//! Artifact rendering for verification results.
//!
//! The engine supplies pixel data and a destination path; the resulting
//! PNG paths travel back to the caller inside the result record. Rendering
//! failures are recoverable: the caller keeps its numeric verdict and only
//! loses the artifact reference.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::decoders::DecodedImage;
use crate::field::ScalarField;
use crate::normalize::resize_rgb;

/// Intensities below this render as background in heatmap and overlay
const DAMAGE_FLOOR: f32 = 0.3;

/// Blend factor of the damage colors over the "after" photo
const OVERLAY_ALPHA: f32 = 0.5;

/// Render a damage-intensity field as a heatmap PNG.
///
/// Values below the damage floor draw as black so only significant regions
/// stand out; the rest map through a jet-style color ramp.
pub fn save_heatmap_png<P: AsRef<Path>>(
    field: &ScalarField,
    path: P,
) -> Result<PathBuf, String> {
    let path = path.as_ref();

    let mut img = RgbImage::new(field.width, field.height);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let value = field.data[i];
        *pixel = if value < DAMAGE_FLOOR {
            image::Rgb([0, 0, 0])
        } else {
            image::Rgb(jet_color(value))
        };
    }

    img.save(path)
        .map_err(|e| format!("Failed to write heatmap PNG: {}", e))?;
    Ok(path.to_path_buf())
}

/// Render a damage field blended over the "after" photo as an overlay PNG.
///
/// Pixels whose field value reaches the damage floor blend the jet color at
/// the overlay alpha; everything else keeps the photo unchanged. The photo
/// resizes to the field's resolution if the shapes differ.
pub fn save_overlay_png<P: AsRef<Path>>(
    base: &DecodedImage,
    field: &ScalarField,
    path: P,
) -> Result<PathBuf, String> {
    let path = path.as_ref();

    let base_data = if base.width == field.width && base.height == field.height {
        base.data.clone()
    } else {
        resize_rgb(
            &base.data,
            base.width,
            base.height,
            field.width,
            field.height,
        )
    };

    let mut img = RgbImage::new(field.width, field.height);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let value = field.data[i];
        let rgb = &base_data[i * 3..i * 3 + 3];

        *pixel = if value < DAMAGE_FLOOR {
            image::Rgb([to_u8(rgb[0]), to_u8(rgb[1]), to_u8(rgb[2])])
        } else {
            let heat = jet_color(value);
            image::Rgb([
                blend(rgb[0], heat[0]),
                blend(rgb[1], heat[1]),
                blend(rgb[2], heat[2]),
            ])
        };
    }

    img.save(path)
        .map_err(|e| format!("Failed to write overlay PNG: {}", e))?;
    Ok(path.to_path_buf())
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn blend(base: f32, heat: u8) -> u8 {
    let mixed = base.clamp(0.0, 1.0) * (1.0 - OVERLAY_ALPHA) + heat as f32 / 255.0 * OVERLAY_ALPHA;
    (mixed * 255.0).round() as u8
}

/// Jet-style color ramp: blue through green to red with increasing intensity
fn jet_color(value: f32) -> [u8; 3] {
    let v = value.clamp(0.0, 1.0);
    let r = ((1.5 - (4.0 * v - 3.0).abs()).clamp(0.0, 1.0) * 255.0) as u8;
    let g = ((1.5 - (4.0 * v - 2.0).abs()).clamp(0.0, 1.0) * 255.0) as u8;
    let b = ((1.5 - (4.0 * v - 1.0).abs()).clamp(0.0, 1.0) * 255.0) as u8;
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_color_endpoints() {
        let cold = jet_color(0.0);
        let hot = jet_color(1.0);
        assert!(cold[2] > cold[0], "low intensity should lean blue: {:?}", cold);
        assert!(hot[0] > hot[2], "high intensity should lean red: {:?}", hot);
    }

    #[test]
    fn test_save_heatmap_rejects_bad_path() {
        let field = ScalarField::zeros(4, 4);
        let result = save_heatmap_png(&field, "/nonexistent-dir/heatmap.png");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to write heatmap"));
    }

    #[test]
    fn test_save_and_reload_heatmap() {
        let dir = std::env::temp_dir().join("handback-exporter-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("heatmap.png");

        let mut field = ScalarField::zeros(8, 8);
        field.data[0] = 1.0;
        let written = save_heatmap_png(&field, &path).unwrap();

        let decoded = crate::decoders::decode_image(&written).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 8));

        std::fs::remove_file(&written).ok();
    }

    #[test]
    fn test_overlay_resizes_base_to_field() {
        let dir = std::env::temp_dir().join("handback-exporter-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("overlay.png");

        let base = DecodedImage {
            width: 16,
            height: 16,
            data: vec![0.5; 16 * 16 * 3],
            channels: 3,
        };
        let field = ScalarField::zeros(8, 8);
        let written = save_overlay_png(&base, &field, &path).unwrap();

        let decoded = crate::decoders::decode_image(&written).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 8));

        std::fs::remove_file(&written).ok();
    }
}
