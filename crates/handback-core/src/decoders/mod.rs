//! Image decoding for verification inputs.
//!
//! Photographs arrive as byte-streams (PNG or JPEG); the decoder turns them
//! into unit-range f32 RGB grids for the pipeline. Region masks decode to a
//! single luma channel.

use std::path::Path;

use crate::mask::RegionMask;

#[cfg(test)]
mod tests;

/// Decoded image data
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGB data (f32, 0.0-1.0 range)
    pub data: Vec<f32>,

    /// Number of channels (always 3 for RGB)
    pub channels: u8,
}

/// Decode an image from a file path
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<DecodedImage, String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read image file {}: {}", path.display(), e))?;
    decode_image_bytes(&bytes)
}

/// Decode an image from an in-memory byte-stream
///
/// The container format is sniffed from the bytes (PNG, JPEG, and the other
/// formats the `image` crate recognizes). Alpha channels are dropped;
/// grayscale sources are expanded to RGB.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DecodedImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("Failed to decode image: {}", e))?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err("Decoded image has zero dimensions".to_string());
    }

    let data: Vec<f32> = rgb.as_raw().iter().map(|&v| v as f32 / 255.0).collect();

    Ok(DecodedImage {
        width,
        height,
        data,
        channels: 3,
    })
}

/// Decode a region mask from a file path
pub fn decode_mask<P: AsRef<Path>>(path: P) -> Result<RegionMask, String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read mask file {}: {}", path.display(), e))?;
    decode_mask_bytes(&bytes)
}

/// Decode a region mask from an in-memory byte-stream
///
/// The mask may be any resolution; it is resized to the working field's
/// shape when applied. Values rescale from [0, 255] to [0, 1].
pub fn decode_mask_bytes(bytes: &[u8]) -> Result<RegionMask, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("Failed to decode mask: {}", e))?;

    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    if width == 0 || height == 0 {
        return Err("Decoded mask has zero dimensions".to_string());
    }

    let data: Vec<f32> = luma.as_raw().iter().map(|&v| v as f32 / 255.0).collect();

    Ok(RegionMask {
        width,
        height,
        data,
    })
}
