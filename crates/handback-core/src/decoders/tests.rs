use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use super::{decode_image, decode_image_bytes, decode_mask_bytes};

/// Encode a solid-color RGB image to PNG bytes
fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding failed");
    bytes
}

#[test]
fn test_decode_png_rgb() {
    let bytes = png_bytes(8, 6, [255, 128, 0]);
    let decoded = decode_image_bytes(&bytes).unwrap();

    assert_eq!(decoded.width, 8);
    assert_eq!(decoded.height, 6);
    assert_eq!(decoded.channels, 3);
    assert_eq!(decoded.data.len(), 8 * 6 * 3);

    assert!((decoded.data[0] - 1.0).abs() < 1e-6);
    assert!((decoded.data[1] - 128.0 / 255.0).abs() < 1e-6);
    assert!((decoded.data[2] - 0.0).abs() < 1e-6);
}

#[test]
fn test_decode_garbage_bytes_fails() {
    let result = decode_image_bytes(&[0u8, 1, 2, 3, 4, 5]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to decode image"));
}

#[test]
fn test_decode_missing_file_fails() {
    let result = decode_image("/nonexistent/path/to/photo.png");
    assert!(result.is_err());
}

#[test]
fn test_decode_mask_rescales_to_unit_range() {
    let bytes = png_bytes(4, 4, [255, 255, 255]);
    let mask = decode_mask_bytes(&bytes).unwrap();

    assert_eq!(mask.width, 4);
    assert_eq!(mask.height, 4);
    assert!(mask.data.iter().all(|&v| (v - 1.0).abs() < 1e-2));
}
