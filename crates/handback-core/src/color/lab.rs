//! LAB (CIE L*a*b*) color space conversion and color difference

use super::srgb_to_linear;

/// LAB color representation (CIE L*a*b*)
/// - L: 0.0-100.0 (lightness)
/// - a: approximately -128 to +128 (green-red axis)
/// - b: approximately -128 to +128 (blue-yellow axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// D65 standard illuminant reference white point
pub(crate) const D65_X: f32 = 0.95047;
pub(crate) const D65_Y: f32 = 1.00000;
pub(crate) const D65_Z: f32 = 1.08883;

/// sRGB to XYZ matrix (D65)
pub(crate) const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

/// LAB f(t) function
#[inline]
fn lab_f(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    const DELTA_CUBED: f32 = DELTA * DELTA * DELTA; // ~0.008856

    if t > DELTA_CUBED {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Convert sRGB-encoded RGB to CIE LAB (D65 illuminant)
///
/// Input: sRGB component values in range 0.0-1.0 (gamma-encoded, as they
/// come out of the decoder). Linearization is applied here.
/// Output: LAB where L is 0-100, a and b are approximately -128 to +128
#[inline]
pub fn rgb_to_lab(r: f32, g: f32, b: f32) -> Lab {
    let r = srgb_to_linear(r.max(0.0));
    let g = srgb_to_linear(g.max(0.0));
    let b = srgb_to_linear(b.max(0.0));

    // RGB to XYZ
    let m = &SRGB_TO_XYZ;
    let x = m[0][0] * r + m[0][1] * g + m[0][2] * b;
    let y = m[1][0] * r + m[1][1] * g + m[1][2] * b;
    let z = m[2][0] * r + m[2][1] * g + m[2][2] * b;

    // Normalize by reference white
    let xn = x / D65_X;
    let yn = y / D65_Y;
    let zn = z / D65_Z;

    // Apply LAB f function
    let fx = lab_f(xn);
    let fy = lab_f(yn);
    let fz = lab_f(zn);

    // Calculate LAB
    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    Lab { l, a, b }
}

/// Euclidean color difference between two LAB colors (CIE76 ΔE)
#[inline]
pub fn delta_e(a: Lab, b: Lab) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}
