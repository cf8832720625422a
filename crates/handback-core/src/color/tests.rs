use super::*;

#[test]
fn test_white_has_full_lightness() {
    let lab = rgb_to_lab(1.0, 1.0, 1.0);
    assert!((lab.l - 100.0).abs() < 0.1, "L for white: {}", lab.l);
    assert!(lab.a.abs() < 0.5);
    assert!(lab.b.abs() < 0.5);
}

#[test]
fn test_black_has_zero_lightness() {
    let lab = rgb_to_lab(0.0, 0.0, 0.0);
    assert!(lab.l.abs() < 0.1, "L for black: {}", lab.l);
}

#[test]
fn test_delta_e_identical_is_zero() {
    let lab = rgb_to_lab(0.3, 0.6, 0.2);
    assert!(delta_e(lab, lab) < 1e-6);
}

#[test]
fn test_delta_e_black_white_is_hundred() {
    let black = rgb_to_lab(0.0, 0.0, 0.0);
    let white = rgb_to_lab(1.0, 1.0, 1.0);
    let de = delta_e(black, white);
    assert!((de - 100.0).abs() < 0.2, "ΔE black/white: {}", de);
}

#[test]
fn test_delta_e_symmetric() {
    let a = rgb_to_lab(0.9, 0.1, 0.1);
    let b = rgb_to_lab(0.1, 0.1, 0.9);
    assert!((delta_e(a, b) - delta_e(b, a)).abs() < 1e-6);
}

#[test]
fn test_luma_weights_sum_to_one() {
    let luma = rgb_to_luma(&[1.0, 1.0, 1.0]);
    assert_eq!(luma.len(), 1);
    assert!((luma[0] - 1.0).abs() < 1e-5);
}

#[test]
fn test_luma_favors_green() {
    let green = rgb_to_luma(&[0.0, 1.0, 0.0])[0];
    let red = rgb_to_luma(&[1.0, 0.0, 0.0])[0];
    let blue = rgb_to_luma(&[0.0, 0.0, 1.0])[0];
    assert!(green > red && red > blue);
}
