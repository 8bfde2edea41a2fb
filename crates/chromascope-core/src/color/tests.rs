use super::*;

const EPS: f32 = 1e-4;

#[test]
fn test_pack_unpack_roundtrip() {
    let code = pack_code(0x12, 0x34, 0x56);
    assert_eq!(code, 0x563412);
    assert_eq!(unpack_code(code), [0x12, 0x34, 0x56]);
}

#[test]
fn test_normalized_rgb_extremes() {
    assert_eq!(normalized_rgb(0x000000), [0.0, 0.0, 0.0]);
    assert_eq!(normalized_rgb(0xffffff), [1.0, 1.0, 1.0]);
    let [r, g, b] = normalized_rgb(0x0000ff);
    assert_eq!((r, g, b), (1.0, 0.0, 0.0));
}

#[test]
fn test_luma_u8_range() {
    assert_eq!(luma_u8(0, 0, 0), 0);
    assert_eq!(luma_u8(255, 255, 255), 255);
    // Green dominates the Rec.709 weighting
    assert!(luma_u8(0, 255, 0) > luma_u8(255, 0, 0));
    assert!(luma_u8(255, 0, 0) > luma_u8(0, 0, 255));
}

#[test]
fn test_chroma_hsl_primaries() {
    let (h, s, l) = rgb_to_chroma_hsl(1.0, 0.0, 0.0);
    assert!(h.abs() < EPS);
    assert!((s - 1.0).abs() < EPS);
    assert!((l - 0.5).abs() < EPS);

    let (h, _, _) = rgb_to_chroma_hsl(0.0, 1.0, 0.0);
    assert!((h - 1.0 / 3.0).abs() < EPS);

    let (h, _, _) = rgb_to_chroma_hsl(0.0, 0.0, 1.0);
    assert!((h - 2.0 / 3.0).abs() < EPS);
}

#[test]
fn test_chroma_hsl_achromatic() {
    let (h, s, l) = rgb_to_chroma_hsl(0.5, 0.5, 0.5);
    assert_eq!(h, 0.0);
    assert_eq!(s, 0.0);
    assert!((l - 0.5).abs() < EPS);
}

#[test]
fn test_hue_bin_of_primaries() {
    let (bin, sat) = hue_bin_u8(255, 0, 0);
    assert_eq!(bin, 0);
    assert!((sat - 1.0).abs() < EPS);

    let (bin, _) = hue_bin_u8(0, 255, 0);
    assert_eq!(bin, 85); // 255 / 3

    let (bin, _) = hue_bin_u8(0, 0, 255);
    assert_eq!(bin, 170); // 2 * 255 / 3
}

#[test]
fn test_hue_bin_gray_has_zero_saturation() {
    let (_, sat) = hue_bin_u8(128, 128, 128);
    assert_eq!(sat, 0.0);
}

#[test]
fn test_hsl_roundtrip() {
    for &(r, g, b) in &[
        (1.0, 0.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.25, 0.5, 0.75),
        (0.9, 0.9, 0.1),
    ] {
        let hsl = rgb_to_hsl(r, g, b);
        let (r2, g2, b2) = hsl_to_rgb(hsl);
        assert!((r - r2).abs() < 1e-3, "r mismatch for {:?}", (r, g, b));
        assert!((g - g2).abs() < 1e-3, "g mismatch for {:?}", (r, g, b));
        assert!((b - b2).abs() < 1e-3, "b mismatch for {:?}", (r, g, b));
    }
}

#[test]
fn test_hsl_achromatic() {
    let hsl = rgb_to_hsl(0.4, 0.4, 0.4);
    assert_eq!(hsl.s, 0.0);
    let (r, g, b) = hsl_to_rgb(hsl);
    assert!((r - 0.4).abs() < EPS);
    assert_eq!(r, g);
    assert_eq!(g, b);
}
