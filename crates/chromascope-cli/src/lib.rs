//! Shared CLI utilities: argument parsing helpers.

use chromascope_core::capture::CaptureRect;
use chromascope_core::models::{ColorSpace, HistogramMode};

/// Parse a capture rectangle from "X,Y,W,H".
pub fn parse_rect(s: &str) -> Result<CaptureRect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("Invalid rectangle '{}': expected X,Y,W,H", s));
    }

    let mut values = [0u32; 4];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|e| format!("Invalid rectangle component '{}': {}", part, e))?;
    }

    Ok(CaptureRect::new(values[0], values[1], values[2], values[3]))
}

/// Parse a histogram mode name; unknown names fall back to RGB.
pub fn parse_histogram_mode(s: &str) -> HistogramMode {
    match s.to_lowercase().as_str() {
        "rgbl" | "rgb+luma" => HistogramMode::RgbLuma,
        "luma" => HistogramMode::Luma,
        "hue" => HistogramMode::Hue,
        "rgb" => HistogramMode::Rgb,
        other => {
            log::warn!("Unknown histogram mode '{}', using rgb", other);
            HistogramMode::Rgb
        }
    }
}

/// Parse a color-space name; unknown names fall back to the cube.
pub fn parse_color_space(s: &str) -> ColorSpace {
    match s.to_lowercase().as_str() {
        "hsl" | "cylinder" => ColorSpace::Cylinder,
        "rgb" | "cube" => ColorSpace::Cube,
        other => {
            log::warn!("Unknown color space '{}', using rgb cube", other);
            ColorSpace::Cube
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect() {
        let rect = parse_rect("1, 2, 30, 40").unwrap();
        assert_eq!(rect, CaptureRect::new(1, 2, 30, 40));

        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(parse_histogram_mode("hue"), HistogramMode::Hue);
        assert_eq!(parse_histogram_mode("RGBL"), HistogramMode::RgbLuma);
        assert_eq!(parse_histogram_mode("bogus"), HistogramMode::Rgb);

        assert_eq!(parse_color_space("hsl"), ColorSpace::Cylinder);
        assert_eq!(parse_color_space("bogus"), ColorSpace::Cube);
    }
}
