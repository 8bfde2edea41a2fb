//! Captured frame model and PNG loading.
//!
//! A [`Frame`] is the randomly-addressable 2D color surface the analysis
//! kernels consume. Pixels are stored as packed `u32` words whose low 24 bits
//! are the color code (R | G<<8 | B<<16), so the counting kernel can scatter
//! directly into the counter table without repacking.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color;

/// A captured frame with packed 24-bit color pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major packed pixels; only the low 24 bits are meaningful.
    pub pixels: Vec<u32>,
}

impl Frame {
    /// Create a black frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; (width * height) as usize],
        }
    }

    /// Build a frame from interleaved 8-bit RGB data.
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self, String> {
        let expected = (width * height) as usize * 3;
        if data.len() != expected {
            return Err(format!(
                "RGB data size mismatch: expected {}, got {}",
                expected,
                data.len()
            ));
        }

        let pixels = data
            .chunks_exact(3)
            .map(|rgb| color::pack_code(rgb[0], rgb[1], rgb[2]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Color code of the pixel at (x, y). Caller guarantees bounds.
    #[inline]
    pub fn code_at(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize] & color::CODE_MASK
    }

    /// Fill a rectangle with a single color code. Out-of-frame parts are
    /// ignored. Intended for building test and demo frames.
    pub fn fill_rect(&mut self, rect: &CaptureRect, code: u32) {
        let rect = rect.clamped_to(self.width, self.height);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                self.pixels[(y * self.width + x) as usize] = code & color::CODE_MASK;
            }
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Integer capture rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole frame.
    pub fn full(frame: &Frame) -> Self {
        Self::new(0, 0, frame.width, frame.height)
    }

    /// Intersect with the frame bounds; degenerates to an empty rectangle
    /// when fully outside.
    pub fn clamped_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Load a PNG file as a frame.
///
/// 8-bit and 16-bit grayscale/RGB/RGBA inputs are accepted; 16-bit channels
/// are reduced to their high byte, alpha is dropped.
pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Frame, String> {
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open PNG file: {}", e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| "Failed to determine PNG buffer size".to_string())?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;

    let bytes = &buf[..frame_info.buffer_size()];

    let step = match bit_depth {
        png::BitDepth::Eight => 1,
        png::BitDepth::Sixteen => 2,
        other => return Err(format!("Unsupported PNG bit depth: {:?}", other)),
    };

    let samples = match color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err("Indexed PNG not supported".to_string());
        }
    };

    let stride = samples * step;
    let expected = (width * height) as usize * stride;
    if bytes.len() != expected {
        return Err(format!(
            "PNG buffer size mismatch: expected {}, got {}",
            expected,
            bytes.len()
        ));
    }

    // 16-bit PNG is big-endian, so the high byte leads either way.
    let pixels = bytes
        .chunks_exact(stride)
        .map(|px| {
            if samples < 3 {
                let v = px[0];
                color::pack_code(v, v, v)
            } else {
                color::pack_code(px[0], px[step], px[2 * step])
            }
        })
        .collect();

    Ok(Frame {
        width,
        height,
        pixels,
    })
}
