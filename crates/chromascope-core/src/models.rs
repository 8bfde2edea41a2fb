//! Mode enums and analysis parameters.

use serde::{Deserialize, Serialize};

use crate::capture::CaptureRect;
use crate::math::Matrix;

/// Color-space projection for the cloud point positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorSpace {
    /// RGB cube: position = 1.25 * (rgb - 0.5)
    #[default]
    Cube,

    /// HSL cylinder: hue maps to the angle about the vertical axis,
    /// lightness to the vertical coordinate, chroma to the radius, with a
    /// normalizer keeping extreme values inside the unit cylinder.
    Cylinder,
}

impl ColorSpace {
    /// Encoding consumed by the mesh shader.
    pub fn shader_index(self) -> u32 {
        match self {
            ColorSpace::Cube => 0,
            ColorSpace::Cylinder => 1,
        }
    }
}

/// Histogram binning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HistogramMode {
    /// One 256-bin histogram per RGB channel
    #[default]
    Rgb,

    /// RGB channels plus a fourth Rec.709 luma channel
    RgbLuma,

    /// Single Rec.709 luma channel
    Luma,

    /// Single hue channel, weighted by saturation
    Hue,
}

impl HistogramMode {
    /// Encoding consumed by the histogram shader.
    pub fn shader_index(self) -> u32 {
        match self {
            HistogramMode::Rgb => 0,
            HistogramMode::RgbLuma => 1,
            HistogramMode::Luma => 2,
            HistogramMode::Hue => 3,
        }
    }

    /// Number of active histogram channels.
    pub fn channel_count(self) -> usize {
        match self {
            HistogramMode::Rgb => 3,
            HistogramMode::RgbLuma => 4,
            HistogramMode::Luma | HistogramMode::Hue => 1,
        }
    }

    /// Display color (RGBA) a renderer should use for the given channel.
    ///
    /// For `Hue` mode the whole curve is a hue sweep; see
    /// [`HistogramMode::hue_sweep_color`].
    pub fn channel_color(self, channel: usize) -> [f32; 4] {
        const CHANNEL_COLORS: [[f32; 4]; 4] = [
            [1.0, 0.0, 0.0, 0.8],
            [0.0, 1.0, 0.0, 0.8],
            [0.0, 0.0, 1.0, 0.8],
            [1.0, 1.0, 1.0, 0.8],
        ];

        match self {
            HistogramMode::Rgb | HistogramMode::RgbLuma => {
                CHANNEL_COLORS[channel.min(self.channel_count() - 1)]
            }
            // Luma and the hue-sweep baseline both draw in white
            HistogramMode::Luma | HistogramMode::Hue => CHANNEL_COLORS[3],
        }
    }

    /// Display color for a single hue bin: a full hue sweep at fixed
    /// saturation and lightness.
    pub fn hue_sweep_color(bin: usize) -> [f32; 4] {
        let hsl = crate::color::Hsl {
            h: bin as f32 / 256.0 * 360.0,
            s: 1.0,
            l: 0.5,
        };
        let (r, g, b) = crate::color::hsl_to_rgb(hsl);
        [r, g, b, 0.8]
    }
}

/// Parameters for cloud mesh generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParams {
    pub color_space: ColorSpace,
    /// Counts at or below this threshold get the minimum point size.
    pub min_count: u32,
    /// Reciprocal of the count at which the point size saturates.
    pub inv_max_count: f32,
    /// Placement transform applied to color-space positions.
    pub projection: Matrix,
}

impl CloudParams {
    /// Defaults for a capture rectangle: sizes saturate at one ninth of the
    /// sampled area, with no lower threshold.
    pub fn for_rect(color_space: ColorSpace, rect: &CaptureRect) -> Self {
        let max_count = (rect.area() / 9).max(1);
        Self {
            color_space,
            min_count: 0,
            inv_max_count: 1.0 / max_count as f32,
            projection: Matrix::identity(),
        }
    }
}
