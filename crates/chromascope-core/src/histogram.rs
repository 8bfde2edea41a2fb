//! HistogramBinner: per-channel 256-bin accumulation under four modes.
//!
//! Independent of the cloud pipeline. The GPU kernel samples 2x2 pixel
//! blocks per thread and merges group-local shared-memory bins into the
//! four global channel tables; this reference implementation produces the
//! identical tables by visiting every pixel of the capture rectangle once.

use crate::capture::{CaptureRect, Frame};
use crate::color::{hue_bin_u8, luma_u8, unpack_code};
use crate::models::HistogramMode;

/// Bins per histogram channel.
pub const HISTOGRAM_BINS: usize = 256;

/// Maximum number of histogram channels.
pub const HISTOGRAM_CHANNELS: usize = 4;

/// Per-channel 256-bin counter tables.
///
/// All four channels are always allocated; [`HistogramMode::channel_count`]
/// says how many a pass actually writes. Cleared by the caller between
/// passes; saturating and monotonic non-decreasing within a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramBins {
    bins: [[u32; HISTOGRAM_BINS]; HISTOGRAM_CHANNELS],
}

impl Default for HistogramBins {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramBins {
    pub fn new() -> Self {
        Self {
            bins: [[0u32; HISTOGRAM_BINS]; HISTOGRAM_CHANNELS],
        }
    }

    pub fn clear(&mut self) {
        self.bins = [[0u32; HISTOGRAM_BINS]; HISTOGRAM_CHANNELS];
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &[u32; HISTOGRAM_BINS] {
        &self.bins[channel]
    }

    #[inline]
    pub fn add(&mut self, channel: usize, bin: u8, weight: u32) {
        let slot = &mut self.bins[channel][bin as usize];
        *slot = slot.saturating_add(weight);
    }

    /// Sum of one channel's bins.
    pub fn channel_total(&self, channel: usize) -> u64 {
        self.bins[channel].iter().map(|&c| c as u64).sum()
    }
}

/// Weight of a hue-mode sample: zero for achromatic pixels, otherwise
/// floor(127 * (0.5 * saturation + 0.5)), capped at 127 for full saturation.
#[inline]
pub fn hue_weight(saturation: f32) -> u32 {
    if saturation <= 0.0 {
        0
    } else {
        (127.0 * (0.5 * saturation + 0.5)) as u32
    }
}

/// Deposit one pixel's (bin, weight) pairs for the selected mode.
#[inline]
fn accumulate_sample(bins: &mut HistogramBins, mode: HistogramMode, code: u32) {
    let [r, g, b] = unpack_code(code);

    match mode {
        HistogramMode::Rgb => {
            bins.add(0, r, 1);
            bins.add(1, g, 1);
            bins.add(2, b, 1);
        }
        HistogramMode::RgbLuma => {
            bins.add(0, r, 1);
            bins.add(1, g, 1);
            bins.add(2, b, 1);
            bins.add(3, luma_u8(r, g, b), 1);
        }
        HistogramMode::Luma => {
            bins.add(0, luma_u8(r, g, b), 1);
        }
        HistogramMode::Hue => {
            let (bin, saturation) = hue_bin_u8(r, g, b);
            let weight = hue_weight(saturation);
            if weight > 0 {
                bins.add(0, bin, weight);
            }
        }
    }
}

/// Accumulate a frame's capture rectangle into fresh histogram tables.
pub fn accumulate_histogram(frame: &Frame, rect: &CaptureRect, mode: HistogramMode) -> HistogramBins {
    let mut bins = HistogramBins::new();
    accumulate(&mut bins, frame, rect, mode);
    bins
}

/// Accumulate into existing tables (the caller clears between passes).
pub fn accumulate(bins: &mut HistogramBins, frame: &Frame, rect: &CaptureRect, mode: HistogramMode) {
    let rect = rect.clamped_to(frame.width, frame.height);
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            accumulate_sample(bins, mode, frame.code_at(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::pack_code;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut frame = Frame::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 255) / (width - 1).max(1)) as u8;
                frame.pixels[(y * width + x) as usize] = pack_code(v, 255 - v, v / 2);
            }
        }
        frame
    }

    #[test]
    fn test_rgb_conservation() {
        let frame = gradient_frame(32, 16);
        let rect = CaptureRect::new(3, 2, 20, 10);
        let bins = accumulate_histogram(&frame, &rect, HistogramMode::Rgb);

        let n = rect.area();
        assert_eq!(bins.channel_total(0), n);
        assert_eq!(bins.channel_total(1), n);
        assert_eq!(bins.channel_total(2), n);
        assert_eq!(bins.channel_total(3), 0);
    }

    #[test]
    fn test_rgbl_fourth_channel() {
        let frame = gradient_frame(16, 4);
        let rect = CaptureRect::full(&frame);
        let bins = accumulate_histogram(&frame, &rect, HistogramMode::RgbLuma);

        let n = rect.area();
        for channel in 0..4 {
            assert_eq!(bins.channel_total(channel), n);
        }
    }

    #[test]
    fn test_luma_single_channel() {
        let mut frame = Frame::new(4, 4);
        frame.fill_rect(&CaptureRect::new(0, 0, 4, 4), pack_code(255, 255, 255));
        let bins = accumulate_histogram(&frame, &CaptureRect::full(&frame), HistogramMode::Luma);

        assert_eq!(bins.channel(0)[255], 16);
        assert_eq!(bins.channel_total(0), 16);
        assert_eq!(bins.channel_total(1), 0);
    }

    #[test]
    fn test_hue_weight_endpoints() {
        assert_eq!(hue_weight(0.0), 0);
        assert_eq!(hue_weight(1.0), 127);
        // Barely chromatic pixels still land above the midpoint floor
        assert_eq!(hue_weight(f32::EPSILON), 63);
    }

    #[test]
    fn test_hue_mode_red_and_gray() {
        // Alternating fully saturated red and pure gray: gray contributes
        // nothing, every red pixel adds weight 127 to red's hue bin.
        let mut frame = Frame::new(8, 1);
        for (i, px) in frame.pixels.iter_mut().enumerate() {
            *px = if i % 2 == 0 {
                pack_code(255, 0, 0)
            } else {
                pack_code(128, 128, 128)
            };
        }

        let bins = accumulate_histogram(&frame, &CaptureRect::full(&frame), HistogramMode::Hue);
        assert_eq!(bins.channel(0)[0], 4 * 127);
        assert_eq!(bins.channel_total(0), 4 * 127);
    }

    #[test]
    fn test_monotonic_across_passes() {
        let frame = gradient_frame(8, 8);
        let rect = CaptureRect::full(&frame);

        let mut bins = HistogramBins::new();
        accumulate(&mut bins, &frame, &rect, HistogramMode::Rgb);
        let first = bins.channel_total(0);
        accumulate(&mut bins, &frame, &rect, HistogramMode::Rgb);
        assert_eq!(bins.channel_total(0), 2 * first);
    }

    #[test]
    fn test_empty_rect_accumulates_nothing() {
        let frame = gradient_frame(8, 8);
        let bins = accumulate_histogram(&frame, &CaptureRect::new(20, 20, 4, 4), HistogramMode::Rgb);
        assert_eq!(bins.channel_total(0), 0);
    }
}
