//! ColorCounter: per-pixel scatter-counting into the 2^24-entry table.

use crate::capture::{CaptureRect, Frame};
use crate::color::{CODE_MASK, CODE_SPACE};

/// Flat table of saturating counters, one per 24-bit color code.
///
/// Append-only for the duration of one pass; cleared by the caller between
/// captures. The backing allocation is 64 MiB, matching the GPU-side arena.
pub struct CounterBuffer {
    counts: Vec<u32>,
}

impl Default for CounterBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterBuffer {
    pub fn new() -> Self {
        Self {
            counts: vec![0u32; CODE_SPACE],
        }
    }

    /// Reset all counters for the next capture.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    #[inline]
    pub fn count(&self, code: u32) -> u32 {
        self.counts[(code & CODE_MASK) as usize]
    }

    #[inline]
    pub fn add(&mut self, code: u32, n: u32) {
        let slot = &mut self.counts[(code & CODE_MASK) as usize];
        *slot = slot.saturating_add(n);
    }

    /// Sum over all counters. Equals the number of sampled pixels absent
    /// clamp saturation.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Number of codes with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }
}

/// Count every pixel of `frame` inside `rect`, one increment per pixel.
pub fn count_colors(frame: &Frame, rect: &CaptureRect) -> CounterBuffer {
    let mut counter = CounterBuffer::new();
    accumulate(&mut counter, frame, rect);
    counter
}

/// Accumulate a frame's pixels into an existing counter table.
pub fn accumulate(counter: &mut CounterBuffer, frame: &Frame, rect: &CaptureRect) {
    let rect = rect.clamped_to(frame.width, frame.height);
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            counter.add(frame.code_at(x, y), 1);
        }
    }
}

/// Statistics from the coalescing simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoalescedStats {
    /// Atomic adds a lane-group-coalescing counter would have issued.
    pub atomic_adds: usize,
}

/// Count with lane-group coalescing, mirroring the GPU kernel's dedup.
///
/// Pixels are walked in row-major order and chunked into lane groups of
/// `lane_width`. Within a group each lane computes a same-value mask over the
/// group and acts only if no earlier lane carries its code, issuing a single
/// add of the combined count. The resulting table is identical to
/// [`count_colors`]; only the number of adds differs.
pub fn count_colors_coalesced(
    frame: &Frame,
    rect: &CaptureRect,
    lane_width: usize,
) -> (CounterBuffer, CoalescedStats) {
    let rect = rect.clamped_to(frame.width, frame.height);
    let mut counter = CounterBuffer::new();
    let mut stats = CoalescedStats::default();

    let codes: Vec<u32> = (0..rect.height)
        .flat_map(|y| (0..rect.width).map(move |x| (x, y)))
        .map(|(x, y)| frame.code_at(rect.x + x, rect.y + y))
        .collect();

    for group in codes.chunks(lane_width.max(1)) {
        for (lane, &code) in group.iter().enumerate() {
            // Exclusive count of matching lanes: zero means this lane is the
            // representative for its value.
            let matches_before = group[..lane].iter().filter(|&&c| c == code).count();
            if matches_before == 0 {
                let combined = group.iter().filter(|&&c| c == code).count() as u32;
                counter.add(code, combined);
                stats.atomic_adds += 1;
            }
        }
    }

    (counter, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::pack_code;

    fn checker_frame(width: u32, height: u32, a: u32, b: u32) -> Frame {
        let mut frame = Frame::new(width, height);
        for y in 0..height {
            for x in 0..width {
                frame.pixels[(y * width + x) as usize] = if (x + y) % 2 == 0 { a } else { b };
            }
        }
        frame
    }

    #[test]
    fn test_total_equals_sampled_pixels() {
        let frame = checker_frame(7, 5, 0x010203, 0xa0b0c0);
        let rect = CaptureRect::new(1, 1, 4, 3);
        let counter = count_colors(&frame, &rect);
        assert_eq!(counter.total(), rect.area());
    }

    #[test]
    fn test_uniform_rect_single_code() {
        let mut frame = Frame::new(8, 8);
        frame.fill_rect(&CaptureRect::new(0, 0, 8, 8), pack_code(255, 0, 0));

        let counter = count_colors(&frame, &CaptureRect::new(0, 0, 4, 4));
        assert_eq!(counter.count(0x0000ff), 16);
        assert_eq!(counter.distinct(), 1);
        assert_eq!(counter.total(), 16);
    }

    #[test]
    fn test_out_of_frame_rect_counts_nothing() {
        let frame = Frame::new(4, 4);
        let counter = count_colors(&frame, &CaptureRect::new(10, 10, 4, 4));
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn test_coalesced_matches_naive() {
        let frame = checker_frame(16, 16, 0x111111, 0x222222);
        let rect = CaptureRect::full(&frame);

        let naive = count_colors(&frame, &rect);
        let (coalesced, _) = count_colors_coalesced(&frame, &rect, 32);

        assert_eq!(naive.count(0x111111), coalesced.count(0x111111));
        assert_eq!(naive.count(0x222222), coalesced.count(0x222222));
        assert_eq!(naive.total(), coalesced.total());
    }

    #[test]
    fn test_coalesced_uniform_add_bound() {
        // A uniform rectangle of area A issues at most ceil(A / lane_width)
        // adds while still producing the full count.
        let mut frame = Frame::new(24, 24);
        frame.fill_rect(&CaptureRect::new(0, 0, 24, 24), 0x336699);
        let rect = CaptureRect::full(&frame);

        let area = rect.area() as usize;
        let lane_width = 64;
        let (counter, stats) = count_colors_coalesced(&frame, &rect, lane_width);

        assert_eq!(counter.count(0x336699), area as u32);
        assert!(stats.atomic_adds <= area.div_ceil(lane_width));
    }

    #[test]
    fn test_coalesced_worst_case_degrades_to_naive() {
        // All-distinct pixels cannot coalesce: one add per pixel.
        let mut frame = Frame::new(8, 8);
        for (i, px) in frame.pixels.iter_mut().enumerate() {
            *px = i as u32;
        }
        let rect = CaptureRect::full(&frame);
        let (counter, stats) = count_colors_coalesced(&frame, &rect, 32);

        assert_eq!(stats.atomic_adds, 64);
        assert_eq!(counter.total(), 64);
    }

    #[test]
    fn test_saturating_add() {
        let mut counter = CounterBuffer::new();
        counter.add(5, u32::MAX - 1);
        counter.add(5, 10);
        assert_eq!(counter.count(5), u32::MAX);
    }
}
