//! The `analyze` command: histogram and frequency-table summary.

use serde::Serialize;
use std::path::PathBuf;

use chromascope_core::capture::{self, CaptureRect};
use chromascope_core::cloud;
use chromascope_core::histogram::HistogramBins;
use chromascope_core::models::HistogramMode;

/// Analysis result structure for JSON output.
#[derive(Serialize)]
pub struct AnalysisResult {
    pub file: String,
    pub dimensions: [u32; 2],
    pub rect: [u32; 4],
    pub mode: String,
    pub backend: String,
    pub sampled_pixels: u64,
    pub distinct_colors: usize,
    pub top_colors: Vec<TopColor>,
    pub histogram: Vec<Vec<u32>>,
}

/// One frequently occurring color.
#[derive(Serialize)]
pub struct TopColor {
    pub code: String,
    pub count: u32,
}

/// Execute the analyze command: histogram plus counter-table summary.
pub fn cmd_analyze(
    input: PathBuf,
    rect: Option<CaptureRect>,
    mode: HistogramMode,
    gpu: bool,
    json_output: bool,
    save: Option<PathBuf>,
    top: usize,
) -> Result<(), String> {
    let frame = capture::load_png(&input)?;
    let rect = super::resolve_rect(&frame, rect);
    if rect.is_empty() {
        return Err("Capture rectangle does not intersect the frame".to_string());
    }

    let use_gpu = super::use_gpu(gpu);
    let (bins, counter) = if use_gpu {
        analyze_gpu(&frame, &rect, mode)?
    } else {
        (
            chromascope_core::histogram::accumulate_histogram(&frame, &rect, mode),
            cloud::count_colors(&frame, &rect),
        )
    };

    let mut top_colors: Vec<(u32, u32)> = Vec::new();
    for entry in cloud::compact_grid(&counter) {
        top_colors.push((entry.code(), entry.count()));
    }
    top_colors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    top_colors.truncate(top);

    let result = AnalysisResult {
        file: input.display().to_string(),
        dimensions: [frame.width, frame.height],
        rect: [rect.x, rect.y, rect.width, rect.height],
        mode: format!("{:?}", mode),
        backend: if use_gpu { "gpu" } else { "cpu" }.to_string(),
        sampled_pixels: rect.area(),
        distinct_colors: counter.distinct(),
        top_colors: top_colors
            .iter()
            .map(|&(code, count)| TopColor {
                code: format!("#{:02x}{:02x}{:02x}", code & 0xff, (code >> 8) & 0xff, code >> 16),
                count,
            })
            .collect(),
        histogram: (0..mode.channel_count())
            .map(|channel| bins.channel(channel).to_vec())
            .collect(),
    };

    if json_output {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize analysis: {}", e))?;
        println!("{}", json);
    } else {
        print_report(&result, mode, &bins);
    }

    if let Some(save_path) = save {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize analysis: {}", e))?;
        std::fs::write(&save_path, &json)
            .map_err(|e| format!("Failed to write analysis file: {}", e))?;
        if !json_output {
            println!("\nAnalysis saved to: {}", save_path.display());
        }
    }

    Ok(())
}

#[cfg(feature = "gpu")]
fn analyze_gpu(
    frame: &chromascope_core::capture::Frame,
    rect: &CaptureRect,
    mode: HistogramMode,
) -> Result<(HistogramBins, cloud::CounterBuffer), String> {
    use chromascope_core::gpu;
    use chromascope_core::histogram::HISTOGRAM_BINS;

    let ctx = gpu::GpuContext::new().map_err(|e| e.to_string())?;
    let gpu_frame = gpu::GpuFrame::upload(&ctx, frame).map_err(|e| e.to_string())?;

    let gpu_hist = gpu::GpuHistogram::new(&ctx);
    gpu::accumulate_histogram(&ctx, &gpu_frame, &gpu_hist, rect, mode)
        .map_err(|e| e.to_string())?;
    let tables = gpu_hist.download().map_err(|e| e.to_string())?;

    let mut bins = HistogramBins::new();
    for (channel, table) in tables.iter().enumerate().take(mode.channel_count()) {
        for bin in 0..HISTOGRAM_BINS {
            bins.add(channel, bin as u8, table[bin]);
        }
    }

    // The frequency summary still comes from the CPU table: compacting on
    // the host avoids a 64 MiB counter readback.
    let counter = cloud::count_colors(frame, rect);
    Ok((bins, counter))
}

#[cfg(not(feature = "gpu"))]
fn analyze_gpu(
    _frame: &chromascope_core::capture::Frame,
    _rect: &CaptureRect,
    _mode: HistogramMode,
) -> Result<(HistogramBins, cloud::CounterBuffer), String> {
    unreachable!("GPU path requested without GPU support")
}

fn print_report(result: &AnalysisResult, mode: HistogramMode, bins: &HistogramBins) {
    println!("Analyzing: {}\n", result.file);

    println!("Frame Info:");
    println!(
        "  Dimensions: {}x{}",
        result.dimensions[0], result.dimensions[1]
    );
    println!(
        "  Rect: ({}, {}, {}, {})",
        result.rect[0], result.rect[1], result.rect[2], result.rect[3]
    );
    println!("  Backend: {}", result.backend);

    println!("\nColor Frequency:");
    println!("  Sampled pixels: {}", result.sampled_pixels);
    println!("  Distinct colors: {}", result.distinct_colors);
    for color in &result.top_colors {
        println!("  {}  x{}", color.code, color.count);
    }

    println!("\nHistogram ({:?}):", mode);
    for channel in 0..mode.channel_count() {
        let total = bins.channel_total(channel);
        let peak = bins
            .channel(channel)
            .iter()
            .enumerate()
            .max_by_key(|&(_, &c)| c)
            .map(|(bin, _)| bin)
            .unwrap_or(0);
        println!("  Channel {}: total={}, peak bin={}", channel, total, peak);
    }
}
