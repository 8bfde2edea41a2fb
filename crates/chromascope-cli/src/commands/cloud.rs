//! The `cloud` command: counting → compaction → mesh generation.

use serde::Serialize;
use std::path::PathBuf;

use chromascope_core::capture::{self, CaptureRect};
use chromascope_core::cloud::{self, CloudEntry};
use chromascope_core::models::{CloudParams, ColorSpace};

/// Cloud build result structure for JSON output.
#[derive(Serialize)]
pub struct CloudResult {
    pub file: String,
    pub rect: [u32; 4],
    pub color_space: String,
    pub backend: String,
    pub entry_count: usize,
    pub vertex_count: usize,
    pub mesh_workgroups: u32,
    pub points: Vec<CloudPoint>,
}

/// One generated cloud point.
#[derive(Serialize)]
pub struct CloudPoint {
    pub code: String,
    pub count: u32,
    pub position: [f32; 3],
    pub scale: f32,
}

/// Execute the cloud command: build the point cloud and report its shape.
pub fn cmd_cloud(
    input: PathBuf,
    rect: Option<CaptureRect>,
    color_space: ColorSpace,
    min_count: Option<u32>,
    max_count: Option<u32>,
    gpu: bool,
    json_output: bool,
    save: Option<PathBuf>,
) -> Result<(), String> {
    let frame = capture::load_png(&input)?;
    let rect = super::resolve_rect(&frame, rect);
    if rect.is_empty() {
        return Err("Capture rectangle does not intersect the frame".to_string());
    }

    let mut params = CloudParams::for_rect(color_space, &rect);
    if let Some(min) = min_count {
        params.min_count = min;
    }
    if let Some(max) = max_count {
        params.inv_max_count = 1.0 / max.max(1) as f32;
    }

    let use_gpu = super::use_gpu(gpu);
    let entries = if use_gpu {
        build_entries_gpu(&frame, &rect, &params)?
    } else {
        let counter = cloud::count_colors(&frame, &rect);
        cloud::compact_grid(&counter)
    };

    let points: Vec<CloudPoint> = entries
        .iter()
        .map(|entry| {
            let code = entry.code();
            CloudPoint {
                code: format!(
                    "#{:02x}{:02x}{:02x}",
                    code & 0xff,
                    (code >> 8) & 0xff,
                    code >> 16
                ),
                count: entry.count(),
                position: cloud::cloud_position(code, params.color_space),
                scale: cloud::entry_scale(entry.count(), params.min_count, params.inv_max_count),
            }
        })
        .collect();

    let result = CloudResult {
        file: input.display().to_string(),
        rect: [rect.x, rect.y, rect.width, rect.height],
        color_space: format!("{:?}", params.color_space),
        backend: if use_gpu { "gpu" } else { "cpu" }.to_string(),
        entry_count: entries.len(),
        vertex_count: entries.len() * cloud::VERTS_PER_ENTRY as usize,
        mesh_workgroups: cloud::mesh_workgroups(entries.len() as u32),
        points,
    };

    if json_output {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize cloud: {}", e))?;
        println!("{}", json);
    } else {
        println!("Cloud for {} ({:?} space, {}):", result.file, params.color_space, result.backend);
        println!("  Rect: ({}, {}, {}, {})", rect.x, rect.y, rect.width, rect.height);
        println!("  Entries: {}", result.entry_count);
        println!("  Vertices: {}", result.vertex_count);
        println!("  Mesh workgroups: {}", result.mesh_workgroups);
    }

    if let Some(save_path) = save {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize cloud: {}", e))?;
        std::fs::write(&save_path, &json)
            .map_err(|e| format!("Failed to write cloud file: {}", e))?;
        if !json_output {
            println!("\nCloud saved to: {}", save_path.display());
        }
    }

    Ok(())
}

#[cfg(feature = "gpu")]
fn build_entries_gpu(
    frame: &chromascope_core::capture::Frame,
    rect: &CaptureRect,
    params: &CloudParams,
) -> Result<Vec<CloudEntry>, String> {
    use chromascope_core::gpu;

    let ctx = gpu::GpuContext::new().map_err(|e| e.to_string())?;
    let gpu_frame = gpu::GpuFrame::upload(&ctx, frame).map_err(|e| e.to_string())?;

    let counter = gpu::GpuCounter::new(&ctx);
    gpu::count_colors(&ctx, &gpu_frame, &counter, rect).map_err(|e| e.to_string())?;

    let cloud_buffers = gpu::GpuCloud::new(&ctx, rect.area().min(u32::MAX as u64) as u32);
    let stats = gpu::build_cloud(&ctx, &counter, &cloud_buffers, params).map_err(|e| e.to_string())?;

    cloud_buffers
        .download_entries(stats.entry_count)
        .map_err(|e| e.to_string())
}

#[cfg(not(feature = "gpu"))]
fn build_entries_gpu(
    _frame: &chromascope_core::capture::Frame,
    _rect: &CaptureRect,
    _params: &CloudParams,
) -> Result<Vec<CloudEntry>, String> {
    unreachable!("GPU path requested without GPU support")
}
