//! GPU histogram dispatch.

use super::{bind_buffers, HISTOGRAM_TILE};
use crate::capture::CaptureRect;
use crate::gpu::buffers::{create_uniform_buffer, GpuFrame, GpuHistogram, HistogramParams};
use crate::gpu::context::{GpuContext, GpuError};
use crate::math::div_round_up;
use crate::models::HistogramMode;

/// Clear the histogram tables and accumulate one pass over `rect`.
pub fn accumulate_histogram(
    ctx: &GpuContext,
    frame: &GpuFrame,
    histogram: &GpuHistogram,
    rect: &CaptureRect,
    mode: HistogramMode,
) -> Result<(), GpuError> {
    let rect = rect.clamped_to(frame.width, frame.height);

    let params = HistogramParams {
        rect_min: [rect.x, rect.y],
        rect_size: [rect.width, rect.height],
        frame_size: [frame.width, frame.height],
        mode: mode.shader_index(),
        channels: mode.channel_count() as u32,
    };
    let uniform = create_uniform_buffer(&ctx.device, &params, "histogram_params");

    let bind_group = bind_buffers(
        &ctx.device,
        &ctx.pipelines.histogram_layout,
        "histogram_bind_group",
        &[
            &frame.buffer,
            &histogram.buffers[0],
            &histogram.buffers[1],
            &histogram.buffers[2],
            &histogram.buffers[3],
            &uniform,
        ],
    );

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("histogram_encoder"),
        });

    for buffer in &histogram.buffers {
        encoder.clear_buffer(buffer, 0, None);
    }

    if !rect.is_empty() {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("histogram_pass"),
            timestamp_writes: None,
        });

        pass.set_pipeline(&ctx.pipelines.histogram);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(
            div_round_up(rect.width, HISTOGRAM_TILE),
            div_round_up(rect.height, HISTOGRAM_TILE),
            1,
        );
    }

    ctx.submit_and_wait(encoder);
    Ok(())
}
