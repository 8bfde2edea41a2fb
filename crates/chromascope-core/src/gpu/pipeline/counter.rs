//! GPU color counting dispatch.

use super::{bind_buffers, COUNT_TILE};
use crate::capture::CaptureRect;
use crate::gpu::buffers::{create_uniform_buffer, CountParams, GpuCounter, GpuFrame};
use crate::gpu::context::{GpuContext, GpuError};
use crate::math::div_round_up;

/// Clear the counter table and count every pixel of `rect`.
///
/// One pass over one captured frame; the table is append-only until the next
/// call clears it again.
pub fn count_colors(
    ctx: &GpuContext,
    frame: &GpuFrame,
    counter: &GpuCounter,
    rect: &CaptureRect,
) -> Result<(), GpuError> {
    let rect = rect.clamped_to(frame.width, frame.height);

    let params = CountParams {
        rect_min: [rect.x, rect.y],
        rect_size: [rect.width, rect.height],
        frame_size: [frame.width, frame.height],
        _pad: [0, 0],
    };
    let uniform = create_uniform_buffer(&ctx.device, &params, "count_params");

    let bind_group = bind_buffers(
        &ctx.device,
        &ctx.pipelines.count_layout,
        "count_bind_group",
        &[&frame.buffer, &counter.buffer, &uniform],
    );

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("count_encoder"),
        });

    encoder.clear_buffer(&counter.buffer, 0, None);

    if !rect.is_empty() {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("count_pass"),
            timestamp_writes: None,
        });

        pass.set_pipeline(&ctx.pipelines.count_colors);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(
            div_round_up(rect.width, COUNT_TILE),
            div_round_up(rect.height, COUNT_TILE),
            1,
        );
    }

    ctx.submit_and_wait(encoder);
    Ok(())
}
