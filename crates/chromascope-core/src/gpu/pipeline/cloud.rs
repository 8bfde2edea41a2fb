//! GPU compaction and mesh generation dispatch.
//!
//! The three stages run back-to-back in one compute pass: compaction over
//! all 32^3 cells, the single-lane finalize writing the indirect args, and
//! the indirectly dispatched mesh generation. The hand-off is one-shot: the
//! mesh stage observes the fully published entry stream and never signals
//! back.

use super::bind_buffers;
use crate::cloud::{CELL_GRID, MESH_BATCH, VERTS_PER_ENTRY};
use crate::gpu::buffers::{create_uniform_buffer, GpuCloud, GpuCounter, MeshParams};
use crate::gpu::context::{GpuContext, GpuError};
use crate::models::CloudParams;

/// Result of one cloud build.
#[derive(Debug, Clone, Copy)]
pub struct CloudStats {
    /// Live compacted entries (one quad each).
    pub entry_count: u32,
    /// Vertices the draw args cover.
    pub vertex_count: u32,
    /// Mesh workgroups the finalize step dispatched.
    pub mesh_workgroups: u32,
}

/// Compact the counter table and generate the point-cloud mesh.
///
/// Consumes the counter table produced by [`super::count_colors`]; the
/// vertex buffer and indirect draw args are left on-device for the
/// rasterizing collaborator.
pub fn build_cloud(
    ctx: &GpuContext,
    counter: &GpuCounter,
    cloud: &GpuCloud,
    params: &CloudParams,
) -> Result<CloudStats, GpuError> {
    let mesh_params = MeshParams {
        projection: params.projection.as_4x3(),
        min_count: params.min_count,
        inv_max_count: params.inv_max_count,
        color_space: params.color_space.shader_index(),
        _pad: 0,
    };
    let uniform = create_uniform_buffer(&ctx.device, &mesh_params, "mesh_params");

    let compact_bind = bind_buffers(
        &ctx.device,
        &ctx.pipelines.compact_layout,
        "compact_bind_group",
        &[&counter.buffer, &cloud.entries, &cloud.meta],
    );
    let finalize_bind = bind_buffers(
        &ctx.device,
        &ctx.pipelines.finalize_layout,
        "finalize_bind_group",
        &[&cloud.meta, &cloud.dispatch_args, &cloud.draw_args],
    );
    let mesh_bind = bind_buffers(
        &ctx.device,
        &ctx.pipelines.mesh_layout,
        "mesh_bind_group",
        &[&cloud.entries, &cloud.meta, &cloud.vertices, &uniform],
    );

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cloud_encoder"),
        });

    cloud.reset(&mut encoder);

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("cloud_pass"),
            timestamp_writes: None,
        });

        pass.set_pipeline(&ctx.pipelines.cloud_compact);
        pass.set_bind_group(0, &compact_bind, &[]);
        pass.dispatch_workgroups(CELL_GRID, CELL_GRID, CELL_GRID);

        pass.set_pipeline(&ctx.pipelines.cloud_finalize);
        pass.set_bind_group(0, &finalize_bind, &[]);
        pass.dispatch_workgroups(1, 1, 1);

        pass.set_pipeline(&ctx.pipelines.cloud_mesh);
        pass.set_bind_group(0, &mesh_bind, &[]);
        pass.dispatch_workgroups_indirect(&cloud.dispatch_args, 0);
    }

    ctx.submit_and_wait(encoder);

    let entry_count = cloud.download_entry_count()?;
    Ok(CloudStats {
        entry_count,
        vertex_count: entry_count * VERTS_PER_ENTRY,
        mesh_workgroups: entry_count.div_ceil(MESH_BATCH),
    })
}
