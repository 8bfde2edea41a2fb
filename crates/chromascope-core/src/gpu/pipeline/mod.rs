//! GPU pipeline orchestration for the analysis kernels.

mod cloud;
mod counter;
mod histogram;

pub use cloud::{build_cloud, CloudStats};
pub use counter::count_colors;
pub use histogram::accumulate_histogram;

/// Pixels covered per counting workgroup axis (8x8 lanes, one pixel each).
pub(crate) const COUNT_TILE: u32 = 8;

/// Pixels covered per histogram workgroup axis (8x8 lanes, 2x2 samples each).
pub(crate) const HISTOGRAM_TILE: u32 = 16;

/// Build a bind group over a layout from ordered entire-buffer bindings.
pub(crate) fn bind_buffers(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &'static str,
    buffers: &[&wgpu::Buffer],
) -> wgpu::BindGroup {
    let entries: Vec<wgpu::BindGroupEntry> = buffers
        .iter()
        .enumerate()
        .map(|(i, buffer)| wgpu::BindGroupEntry {
            binding: i as u32,
            resource: buffer.as_entire_binding(),
        })
        .collect();

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}
