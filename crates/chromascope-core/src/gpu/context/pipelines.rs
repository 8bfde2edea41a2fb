//! Compute pipeline creation for GPU operations.

use crate::gpu::shaders::Shaders;

/// Pre-compiled compute pipelines for all GPU operations.
pub struct GpuPipelines {
    // Cloud pipeline stages
    pub count_colors: wgpu::ComputePipeline,
    pub cloud_compact: wgpu::ComputePipeline,
    pub cloud_finalize: wgpu::ComputePipeline,
    pub cloud_mesh: wgpu::ComputePipeline,

    // Histogram accumulation
    pub histogram: wgpu::ComputePipeline,

    // Cached bind group layouts
    pub count_layout: wgpu::BindGroupLayout,
    pub compact_layout: wgpu::BindGroupLayout,
    pub finalize_layout: wgpu::BindGroupLayout,
    pub mesh_layout: wgpu::BindGroupLayout,
    pub histogram_layout: wgpu::BindGroupLayout,
}

/// Create all compute pipelines from shader sources.
pub fn create_pipelines(device: &wgpu::Device) -> GpuPipelines {
    let count_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("color_count"),
        source: wgpu::ShaderSource::Wgsl(Shaders::COLOR_COUNT.into()),
    });

    let compact_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("cloud_compact"),
        source: wgpu::ShaderSource::Wgsl(Shaders::CLOUD_COMPACT.into()),
    });

    let finalize_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("cloud_finalize"),
        source: wgpu::ShaderSource::Wgsl(Shaders::CLOUD_FINALIZE.into()),
    });

    let mesh_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("cloud_mesh"),
        source: wgpu::ShaderSource::Wgsl(Shaders::CLOUD_MESH.into()),
    });

    let histogram_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("histogram"),
        source: wgpu::ShaderSource::Wgsl(Shaders::HISTOGRAM.into()),
    });

    // Bind group layouts: storage buffers plus a trailing uniform where the
    // kernel takes parameters.
    let count_layout = create_layout(
        device,
        "count_layout",
        &[
            BufferSlot::ReadOnly,
            BufferSlot::ReadWrite,
            BufferSlot::Uniform,
        ],
    );
    let compact_layout = create_layout(
        device,
        "compact_layout",
        &[
            BufferSlot::ReadOnly,
            BufferSlot::ReadWrite,
            BufferSlot::ReadWrite,
        ],
    );
    let finalize_layout = create_layout(
        device,
        "finalize_layout",
        &[
            BufferSlot::ReadWrite,
            BufferSlot::ReadWrite,
            BufferSlot::ReadWrite,
        ],
    );
    let mesh_layout = create_layout(
        device,
        "mesh_layout",
        &[
            BufferSlot::ReadOnly,
            BufferSlot::ReadOnly,
            BufferSlot::ReadWrite,
            BufferSlot::Uniform,
        ],
    );
    let histogram_layout = create_layout(
        device,
        "histogram_layout",
        &[
            BufferSlot::ReadOnly,
            BufferSlot::ReadWrite,
            BufferSlot::ReadWrite,
            BufferSlot::ReadWrite,
            BufferSlot::ReadWrite,
            BufferSlot::Uniform,
        ],
    );

    let count_colors = create_compute_pipeline(
        device,
        "count_colors",
        &count_layout,
        &count_module,
        "count_colors",
    );
    let cloud_compact = create_compute_pipeline(
        device,
        "cloud_compact",
        &compact_layout,
        &compact_module,
        "compact_cells",
    );
    let cloud_finalize = create_compute_pipeline(
        device,
        "cloud_finalize",
        &finalize_layout,
        &finalize_module,
        "finalize_cloud",
    );
    let cloud_mesh = create_compute_pipeline(
        device,
        "cloud_mesh",
        &mesh_layout,
        &mesh_module,
        "generate_cloud_mesh",
    );
    let histogram = create_compute_pipeline(
        device,
        "histogram",
        &histogram_layout,
        &histogram_module,
        "accumulate_histogram",
    );

    GpuPipelines {
        count_colors,
        cloud_compact,
        cloud_finalize,
        cloud_mesh,
        histogram,
        count_layout,
        compact_layout,
        finalize_layout,
        mesh_layout,
        histogram_layout,
    }
}

/// Binding shapes used by the kernels.
#[derive(Clone, Copy)]
enum BufferSlot {
    ReadOnly,
    ReadWrite,
    Uniform,
}

/// Create a bind group layout from an ordered list of buffer slots.
fn create_layout(
    device: &wgpu::Device,
    label: &str,
    slots: &[BufferSlot],
) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = slots
        .iter()
        .enumerate()
        .map(|(i, slot)| wgpu::BindGroupLayoutEntry {
            binding: i as u32,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: match slot {
                    BufferSlot::ReadOnly => wgpu::BufferBindingType::Storage { read_only: true },
                    BufferSlot::ReadWrite => wgpu::BufferBindingType::Storage { read_only: false },
                    BufferSlot::Uniform => wgpu::BufferBindingType::Uniform,
                },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
        .collect();

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

/// Create a compute pipeline with the given parameters.
fn create_compute_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        module,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}
