//! GPU buffer management for frames, counters, cloud stages, and histograms.

use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use wgpu::{self, util::DeviceExt};

use super::context::{GpuContext, GpuError};
use crate::capture::Frame;
use crate::cloud::{CloudEntry, CloudVertex, VERTS_PER_ENTRY};
use crate::color::CODE_SPACE;
use crate::histogram::{HISTOGRAM_BINS, HISTOGRAM_CHANNELS};

/// GPU-resident captured frame (packed `u32` pixels).
pub struct GpuFrame {
    pub(crate) buffer: wgpu::Buffer,
    pub width: u32,
    pub height: u32,
}

impl GpuFrame {
    /// Upload a frame's pixels.
    pub fn upload(ctx: &GpuContext, frame: &Frame) -> Result<Self, GpuError> {
        if frame.pixels.len() != (frame.width * frame.height) as usize {
            return Err(GpuError::BufferError(format!(
                "Frame size mismatch: expected {}, got {}",
                frame.width * frame.height,
                frame.pixels.len()
            )));
        }

        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gpu_frame"),
            contents: bytemuck::cast_slice(&frame.pixels),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            buffer,
            width: frame.width,
            height: frame.height,
        })
    }
}

/// The 2^24-entry counter table.
pub struct GpuCounter {
    pub(crate) buffer: wgpu::Buffer,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl GpuCounter {
    pub fn new(ctx: &GpuContext) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("color_counters"),
            size: (CODE_SPACE * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            device,
            queue,
        }
    }

    /// The raw counter table, for inspection by collaborators.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Download a contiguous range of counters, `[first_code, first_code + len)`.
    pub fn download_range(&self, first_code: u32, len: usize) -> Result<Vec<u32>, GpuError> {
        let offset = first_code as u64 * 4;
        download_slice(&self.device, &self.queue, &self.buffer, offset, len * 4)
    }
}

/// Buffers of the compaction → mesh-generation chain.
pub struct GpuCloud {
    pub(crate) entries: wgpu::Buffer,
    pub(crate) meta: wgpu::Buffer,
    pub(crate) dispatch_args: wgpu::Buffer,
    pub(crate) draw_args: wgpu::Buffer,
    pub(crate) vertices: wgpu::Buffer,
    pub entry_capacity: u32,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl GpuCloud {
    /// Allocate for up to `entry_capacity` compacted entries.
    ///
    /// Distinct colors never exceed the sampled pixel count, so
    /// `min(pixels, 2^24)` is an exact bound; callers may budget lower and
    /// accept stream truncation.
    pub fn new(ctx: &GpuContext, entry_capacity: u32) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let entry_capacity = entry_capacity.clamp(1, CODE_SPACE as u32);

        let entries = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloud_entries"),
            size: entry_capacity as u64 * 8,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let meta = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cloud_meta"),
            contents: bytemuck::cast_slice(&[0u32, entry_capacity, 0, 0]),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
        });

        let dispatch_args = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloud_dispatch_args"),
            size: 12,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::INDIRECT,
            mapped_at_creation: false,
        });

        let draw_args = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloud_draw_args"),
            size: 16,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloud_vertices"),
            size: entry_capacity as u64
                * VERTS_PER_ENTRY as u64
                * std::mem::size_of::<CloudVertex>() as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        Self {
            entries,
            meta,
            dispatch_args,
            draw_args,
            vertices,
            entry_capacity,
            device,
            queue,
        }
    }

    /// Reset the stream total for the next pass.
    pub(crate) fn reset(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.clear_buffer(&self.meta, 0, Some(4));
    }

    /// The generated vertex buffer, for the rasterizing collaborator.
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertices
    }

    /// Indirect draw arguments sized by the finalize step.
    pub fn indirect_draw_buffer(&self) -> &wgpu::Buffer {
        &self.draw_args
    }

    /// Download the live entry count.
    pub fn download_entry_count(&self) -> Result<u32, GpuError> {
        let words: Vec<u32> = download_slice(&self.device, &self.queue, &self.meta, 0, 4)?;
        Ok(words[0])
    }

    /// Download the first `count` compacted entries.
    pub fn download_entries(&self, count: u32) -> Result<Vec<CloudEntry>, GpuError> {
        let count = count.min(self.entry_capacity) as usize;
        let words: Vec<[u32; 2]> =
            download_slice(&self.device, &self.queue, &self.entries, 0, count * 8)?;
        Ok(words
            .into_iter()
            .map(|[packed, base_code]| CloudEntry { packed, base_code })
            .collect())
    }

    /// Download the generated vertices for `entry_count` entries.
    pub fn download_vertices(&self, entry_count: u32) -> Result<Vec<CloudVertex>, GpuError> {
        let verts = entry_count.min(self.entry_capacity) as usize * VERTS_PER_ENTRY as usize;
        download_slice(
            &self.device,
            &self.queue,
            &self.vertices,
            0,
            verts * std::mem::size_of::<CloudVertex>(),
        )
    }
}

/// GPU histogram tables, one buffer per channel.
pub struct GpuHistogram {
    pub(crate) buffers: [wgpu::Buffer; HISTOGRAM_CHANNELS],
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl GpuHistogram {
    /// Create new histogram buffers (initialized to zero).
    pub fn new(ctx: &GpuContext) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();
        let buffers = std::array::from_fn(|i| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("histogram_{}", i)),
                size: (HISTOGRAM_BINS * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        Self {
            buffers,
            device,
            queue,
        }
    }

    /// One channel's bin table, for the rendering collaborator.
    pub fn channel_buffer(&self, channel: usize) -> &wgpu::Buffer {
        &self.buffers[channel]
    }

    /// Download all four channel tables.
    pub fn download(&self) -> Result<[Vec<u32>; HISTOGRAM_CHANNELS], GpuError> {
        let mut out: [Vec<u32>; HISTOGRAM_CHANNELS] = Default::default();
        for (buffer, slot) in self.buffers.iter().zip(out.iter_mut()) {
            *slot = download_slice(&self.device, &self.queue, buffer, 0, HISTOGRAM_BINS * 4)?;
        }
        Ok(out)
    }
}

// Parameter structures for uniform buffers.
// These must match the WGSL struct layouts exactly.

/// Counting parameters.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CountParams {
    pub rect_min: [u32; 2],
    pub rect_size: [u32; 2],
    pub frame_size: [u32; 2],
    pub _pad: [u32; 2],
}

/// Mesh generation parameters.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct MeshParams {
    /// First three rows of the placement transform.
    pub projection: [f32; 12],
    pub min_count: u32,
    pub inv_max_count: f32,
    pub color_space: u32,
    pub _pad: u32,
}

/// Histogram parameters.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct HistogramParams {
    pub rect_min: [u32; 2],
    pub rect_size: [u32; 2],
    pub frame_size: [u32; 2],
    pub mode: u32,
    pub channels: u32,
}

/// Create a uniform buffer from parameter data.
pub fn create_uniform_buffer<T: Pod>(device: &wgpu::Device, data: &T, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(data),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Copy a buffer range into a staging buffer, map it, and read it back.
pub(crate) fn download_slice<T: Pod>(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    source: &wgpu::Buffer,
    offset: u64,
    size_bytes: usize,
) -> Result<Vec<T>, GpuError> {
    if size_bytes == 0 {
        return Ok(Vec::new());
    }

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("staging_readback"),
        size: size_bytes as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("download_encoder"),
    });
    encoder.copy_buffer_to_buffer(source, offset, &staging, 0, size_bytes as u64);
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();

    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        // Ignore send error - if the receiver is dropped, recv() fails below
        let _ = tx.send(result);
    });

    device.poll(wgpu::Maintain::Wait);

    rx.recv()
        .map_err(|e| GpuError::BufferError(e.to_string()))?
        .map_err(|e| GpuError::BufferError(e.to_string()))?;

    let data = buffer_slice.get_mapped_range();
    let result: Vec<T> = bytemuck::cast_slice(&data).to_vec();

    drop(data);
    staging.unmap();

    Ok(result)
}
