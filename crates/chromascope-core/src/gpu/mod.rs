//! GPU implementations of the analysis kernels using wgpu (WebGPU).
//!
//! Supports Metal on macOS, Vulkan on Linux/Windows, and DX12 on Windows.
//! The whole counting → compaction → mesh-generation chain runs on-device;
//! only the small meta counters and (on request) the result buffers are
//! read back.
//!
//! # Usage
//!
//! The GPU backend is enabled via the `gpu` feature flag (on by default):
//!
//! ```toml
//! [dependencies]
//! chromascope-core = { version = "0.1", features = ["gpu"] }
//! ```

mod buffers;
mod context;
mod pipeline;
mod shaders;

pub use buffers::{GpuCloud, GpuCounter, GpuFrame, GpuHistogram};
pub use context::{GpuContext, GpuError};
pub use pipeline::{accumulate_histogram, build_cloud, count_colors, CloudStats};

/// Check if GPU acceleration is available on this system.
pub fn is_gpu_available() -> bool {
    GpuContext::is_available()
}

/// Get information about the available GPU device.
pub fn gpu_info() -> Option<String> {
    GpuContext::device_info()
}
