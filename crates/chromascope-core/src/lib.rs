//! Chromascope Core Library
//!
//! Core functionality for reducing a captured desktop frame into color
//! statistics: an exact frequency table over the 24-bit RGB color space, a
//! compacted, frequency-scaled color point cloud positioned in a chosen
//! color-space projection, and per-channel 256-bin histograms.
//!
//! Every kernel exists twice: a CPU reference implementation (the semantic
//! oracle, used by the test suite and as a fallback) and a wgpu compute
//! implementation behind the `gpu` feature.

pub mod capture;
pub mod cloud;
pub mod color;
pub mod config;
pub mod histogram;
pub mod math;
pub mod models;

// GPU acceleration module (optional, enabled with the "gpu" feature)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export commonly used types
pub use capture::{CaptureRect, Frame};
pub use cloud::{CloudEntry, CloudVertex, CounterBuffer};
pub use histogram::HistogramBins;
pub use models::{CloudParams, ColorSpace, HistogramMode};

// Re-export GPU functions when available
#[cfg(feature = "gpu")]
pub use gpu::{gpu_info, is_gpu_available};
