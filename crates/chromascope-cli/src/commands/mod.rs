//! CLI command implementations.

mod analyze;
mod cloud;

pub use analyze::cmd_analyze;
pub use cloud::cmd_cloud;

use chromascope_core::capture::{CaptureRect, Frame};

/// Resolve the effective capture rectangle for a frame.
pub(crate) fn resolve_rect(frame: &Frame, rect: Option<CaptureRect>) -> CaptureRect {
    rect.map(|r| r.clamped_to(frame.width, frame.height))
        .unwrap_or_else(|| CaptureRect::full(frame))
}

/// Whether the GPU path should run, honoring availability.
pub(crate) fn use_gpu(requested: bool) -> bool {
    if !requested {
        return false;
    }

    #[cfg(feature = "gpu")]
    {
        if chromascope_core::is_gpu_available() {
            return true;
        }
        log::warn!("GPU requested but no adapter is available, falling back to CPU");
    }

    #[cfg(not(feature = "gpu"))]
    log::warn!("GPU requested but this build has no GPU support, falling back to CPU");

    false
}
