//! WGSL shader sources embedded at compile time.

/// Container for all shader source code.
pub struct Shaders;

impl Shaders {
    /// Per-pixel color counting with group-level dedup.
    pub const COLOR_COUNT: &'static str = include_str!("color_count.wgsl");

    /// Per-cell compaction of the counter table.
    pub const CLOUD_COMPACT: &'static str = include_str!("cloud_compact.wgsl");

    /// Finalize step publishing the indirect dispatch and draw args.
    pub const CLOUD_FINALIZE: &'static str = include_str!("cloud_finalize.wgsl");

    /// Quad generation from the compacted entry stream.
    pub const CLOUD_MESH: &'static str = include_str!("cloud_mesh.wgsl");

    /// Four-mode histogram accumulation using atomics.
    pub const HISTOGRAM: &'static str = include_str!("histogram.wgsl");
}
