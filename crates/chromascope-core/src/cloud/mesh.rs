//! CloudMeshGenerator: one frequency-scaled, color-space-positioned quad per
//! compacted entry.

use bytemuck::{Pod, Zeroable};

use super::CloudEntry;
use crate::color::{normalized_rgb, rgb_to_chroma_hsl};
use crate::math::lerp;
use crate::models::{CloudParams, ColorSpace};

/// Smallest point scale, applied at and below the minimum count threshold.
pub const SCALE_MIN: f32 = 0.0005;

/// Largest point scale, applied once the count saturates the rate.
pub const SCALE_MAX: f32 = 0.1;

/// Corner offsets of the two triangles forming a quad. The offsets also ride
/// along on each vertex so the rasterizer can clip the quad to a disc.
pub const QUAD_OFFSETS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// One vertex of the generated point cloud, laid out as in the mesh shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CloudVertex {
    /// Projected corner position.
    pub position: [f32; 3],
    /// Packed flat color (code | alpha in the high byte).
    pub color: u32,
    /// Unit-square corner offset for disc clipping.
    pub offset: [f32; 2],
}

/// Color-space position of a code, before projection.
///
/// Cube: 1.25 * (rgb - 0.5). Cylinder: hue maps to the angle, lightness
/// (remapped to -1..1) to the vertical axis and chroma to the radius; the
/// (s, l) pair is scaled by n = (s + |l|) / sqrt(s^2 + l^2) when the
/// denominator is positive, which carries the HSL bicone surface onto the
/// unit cylinder instead of clipping against it.
pub fn cloud_position(code: u32, space: ColorSpace) -> [f32; 3] {
    let [r, g, b] = normalized_rgb(code);

    match space {
        ColorSpace::Cube => [1.25 * (r - 0.5), 1.25 * (g - 0.5), 1.25 * (b - 0.5)],
        ColorSpace::Cylinder => {
            let (hue, saturation, lightness) = rgb_to_chroma_hsl(r, g, b);

            let h = 2.0 * std::f32::consts::PI * hue;
            let mut s = saturation;
            let mut l = 2.0 * lightness - 1.0;

            let a = s + l.abs();
            let b = (s * s + l * l).sqrt();
            if b > 0.0 {
                let n = a / b;
                s *= n;
                l *= n;
            }

            let (sin, cos) = h.sin_cos();
            [s * cos, l, -s * sin]
        }
    }
}

/// Point scale for a count: sub-linear growth with frequency, bounded on
/// both ends.
pub fn entry_scale(count: u32, min_count: u32, inv_max_count: f32) -> f32 {
    let rate = ((count as f32 - min_count as f32) * inv_max_count).clamp(0.0, 1.0);
    lerp(SCALE_MIN, SCALE_MAX, rate.sqrt())
}

/// Generate the quad vertices for a compacted entry stream.
///
/// Each entry yields 6 vertices (two triangles) centered at the projected
/// color-space position, with corners displaced by the scaled unit-square
/// offsets in the projected XY plane.
pub fn generate_mesh(entries: &[CloudEntry], params: &CloudParams) -> Vec<CloudVertex> {
    let mut vertices = Vec::with_capacity(entries.len() * QUAD_OFFSETS.len());

    for entry in entries {
        let code = entry.code();
        let center = params
            .projection
            .transform_point(cloud_position(code, params.color_space));
        let scale = entry_scale(entry.count(), params.min_count, params.inv_max_count);
        let color = code | 0xff00_0000;

        for offset in QUAD_OFFSETS {
            vertices.push(CloudVertex {
                position: [
                    center[0] + offset[0] * scale,
                    center[1] + offset[1] * scale,
                    center[2],
                ],
                color,
                offset,
            });
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureRect;

    const EPS: f32 = 1e-5;

    fn entry(code: u32, count: u32) -> CloudEntry {
        let cell = crate::cloud::cell_of_code(code);
        let (cx, cy, cz) = crate::cloud::cell_coords(cell);
        CloudEntry {
            packed: (count << 9) | crate::cloud::cell_index_of_code(code),
            base_code: crate::cloud::cell_base_code(cx, cy, cz),
        }
    }

    #[test]
    fn test_cube_position_of_pure_red() {
        let p = cloud_position(0x0000ff, ColorSpace::Cube);
        assert!((p[0] - 0.625).abs() < EPS);
        assert!((p[1] + 0.625).abs() < EPS);
        assert!((p[2] + 0.625).abs() < EPS);
    }

    #[test]
    fn test_cylinder_position_of_pure_red() {
        // Red: hue 0, chroma 1, mid lightness -> on the equator at angle 0.
        let p = cloud_position(0x0000ff, ColorSpace::Cylinder);
        assert!((p[0] - 1.0).abs() < EPS);
        assert!(p[1].abs() < EPS);
        assert!(p[2].abs() < 1e-4);
    }

    #[test]
    fn test_cylinder_poles() {
        let black = cloud_position(0x000000, ColorSpace::Cylinder);
        assert!((black[1] + 1.0).abs() < EPS);
        assert!(black[0].abs() < EPS && black[2].abs() < EPS);

        let white = cloud_position(0xffffff, ColorSpace::Cylinder);
        assert!((white[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cylinder_stays_inside_unit_cylinder() {
        // Sweep a sample of codes; radius and |height| must stay bounded.
        for code in (0..0xffffffu32).step_by(37_117) {
            let p = cloud_position(code, ColorSpace::Cylinder);
            let radius = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!(radius <= 1.0 + 1e-4, "radius {} for code {:#x}", radius, code);
            assert!(p[1].abs() <= 1.0 + 1e-4, "height {} for code {:#x}", p[1], code);
        }
    }

    #[test]
    fn test_scale_bounds_and_monotonicity() {
        let inv_max = 1.0 / 100.0;
        assert!((entry_scale(0, 0, inv_max) - SCALE_MIN).abs() < EPS);
        assert!((entry_scale(1_000_000, 0, inv_max) - SCALE_MAX).abs() < EPS);
        assert!(entry_scale(10, 0, inv_max) > entry_scale(1, 0, inv_max));
        assert!(entry_scale(1, 0, inv_max) >= SCALE_MIN);
    }

    #[test]
    fn test_scale_below_min_count_clamps_to_floor() {
        assert_eq!(entry_scale(3, 10, 0.01), SCALE_MIN);
    }

    #[test]
    fn test_generation_determinism() {
        let params = CloudParams::for_rect(ColorSpace::Cylinder, &CaptureRect::new(0, 0, 64, 64));
        let entries = [entry(0x123456, 7), entry(0x00ff00, 3)];
        assert_eq!(
            generate_mesh(&entries, &params),
            generate_mesh(&entries, &params)
        );
    }

    #[test]
    fn test_single_entry_quad() {
        let params = CloudParams::for_rect(ColorSpace::Cube, &CaptureRect::new(0, 0, 4, 4));
        let vertices = generate_mesh(&[entry(0x0000ff, 16)], &params);
        assert_eq!(vertices.len(), 6);

        let scale = entry_scale(16, params.min_count, params.inv_max_count);
        for (v, offset) in vertices.iter().zip(QUAD_OFFSETS) {
            assert!((v.position[0] - (0.625 + offset[0] * scale)).abs() < EPS);
            assert!((v.position[1] - (-0.625 + offset[1] * scale)).abs() < EPS);
            assert!((v.position[2] + 0.625).abs() < EPS);
            assert_eq!(v.offset, offset);
            assert_eq!(v.color, 0xff0000ff);
        }
    }

    #[test]
    fn test_two_counts_two_quads_ordered_scales() {
        let params = CloudParams::for_rect(ColorSpace::Cube, &CaptureRect::new(0, 0, 64, 64));
        let entries = [entry(0x000001, 10), entry(0x000002, 1)];
        let vertices = generate_mesh(&entries, &params);
        assert_eq!(vertices.len(), 12);

        // Quad half-extent equals the scale; recover it from corner spread.
        let extent = |quad: &[CloudVertex]| -> f32 {
            let xs: Vec<f32> = quad.iter().map(|v| v.position[0]).collect();
            (xs.iter().cloned().fold(f32::MIN, f32::max)
                - xs.iter().cloned().fold(f32::MAX, f32::min))
                / 2.0
        };

        let s10 = extent(&vertices[..6]);
        let s1 = extent(&vertices[6..]);
        assert!(s10 > s1);
        assert!(s1 >= SCALE_MIN - EPS);
    }
}
