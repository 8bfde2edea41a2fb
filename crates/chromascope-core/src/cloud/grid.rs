//! Reference wireframe grids situating the cloud in its color space.
//!
//! Line-list geometry for the rasterizing collaborator: the RGB cube's 12
//! edges and an HSL cylinder net (hue spokes across the lightness range plus
//! the saturated equator). Positions use the same mappings as the mesh
//! generator, so the grids frame the cloud exactly.

use core::f32::consts::PI;

/// One wireframe vertex: color-space position plus display color.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl GridVertex {
    fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Line list for the RGB cube's 12 edges, each endpoint colored by its own
/// RGB value.
pub fn rgb_grid() -> Vec<GridVertex> {
    fn rgb_position(r: f32, g: f32, b: f32) -> [f32; 3] {
        [1.25 * (r - 0.5), 1.25 * (g - 0.5), 1.25 * (b - 0.5)]
    }

    fn rgb_vertex(r: f32, g: f32, b: f32) -> GridVertex {
        GridVertex::new(rgb_position(r, g, b), [r, g, b])
    }

    let v0 = rgb_vertex(0.0, 0.0, 0.0);
    let r = rgb_vertex(1.0, 0.0, 0.0);
    let g = rgb_vertex(0.0, 1.0, 0.0);
    let b = rgb_vertex(0.0, 0.0, 1.0);
    let rg = rgb_vertex(1.0, 1.0, 0.0);
    let rb = rgb_vertex(1.0, 0.0, 1.0);
    let gb = rgb_vertex(0.0, 1.0, 1.0);
    let v1 = rgb_vertex(1.0, 1.0, 1.0);

    vec![
        v0, r, v0, g, v0, b, r, rg, r, rb, g, rg, g, gb, b, rb, b, gb, rg, v1, rb, v1, gb, v1,
    ]
}

/// Line list for the HSL cylinder net: `n_hue` spokes swept over `n_div`
/// lightness steps, plus the fully saturated equator.
pub fn hsl_grid(n_hue: u32, n_div: u32) -> Vec<GridVertex> {
    fn hsl_to_position(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
        let h = 2.0 * PI * hue;
        let mut s = saturation;
        let mut l = 2.0 * lightness - 1.0;

        let a = s + l.abs();
        let b = (s * s + l * l).sqrt();
        if b > 0.0 {
            let n = a / b;
            s *= n;
            l *= n;
        }

        let y = l;

        let (mut z, mut x) = h.sin_cos();
        x *= s;
        z *= s;

        [x, y, -z]
    }

    fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
        let max = lightness + saturation / 2.0;
        let min = lightness - saturation / 2.0;
        let del = max - min;

        let hue = 360.0 * hue;
        if hue < 60.0 {
            [max, min + del * hue / 60.0, min]
        } else if hue < 120.0 {
            [min + del * (120.0 - hue) / 60.0, max, min]
        } else if hue < 180.0 {
            [min, max, min + del * (hue - 120.0) / 60.0]
        } else if hue < 240.0 {
            [min, min + del * (240.0 - hue) / 60.0, max]
        } else if hue < 300.0 {
            [min + del * (hue - 240.0) / 60.0, min, max]
        } else {
            [max, min, min + del * (360.0 - hue) / 60.0]
        }
    }

    fn hsl_vertex(hue: f32, saturation: f32, lightness: f32) -> GridVertex {
        GridVertex::new(
            hsl_to_position(hue, saturation, lightness),
            hsl_to_rgb(hue, saturation, lightness),
        )
    }

    let n_edge = n_hue * n_div + 2 * n_div;
    let n_vertices = 2 * n_edge;
    let mut vertices = Vec::with_capacity(n_vertices as usize);

    // Vertical axis through the achromatic line
    vertices.push(hsl_vertex(0.0, 0.0, 0.0));
    vertices.push(hsl_vertex(0.0, 0.0, 1.0));

    // One spoke per hue, following the saturated surface across lightness
    for hue in 0..n_hue {
        for i in 1..=n_div {
            vertices.push(if i == 1 {
                hsl_vertex(0.0, 0.0, 0.0)
            } else {
                *vertices.last().unwrap()
            });

            let hue = hue as f32 / n_hue as f32;
            let lightness = i as f32 / n_div as f32;
            let saturation = 1.0 - 2.0 * (lightness - 0.5).abs();
            vertices.push(hsl_vertex(hue, saturation, lightness));
        }
    }

    // The fully saturated equator
    for i in 1..=(2 * n_div) {
        vertices.push(if i == 1 {
            hsl_vertex(0.0, 1.0, 0.5)
        } else {
            *vertices.last().unwrap()
        });

        let hue = i as f32 / (2 * n_div) as f32;
        vertices.push(hsl_vertex(hue, 1.0, 0.5));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_grid_spans_cube() {
        let grid = rgb_grid();
        // 12 edges as a line list
        assert_eq!(grid.len(), 24);

        for v in &grid {
            for c in v.position {
                assert!((c - 0.625).abs() < 1e-6 || (c + 0.625).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_hsl_grid_inside_unit_cylinder() {
        let grid = hsl_grid(6, 48);
        assert!(!grid.is_empty());

        for v in &grid {
            let radius = (v.position[0] * v.position[0] + v.position[2] * v.position[2]).sqrt();
            assert!(radius <= 1.0 + 1e-4);
            assert!(v.position[1].abs() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_hsl_grid_line_list_is_even() {
        let grid = hsl_grid(6, 48);
        assert_eq!(grid.len() % 2, 0);
    }
}
