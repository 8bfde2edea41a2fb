//! Minimal column-major matrix math for cloud placement.
//!
//! The projection handed to the mesh generator is a 4x4 transform flattened
//! to its first three rows (`as_4x3`), the layout the mesh shader consumes.

pub fn div_round_up(num: u32, div: u32) -> u32 {
    num.div_ceil(div)
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[repr(transparent)]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Vec4(pub [f32; 4]);

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.0[0] * other.0[0]
            + self.0[1] * other.0[1]
            + self.0[2] * other.0[2]
            + self.0[3] * other.0[3]
    }
}

impl std::ops::Index<usize> for Vec4 {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<usize> for Vec4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

/// Column-major 4x4 matrix.
#[repr(transparent)]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Matrix(pub [Vec4; 4]);

impl Matrix {
    pub fn new(col0: Vec4, col1: Vec4, col2: Vec4, col3: Vec4) -> Self {
        Self([col0, col1, col2, col3])
    }

    pub fn zero() -> Self {
        Self::new(Vec4::zero(), Vec4::zero(), Vec4::zero(), Vec4::zero())
    }

    pub fn identity() -> Self {
        Self::new(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn rot_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();

        Self::new(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, c, -s, 0.0),
            Vec4::new(0.0, s, c, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn rot_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();

        Self::new(
            Vec4::new(c, 0.0, s, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(-s, 0.0, c, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            Vec4::new(1.0, 0.0, 0.0, x),
            Vec4::new(0.0, 1.0, 0.0, y),
            Vec4::new(0.0, 0.0, 1.0, z),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(
            self.0[0][row],
            self.0[1][row],
            self.0[2][row],
            self.0[3][row],
        )
    }

    pub fn col(&self, col: usize) -> &Vec4 {
        &self.0[col]
    }

    pub fn mul(&self, other: &Self) -> Self {
        let mut m = Self::zero();

        for i in 0..4 {
            let row = self.row(i);

            for j in 0..4 {
                m.0[j][i] = row.dot(other.col(j));
            }
        }

        m
    }

    /// Transform a point (w = 1), returning the first three components.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let p4 = Vec4::new(p[0], p[1], p[2], 1.0);
        [
            self.row(0).dot(&p4),
            self.row(1).dot(&p4),
            self.row(2).dot(&p4),
        ]
    }

    /// First three rows, flattened row-major, as consumed by the mesh shader.
    pub fn as_4x3(&self) -> [f32; 12] {
        let mut out = [0.0f32; 12];
        for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&self.row(i).0);
        }
        out
    }
}
