//! 2D affine matrix used to compose transforms and map points between spaces.

use std::ops::Mul;

use super::vec2::Vec2;

/// Column-major 2x3 affine matrix.
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Mat2D {
    pub const IDENTITY: Mat2D = Mat2D { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    /// Builds translation * rotation * scale. `rotation` is in radians.
    pub fn from_trs(translation: Vec2, rotation: f64, scale: Vec2) -> Self {
        let (sin, cos) = rotation.sin_cos();
        Self {
            a: cos * scale.x,
            b: sin * scale.x,
            c: -sin * scale.y,
            d: cos * scale.y,
            tx: translation.x,
            ty: translation.y,
        }
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.tx, self.ty)
    }

    /// Rotation angle of the x basis vector, in radians.
    pub fn rotation(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// Scale along each local axis. A reflection shows up as a negative y scale.
    pub fn scale(&self) -> Vec2 {
        let sx = (self.a * self.a + self.b * self.b).sqrt();
        if sx == 0.0 {
            return Vec2::new(0.0, (self.c * self.c + self.d * self.d).sqrt());
        }
        Vec2::new(sx, self.determinant() / sx)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Applies only the linear part (no translation).
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Returns `None` for a singular matrix (zero scale on some axis).
    pub fn inverse(&self) -> Option<Mat2D> {
        let det = self.determinant();
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        Some(Mat2D {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }
}

impl Default for Mat2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `lhs * rhs` applies `rhs` first.
impl Mul for Mat2D {
    type Output = Mat2D;

    fn mul(self, rhs: Mat2D) -> Mat2D {
        Mat2D {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            tx: self.a * rhs.tx + self.c * rhs.ty + self.tx,
            ty: self.b * rhs.tx + self.d * rhs.ty + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    const EPSILON: f64 = 1e-10;

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert!((a - b).magnitude() < EPSILON, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_trs_point() {
        let m = Mat2D::from_trs(Vec2::new(10.0, 5.0), FRAC_PI_2, Vec2::new(2.0, 2.0));
        // (1,0) -> scale (2,0) -> rotate (0,2) -> translate (10,7)
        assert_vec_eq(m.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 7.0));
        assert_vec_eq(m.transform_vector(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_decompose() {
        let m = Mat2D::from_trs(Vec2::new(-3.0, 4.0), 0.7, Vec2::new(2.0, 3.0));
        assert_vec_eq(m.translation(), Vec2::new(-3.0, 4.0));
        assert!((m.rotation() - 0.7).abs() < EPSILON);
        assert_vec_eq(m.scale(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat2D::from_trs(Vec2::new(1.0, -2.0), 1.2, Vec2::new(0.5, 4.0));
        let inv = m.inverse().unwrap();
        let p = Vec2::new(3.0, 7.0);
        assert_vec_eq(inv.transform_point(m.transform_point(p)), p);
        let id = m * inv;
        assert_vec_eq(id.transform_point(p), p);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let m = Mat2D::from_trs(Vec2::ZERO, 0.0, Vec2::new(0.0, 1.0));
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_composition_order() {
        let parent = Mat2D::from_trs(Vec2::new(5.0, 0.0), 0.0, Vec2::ONE);
        let child = Mat2D::from_trs(Vec2::ZERO, FRAC_PI_2, Vec2::ONE);
        let world = parent * child;
        // Child rotates first, then the parent translates.
        assert_vec_eq(world.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(5.0, 1.0));
    }
}
