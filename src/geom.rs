//! 2D primitives used by outline construction.

use core::ops::{Add, Mul, Sub};

/// A point in 2D space.
#[derive(Clone, Copy, PartialEq, Default, Debug)]
#[allow(missing_docs)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Linear interpolation between `self` and `other`.
    ///
    /// `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, scalar: f32) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

/// A 2×3 affine transformation matrix.
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
///
/// The builder methods post-multiply, so in
/// `Transform::identity().scale(2.0, 2.0).translate(10.0, 0.0)` the
/// translation is applied to a point first and the scale second.
#[derive(Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    /// Creates a transform from the six matrix components.
    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// The identity transform.
    #[inline]
    pub const fn identity() -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Returns `self` combined with a translation by `(tx, ty)`.
    #[inline]
    pub fn translate(self, tx: f32, ty: f32) -> Self {
        self.compose(Transform::new(1.0, 0.0, 0.0, 1.0, tx, ty))
    }

    /// Returns `self` combined with a scale by `(sx, sy)`.
    #[inline]
    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.compose(Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Returns `self` combined with a counter-clockwise rotation by `angle`
    /// radians.
    #[inline]
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        self.compose(Transform::new(cos, sin, -sin, cos, 0.0, 0.0))
    }

    /// 2×3 matrix multiplication with the affine row implied.
    ///
    /// `self.compose(other).apply(p) == self.apply(other.apply(p))`.
    #[inline]
    pub fn compose(self, other: Self) -> Self {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Checks whether this is the identity transform.
    ///
    /// A direct float comparison is fine in our case.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.a == 1.0
            && self.b == 0.0
            && self.c == 0.0
            && self.d == 1.0
            && self.e == 0.0
            && self.f == 0.0
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Transform::identity()
    }
}

impl core::fmt::Debug for Transform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Transform({} {} {} {} {} {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
