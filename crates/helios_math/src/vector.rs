//! Strongly typed points and non-zero vectors.
//!
//! [`Point3`] and [`Vector3`] both wrap a `glam::DVec3`, but a `Vector3` can
//! never be the zero vector: every operation that could produce one returns a
//! `Result` carrying [`ZeroVectorError`]. Intermediate arithmetic where zero is
//! a legitimate value (a projection that vanishes, a displacement between two
//! equal points) is done on raw `DVec3` values and re-validated when it turns
//! back into a direction.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::is_zero;

/// Attempted to build a vector whose components are all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot construct a zero-length vector")]
pub struct ZeroVectorError;

/// A location in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3(DVec3);

impl Point3 {
    /// The origin of the coordinate system.
    pub const ORIGIN: Point3 = Point3(DVec3::ZERO);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// The raw coordinates.
    #[inline]
    pub fn as_dvec3(&self) -> DVec3 {
        self.0
    }

    /// Vector pointing from `other` to `self`.
    ///
    /// Fails when the two points coincide.
    pub fn subtract(&self, other: Point3) -> Result<Vector3, ZeroVectorError> {
        Vector3::try_from(self.0 - other.0)
    }

    pub fn distance_squared(&self, other: Point3) -> f64 {
        self.0.distance_squared(other.0)
    }

    pub fn distance(&self, other: Point3) -> f64 {
        self.0.distance(other.0)
    }
}

impl From<DVec3> for Point3 {
    fn from(v: DVec3) -> Self {
        Self(v)
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(a: [f64; 3]) -> Self {
        Self(DVec3::from_array(a))
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.0.to_array()
    }
}

impl Add<Vector3> for Point3 {
    type Output = Point3;

    fn add(self, rhs: Vector3) -> Point3 {
        Point3(self.0 + rhs.0)
    }
}

impl Add<DVec3> for Point3 {
    type Output = Point3;

    fn add(self, rhs: DVec3) -> Point3 {
        Point3(self.0 + rhs)
    }
}

impl Sub<Vector3> for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Vector3) -> Point3 {
        Point3(self.0 - rhs.0)
    }
}

/// Raw displacement between two points; may be zero.
impl Sub<Point3> for Point3 {
    type Output = DVec3;

    fn sub(self, rhs: Point3) -> DVec3 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

/// A non-zero direction or displacement in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3(DVec3);

impl Vector3 {
    pub const X: Vector3 = Vector3(DVec3::X);
    pub const Y: Vector3 = Vector3(DVec3::Y);
    pub const Z: Vector3 = Vector3(DVec3::Z);

    /// Create a new vector, rejecting `(0, 0, 0)`.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, ZeroVectorError> {
        Self::try_from(DVec3::new(x, y, z))
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// The raw components.
    #[inline]
    pub fn as_dvec3(&self) -> DVec3 {
        self.0
    }

    #[inline]
    pub fn dot(&self, other: Vector3) -> f64 {
        self.0.dot(other.0)
    }

    /// Cross product; fails for parallel vectors.
    pub fn cross(&self, other: Vector3) -> Result<Vector3, ZeroVectorError> {
        Self::try_from(self.0.cross(other.0))
    }

    /// Vector sum; fails when the operands cancel out.
    pub fn try_add(&self, other: Vector3) -> Result<Vector3, ZeroVectorError> {
        Self::try_from(self.0 + other.0)
    }

    /// Scalar multiple; fails for a zero factor.
    pub fn try_scale(&self, factor: f64) -> Result<Vector3, ZeroVectorError> {
        Self::try_from(self.0 * factor)
    }

    pub fn length_squared(&self) -> f64 {
        self.0.length_squared()
    }

    pub fn length(&self) -> f64 {
        self.0.length()
    }

    /// Unit vector with the same direction.
    pub fn normalize(&self) -> Vector3 {
        Vector3(self.0 / self.0.length())
    }

    /// Mirror this vector about the plane orthogonal to `normal`:
    /// `v - 2(v·n)n`. `normal` must be unit length.
    pub fn reflect(&self, normal: Vector3) -> Vector3 {
        Vector3(self.0 - 2.0 * self.0.dot(normal.0) * normal.0)
    }

    /// An arbitrary unit vector orthogonal to this one.
    pub fn orthogonal(&self) -> Vector3 {
        Vector3(self.normalize().0.any_orthonormal_vector())
    }

    /// Rotate around the unit `axis` by `degrees` (right-hand rule).
    pub fn rotate(&self, axis: Vector3, degrees: f64) -> Vector3 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let k = axis.0;
        let v = self.0;
        // Rodrigues' rotation formula; the length is preserved, so the
        // result cannot be the zero vector.
        let rotated = v * cos + k.cross(v) * sin + k * k.dot(v) * (1.0 - cos);
        Vector3(rotated)
    }
}

impl TryFrom<DVec3> for Vector3 {
    type Error = ZeroVectorError;

    fn try_from(v: DVec3) -> Result<Self, Self::Error> {
        if is_zero(v.x) && is_zero(v.y) && is_zero(v.z) {
            Err(ZeroVectorError)
        } else {
            Ok(Self(v))
        }
    }
}

impl TryFrom<[f64; 3]> for Vector3 {
    type Error = ZeroVectorError;

    fn try_from(a: [f64; 3]) -> Result<Self, Self::Error> {
        Self::try_from(DVec3::from_array(a))
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.0.to_array()
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        v.0
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3(-self.0)
    }
}

/// Raw scaled displacement; may be zero.
impl Mul<f64> for Vector3 {
    type Output = DVec3;

    fn mul(self, rhs: f64) -> DVec3 {
        self.0 * rhs
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.0.x, self.0.y, self.0.z)
    }
}
