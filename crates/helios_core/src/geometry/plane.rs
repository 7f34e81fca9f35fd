//! Infinite plane primitive.

use helios_math::{align_zero, is_zero, Point3, Ray, Vector3};

use super::{Crossings, GeometryError, GeometryResult, Surface};

/// A plane through a reference point with a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    q0: Point3,
    normal: Vector3,
}

impl Plane {
    /// Create a plane from a point on it and a normal (normalized here).
    pub fn new(q0: Point3, normal: Vector3) -> Self {
        Self {
            q0,
            normal: normal.normalize(),
        }
    }

    /// Create the plane through three points.
    ///
    /// The normal follows the right-hand rule for `p1 → p2 → p3`.
    pub fn from_points(p1: Point3, p2: Point3, p3: Point3) -> GeometryResult<Self> {
        let u = p2.subtract(p1)?;
        let v = p3.subtract(p1)?;
        let normal = u.cross(v).map_err(|_| GeometryError::Collinear)?;
        Ok(Self::new(p1, normal))
    }

    #[inline]
    pub fn point(&self) -> Point3 {
        self.q0
    }

    #[inline]
    pub fn normal(&self) -> Vector3 {
        self.normal
    }
}

impl Surface for Plane {
    fn intersect(&self, ray: &Ray) -> Crossings {
        let mut crossings = Crossings::new();

        // Ray starting at the reference point
        let Ok(q) = self.q0.subtract(ray.origin()) else {
            return crossings;
        };

        let nv = self.normal.dot(ray.direction());
        if is_zero(nv) {
            return crossings;
        }

        let t = align_zero(self.normal.dot(q) / nv);
        if t > 0.0 {
            crossings.push(ray.point_at(t));
        }
        crossings
    }

    fn normal_at(&self, _point: Point3) -> Option<Vector3> {
        Some(self.normal)
    }
}
