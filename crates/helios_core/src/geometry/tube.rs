//! Infinite tube primitive.

use glam::DVec3;
use helios_math::{align_zero, Point3, Ray, Vector3};

use super::{Crossings, GeometryError, GeometryResult, Surface};

/// An infinite circular tube of a given radius around an axis line.
#[derive(Debug, Clone, PartialEq)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    /// Create a tube around `axis`. The radius must be positive.
    pub fn new(axis: Ray, radius: f64) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { axis, radius })
    }

    #[inline]
    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed distance along the axis from its origin to the projection of `p`.
    pub(crate) fn axial_projection(&self, p: Point3) -> f64 {
        align_zero(self.axis.direction().as_dvec3().dot(p - self.axis.origin()))
    }

    /// Component of `v` perpendicular to the axis.
    fn perpendicular(&self, v: DVec3) -> DVec3 {
        let a = self.axis.direction().as_dvec3();
        v - a * v.dot(a)
    }
}

impl Surface for Tube {
    fn intersect(&self, ray: &Ray) -> Crossings {
        let mut crossings = Crossings::new();

        // Parallel to the axis: the line never crosses the wall
        let Ok(v_perp) = Vector3::try_from(self.perpendicular(ray.direction().as_dvec3())) else {
            return crossings;
        };
        let v_perp = v_perp.as_dvec3();
        let delta_perp = self.perpendicular(ray.origin() - self.axis.origin());

        let a = v_perp.length_squared();
        let b = 2.0 * v_perp.dot(delta_perp);
        let c = delta_perp.length_squared() - self.radius * self.radius;

        let discriminant = align_zero(b * b - 4.0 * a * c);
        // Misses or only touches the wall
        if discriminant <= 0.0 {
            return crossings;
        }

        let sqrtd = discriminant.sqrt();
        let t1 = align_zero((-b - sqrtd) / (2.0 * a));
        let t2 = align_zero((-b + sqrtd) / (2.0 * a));
        for t in [t1, t2] {
            if t > 0.0 {
                crossings.push(ray.point_at(t));
            }
        }
        crossings
    }

    fn normal_at(&self, point: Point3) -> Option<Vector3> {
        let foot = self.axis.point_at(self.axial_projection(point));
        point.subtract(foot).ok().map(|v| v.normalize())
    }
}
