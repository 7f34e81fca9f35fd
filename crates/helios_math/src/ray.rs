use crate::util::is_zero;
use crate::{Point3, Vector3};

/// Distance a secondary ray's origin is pushed off the surface it leaves.
///
/// Keeps shadow, reflection and refraction rays from re-hitting their
/// own starting surface due to rounding.
pub const DELTA: f64 = 0.1;

/// A half-line with an origin and a unit direction.
///
/// The direction is normalized on construction and is never zero, since
/// [`Vector3`] cannot represent the zero vector.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Create a new ray; `direction` is normalized.
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray leaving a surface point.
    ///
    /// The origin is moved by [`DELTA`] along `normal`, towards the side the
    /// ray travels into (`+normal` when `direction · normal > 0`, `-normal`
    /// when negative). A direction tangent to the surface leaves the origin
    /// unchanged.
    pub fn offset(point: Point3, direction: Vector3, normal: Vector3) -> Self {
        let nv = direction.dot(normal);
        let origin = if is_zero(nv) {
            point
        } else {
            let delta = normal * if nv > 0.0 { DELTA } else { -DELTA };
            point + delta
        };
        Self::new(origin, direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Get the (unit) direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction, or exactly the origin when `t` is zero.
    pub fn point_at(&self, t: f64) -> Point3 {
        if is_zero(t) {
            self.origin
        } else {
            self.origin + self.direction * t
        }
    }

    /// The point in `points` nearest to the ray origin, if any.
    pub fn closest_point(&self, points: &[Point3]) -> Option<Point3> {
        points.iter().copied().min_by(|a, b| {
            self.origin
                .distance_squared(*a)
                .total_cmp(&self.origin.distance_squared(*b))
        })
    }
}
