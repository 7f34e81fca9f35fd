//! Sphere primitive.

use helios_math::{align_zero, Point3, Ray, Vector3};

use super::{Crossings, GeometryError, GeometryResult, Surface};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: Point3, radius: f64) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    #[inline]
    pub fn center(&self) -> Point3 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray) -> Crossings {
        let mut crossings = Crossings::new();
        let dir = ray.direction();

        // A ray starting at the center leaves through exactly one point
        let Ok(u) = self.center.subtract(ray.origin()) else {
            crossings.push(self.center + dir * self.radius);
            return crossings;
        };

        let tm = align_zero(dir.dot(u));
        let d = align_zero((u.length_squared() - tm * tm).abs().sqrt());
        if d >= self.radius {
            return crossings;
        }

        let th = align_zero((self.radius * self.radius - d * d).sqrt());
        let t1 = align_zero(tm - th);
        let t2 = align_zero(tm + th);
        for t in [t1, t2] {
            if t > 0.0 {
                crossings.push(ray.point_at(t));
            }
        }
        crossings
    }

    fn normal_at(&self, point: Point3) -> Option<Vector3> {
        point.subtract(self.center).ok().map(|v| v.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Point3::new(1.0, 0.0, 0.0), 1.0).unwrap()
    }

    fn ray(origin: [f64; 3], dir: [f64; 3]) -> Ray {
        Ray::new(Point3::from(origin), Vector3::try_from(dir).unwrap())
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert_eq!(
            Sphere::new(Point3::ORIGIN, 0.0),
            Err(GeometryError::NonPositiveRadius(0.0))
        );
        assert!(Sphere::new(Point3::ORIGIN, -2.0).is_err());
    }

    #[test]
    fn test_normal() {
        let sphere = unit_sphere();
        let n = sphere.normal_at(Point3::new(2.0, 0.0, 0.0)).unwrap();
        assert_eq!(n, Vector3::X);
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert_eq!(sphere.normal_at(sphere.center()), None);
    }

    #[test]
    fn test_ray_through_center() {
        let sphere = Sphere::new(Point3::ORIGIN, 1.0).unwrap();
        let hits = sphere.intersect(&ray([-2.0, 0.0, 0.0], [1.0, 0.0, 0.0]));
        assert_eq!(
            hits.as_slice(),
            &[Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_chord_length() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -5.0), 2.0).unwrap();
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]);
        let hits = sphere.intersect(&r);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].distance(hits[1]) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_equivalence_partitions() {
        let sphere = unit_sphere();

        // Ray's line is outside the sphere
        assert!(sphere.intersect(&ray([-1.0, 0.0, 0.0], [1.0, 1.0, 0.0])).is_empty());

        // Ray starts before and crosses the sphere
        let hits = sphere.intersect(&ray([-1.0, 0.0, 0.0], [3.0, 1.0, 0.0]));
        assert_eq!(hits.len(), 2);
        let p1 = Point3::new(0.0651530771650466, 0.355051025721682, 0.0);
        let p2 = Point3::new(1.53484692283495, 0.844948974278318, 0.0);
        assert!(hits[0].distance(p1) < 1e-9);
        assert!(hits[1].distance(p2) < 1e-9);

        // Ray starts inside the sphere
        let hits = sphere.intersect(&ray([0.5, 0.5, 0.0], [3.0, 1.0, 0.0]));
        assert_eq!(hits.len(), 1);

        // Ray starts after the sphere
        assert!(sphere.intersect(&ray([2.0, 1.0, 0.0], [3.0, 1.0, 0.0])).is_empty());
    }

    #[test]
    fn test_boundary_values() {
        let sphere = unit_sphere();

        // Starts on the surface, goes inside
        let hits = sphere.intersect(&ray([1.0, -1.0, 0.0], [3.0, 1.0, 0.0]));
        assert_eq!(hits.len(), 1);

        // Starts on the surface, goes outside
        assert!(sphere.intersect(&ray([2.0, 0.0, 0.0], [3.0, 1.0, 0.0])).is_empty());

        // Starts at the center
        let hits = sphere.intersect(&ray([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
        assert_eq!(hits.as_slice(), &[Point3::new(1.0, 1.0, 0.0)]);

        // Tangent ray
        assert!(sphere.intersect(&ray([0.0, 1.0, 0.0], [1.0, 0.0, 0.0])).is_empty());

        // Line orthogonal to the center line, outside the sphere
        assert!(sphere.intersect(&ray([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0])).is_empty());
    }
}
