//! Finite capped cylinder primitive.

use helios_math::{align_zero, Point3, Ray, Vector3};

use super::{nearest_two, Crossings, GeometryError, GeometryResult, Plane, Surface, Tube};

/// A tube cut to `height` along its axis and closed by two flat caps.
///
/// The bottom cap sits at the axis origin, the top cap `height` further along
/// the axis direction. Points on the rim where side and cap meet count as
/// outside, like polygon edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    bottom: Plane,
    top: Plane,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f64, height: f64) -> GeometryResult<Self> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        let tube = Tube::new(axis, radius)?;
        let a = axis.direction();
        let bottom = Plane::new(axis.origin(), -a);
        let top = Plane::new(axis.point_at(height), a);
        Ok(Self {
            tube,
            height,
            bottom,
            top,
        })
    }

    #[inline]
    pub fn axis(&self) -> &Ray {
        self.tube.axis()
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.tube.radius()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    fn inside_cap(&self, cap: &Plane, p: Point3) -> bool {
        let r = self.radius();
        align_zero(p.distance_squared(cap.point()) - r * r) < 0.0
    }

    fn between_caps(&self, p: Point3) -> bool {
        let h = self.tube.axial_projection(p);
        h > 0.0 && align_zero(h - self.height) < 0.0
    }
}

impl Surface for Cylinder {
    fn intersect(&self, ray: &Ray) -> Crossings {
        let side = self
            .tube
            .intersect(ray)
            .into_iter()
            .filter(|p| self.between_caps(*p));
        let caps = [&self.bottom, &self.top].into_iter().flat_map(|cap| {
            cap.intersect(ray)
                .into_iter()
                .filter(move |p| self.inside_cap(cap, *p))
        });
        nearest_two(ray.origin(), side.chain(caps).collect())
    }

    fn normal_at(&self, point: Point3) -> Option<Vector3> {
        let h = self.tube.axial_projection(point);
        if h == 0.0 {
            Some(self.bottom.normal())
        } else if align_zero(h - self.height) == 0.0 {
            Some(self.top.normal())
        } else {
            self.tube.normal_at(point)
        }
    }
}
