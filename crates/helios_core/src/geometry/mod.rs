//! Analytic surfaces and ray intersection.
//!
//! Each primitive implements [`Surface`], returning the points where a ray
//! crosses it in front of the ray origin. [`Geometry`] attaches emission and a
//! [`Material`] to a [`Shape`] and is the unit the tracer shades; anything that
//! can be hit, including nested collections of geometries, implements
//! [`Intersectable`].

mod cylinder;
mod geometries;
mod plane;
mod polygon;
mod sphere;
mod tube;

use arrayvec::ArrayVec;
use helios_math::{Point3, Ray, Vector3, ZeroVectorError};
use thiserror::Error;

use crate::color::Color;
use crate::material::Material;

pub use cylinder::Cylinder;
pub use geometries::Geometries;
pub use plane::Plane;
pub use polygon::{Polygon, Triangle};
pub use sphere::Sphere;
pub use tube::Tube;

/// Points where a ray crosses a single surface, nearest first.
///
/// No supported primitive is crossed more than twice by a straight line.
pub type Crossings = ArrayVec<Point3, 2>;

/// Errors raised while constructing a shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("consecutive vertices coincide")]
    ZeroVector(#[from] ZeroVectorError),

    #[error("three consecutive vertices are collinear")]
    Collinear,

    #[error("vertex {0} does not lie in the polygon plane")]
    NotCoplanar(usize),

    #[error("vertices are not ordered or the polygon is not convex")]
    NotConvex,

    #[error("polygon outline crosses itself")]
    SelfIntersecting,

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

/// Result type for shape construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Ray/surface intersection for a single primitive.
pub trait Surface {
    /// Crossings with the ray strictly in front of its origin.
    fn intersect(&self, ray: &Ray) -> Crossings;

    /// Unit outward normal at a point on the surface.
    ///
    /// `None` for points where no normal is defined (such as a sphere's
    /// center).
    fn normal_at(&self, point: Point3) -> Option<Vector3>;
}

/// The closed set of supported primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Polygon(Polygon),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Surface for Shape {
    fn intersect(&self, ray: &Ray) -> Crossings {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(s) => s.intersect(ray),
            Shape::Triangle(s) => s.intersect(ray),
            Shape::Polygon(s) => s.intersect(ray),
            Shape::Tube(s) => s.intersect(ray),
            Shape::Cylinder(s) => s.intersect(ray),
        }
    }

    fn normal_at(&self, point: Point3) -> Option<Vector3> {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(s) => s.normal_at(point),
            Shape::Triangle(s) => s.normal_at(point),
            Shape::Polygon(s) => s.normal_at(point),
            Shape::Tube(s) => s.normal_at(point),
            Shape::Cylinder(s) => s.normal_at(point),
        }
    }
}

macro_rules! impl_shape_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(s: $variant) -> Self {
                    Shape::$variant(s)
                }
            }
        )*
    };
}

impl_shape_from!(Sphere, Plane, Triangle, Polygon, Tube, Cylinder);

/// A shape with its emission and material, as placed in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: Shape,
    emission: Color,
    material: Material,
}

impl Geometry {
    /// Wrap a shape with black emission and the default material.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            emission: Color::BLACK,
            material: Material::default(),
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn emission(&self) -> Color {
        self.emission
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Unit outward normal at `point`.
    ///
    /// # Panics
    ///
    /// Panics if the shape has no normal at `point`. Every point returned by
    /// an intersection has one, so this only fires on caller misuse.
    pub fn normal_at(&self, point: Point3) -> Vector3 {
        match self.shape.normal_at(point) {
            Some(n) => n,
            None => panic!("no surface normal defined at {point}"),
        }
    }
}

/// A ray hit: the geometry that was struck and where.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub geometry: &'a Geometry,
    pub point: Point3,
}

impl<'a> Hit<'a> {
    pub fn new(geometry: &'a Geometry, point: Point3) -> Self {
        Self { geometry, point }
    }

    /// Surface normal of the struck geometry at the hit point.
    pub fn normal(&self) -> Vector3 {
        self.geometry.normal_at(self.point)
    }
}

/// Anything a ray can be tested against.
pub trait Intersectable: Send + Sync {
    /// Every hit in front of the ray origin, in no particular order.
    fn find_intersections<'a>(&'a self, ray: &Ray) -> Vec<Hit<'a>>;

    /// The hit nearest to the ray origin.
    fn find_closest<'a>(&'a self, ray: &Ray) -> Option<Hit<'a>> {
        let origin = ray.origin();
        self.find_intersections(ray).into_iter().min_by(|a, b| {
            origin
                .distance_squared(a.point)
                .total_cmp(&origin.distance_squared(b.point))
        })
    }
}

impl Intersectable for Geometry {
    fn find_intersections<'a>(&'a self, ray: &Ray) -> Vec<Hit<'a>> {
        self.shape
            .intersect(ray)
            .into_iter()
            .map(|point| Hit::new(self, point))
            .collect()
    }
}

/// Sort points by distance from `origin`, merge near-duplicates, keep two.
pub(crate) fn nearest_two(origin: Point3, mut points: Vec<Point3>) -> Crossings {
    points.sort_by(|a, b| {
        origin
            .distance_squared(*a)
            .total_cmp(&origin.distance_squared(*b))
    });
    points.dedup_by(|a, b| helios_math::is_zero(a.distance(*b)));
    points.into_iter().take(2).collect()
}
