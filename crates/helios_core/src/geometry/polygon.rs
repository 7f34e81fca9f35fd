//! Convex planar polygons and triangles.

use std::f64::consts::TAU;

use helios_math::{align_zero, is_zero, Point3, Ray, Vector3};

use super::{Crossings, GeometryError, GeometryResult, Plane, Surface};

const WINDING_TOLERANCE: f64 = 1e-6;

/// A convex polygon with at least three coplanar vertices.
///
/// Hits exactly on an edge or a vertex are not reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3>,
    plane: Plane,
}

impl Polygon {
    /// Create a polygon from its vertices, in order around the boundary.
    ///
    /// Fails if there are fewer than three vertices, if two consecutive
    /// vertices coincide, three consecutive ones are collinear, any vertex
    /// lies off the plane of the first three, the order does not trace a
    /// convex outline, or the outline winds around its interior more than
    /// once (a star).
    pub fn new(vertices: Vec<Point3>) -> GeometryResult<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(GeometryError::TooFewVertices(n));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        if n == 3 {
            return Ok(Self { vertices, plane });
        }

        let normal = plane.normal();
        let turn = |e1: Vector3, e2: Vector3| -> GeometryResult<bool> {
            let cross = e1.cross(e2).map_err(|_| GeometryError::Collinear)?;
            Ok(cross.dot(normal) > 0.0)
        };

        // The turn between the last and first edge sets the winding; every
        // other corner must turn the same way.
        let mut edge1 = vertices[n - 1].subtract(vertices[n - 2])?;
        let mut edge2 = vertices[0].subtract(vertices[n - 1])?;
        let positive = turn(edge1, edge2)?;
        let mut winding = edge1.as_dvec3().angle_between(edge2.as_dvec3());

        for i in 1..n {
            if !is_zero(normal.as_dvec3().dot(vertices[i] - vertices[0])) {
                return Err(GeometryError::NotCoplanar(i));
            }
            edge1 = edge2;
            edge2 = vertices[i].subtract(vertices[i - 1])?;
            if turn(edge1, edge2)? != positive {
                return Err(GeometryError::NotConvex);
            }
            winding += edge1.as_dvec3().angle_between(edge2.as_dvec3());
        }

        // Exterior angles of a simple convex outline add up to one full turn
        if winding > TAU + WINDING_TOLERANCE {
            return Err(GeometryError::SelfIntersecting);
        }

        Ok(Self { vertices, plane })
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }
}

impl Surface for Polygon {
    fn intersect(&self, ray: &Ray) -> Crossings {
        let mut crossings = self.plane.intersect(ray);
        let Some(&p) = crossings.first() else {
            return crossings;
        };

        let normal = self.plane.normal().as_dvec3();
        let n = self.vertices.len();
        let mut sign = 0.0;
        for i in 0..n {
            let vi = self.vertices[i];
            let edge = self.vertices[(i + 1) % n] - vi;
            let s = align_zero(normal.dot(edge.cross(p - vi)));
            // On an edge or its extension through a vertex
            if s == 0.0 {
                crossings.clear();
                return crossings;
            }
            if sign == 0.0 {
                sign = s.signum();
            } else if s.signum() != sign {
                crossings.clear();
                return crossings;
            }
        }
        crossings
    }

    fn normal_at(&self, _point: Point3) -> Option<Vector3> {
        Some(self.plane.normal())
    }
}

/// A triangle: the three-vertex polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle(Polygon);

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3) -> GeometryResult<Self> {
        Polygon::new(vec![a, b, c]).map(Self)
    }

    pub fn vertices(&self) -> &[Point3] {
        self.0.vertices()
    }
}

impl Surface for Triangle {
    fn intersect(&self, ray: &Ray) -> Crossings {
        self.0.intersect(ray)
    }

    fn normal_at(&self, point: Point3) -> Option<Vector3> {
        self.0.normal_at(point)
    }
}
