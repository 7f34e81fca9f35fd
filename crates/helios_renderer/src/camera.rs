//! Camera for primary ray generation.
//!
//! The camera owns an orthonormal basis (`to`, `up`, `right`), a view plane at
//! some distance along `to`, and the sampling strategy used per pixel:
//! plain center rays, a regular supersampling grid, or adaptive corner
//! subdivision. An optional aperture turns every primary ray into a bundle
//! of rays converging on the focal plane.

use std::time::Duration;

use helios_core::Color;
use helios_math::{is_zero, Point3, Ray, Vector3, ZeroVectorError};
use thiserror::Error;

use crate::renderer::RenderError;
use crate::tracer::RayTracer;

/// Invalid camera configuration, reported when the camera is built.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraError {
    #[error("camera `to` and `up` vectors are not orthogonal")]
    NotOrthogonal,

    #[error(transparent)]
    ZeroVector(#[from] ZeroVectorError),

    #[error("invalid view plane {width}x{height} at distance {distance}")]
    InvalidViewPlane { width: f64, height: f64, distance: f64 },

    #[error("supersampling grid and adaptive depth must be at least 1")]
    InvalidSampling,

    #[error("aperture size and focal distance must be positive with at least one point")]
    InvalidAperture,
}

/// Size of the view plane and its distance from the camera location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    pub width: f64,
    pub height: f64,
    pub distance: f64,
}

/// Per-pixel sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntiAliasing {
    /// One ray through the pixel center.
    #[default]
    None,
    /// `grid × grid` rays through sub-pixel centers, averaged.
    Regular { grid: u32 },
    /// Corner sampling, subdividing where the corners disagree.
    Adaptive { depth: u32 },
}

/// Depth of field settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aperture {
    /// Half-edge of the square aperture around the camera location
    pub size: f64,
    /// Distance from the location to the plane in perfect focus
    pub focal_distance: f64,
    /// Number of aperture points along each edge
    pub points: u32,
}

#[derive(Debug, Clone)]
struct Lens {
    aperture: Aperture,
    origins: Vec<Point3>,
}

/// A pinhole or finite-aperture camera.
#[derive(Debug, Clone)]
pub struct Camera {
    location: Point3,
    to: Vector3,
    up: Vector3,
    right: Vector3,

    view_plane: Option<ViewPlane>,
    anti_aliasing: AntiAliasing,
    lens: Option<Lens>,

    threads: usize,
    progress_interval: Option<Duration>,
}

impl Camera {
    /// Create a camera at `location` looking along `to`.
    ///
    /// `to` and `up` must be orthogonal; both are normalized.
    pub fn new(location: Point3, to: Vector3, up: Vector3) -> Result<Self, CameraError> {
        if !is_zero(to.dot(up)) {
            return Err(CameraError::NotOrthogonal);
        }
        let to = to.normalize();
        let up = up.normalize();
        let right = to.cross(up)?.normalize();

        Ok(Self {
            location,
            to,
            up,
            right,
            view_plane: None,
            anti_aliasing: AntiAliasing::None,
            lens: None,
            threads: 1,
            progress_interval: None,
        })
    }

    /// Create a camera at `location` looking at `target`.
    ///
    /// `up` is derived from world Y, or world Z when looking straight along Y.
    pub fn look_at(location: Point3, target: Point3) -> Result<Self, CameraError> {
        let to = target.subtract(location)?.normalize();
        let world_up = if is_zero(to.dot(Vector3::Y).abs() - 1.0) {
            Vector3::Z
        } else {
            Vector3::Y
        };
        let right = to.cross(world_up)?.normalize();
        let up = right.cross(to)?.normalize();
        Self::new(location, to, up)
    }

    pub fn with_view_plane(mut self, width: f64, height: f64, distance: f64) -> Result<Self, CameraError> {
        // Written so NaN fails too
        if !(width > 0.0 && height > 0.0 && distance > 0.0) {
            return Err(CameraError::InvalidViewPlane { width, height, distance });
        }
        self.view_plane = Some(ViewPlane { width, height, distance });
        Ok(self)
    }

    pub fn with_anti_aliasing(mut self, anti_aliasing: AntiAliasing) -> Result<Self, CameraError> {
        match anti_aliasing {
            AntiAliasing::Regular { grid: 0 } | AntiAliasing::Adaptive { depth: 0 } => {
                return Err(CameraError::InvalidSampling)
            }
            _ => {}
        }
        self.anti_aliasing = anti_aliasing;
        Ok(self)
    }

    /// Enable depth of field.
    ///
    /// The aperture is a `points × points` grid of cell centers covering the
    /// square `[-size, size]²` in the `right`/`up` plane around the location.
    pub fn with_aperture(mut self, aperture: Aperture) -> Result<Self, CameraError> {
        if !(aperture.size > 0.0 && aperture.focal_distance > 0.0) || aperture.points == 0 {
            return Err(CameraError::InvalidAperture);
        }

        let origins = self.aperture_origins(&aperture);
        self.lens = Some(Lens { aperture, origins });
        Ok(self)
    }

    /// Grid of aperture points in the current `right`/`up` basis.
    fn aperture_origins(&self, aperture: &Aperture) -> Vec<Point3> {
        let step = 2.0 * aperture.size / aperture.points as f64;
        let offsets: Vec<f64> = (0..aperture.points)
            .map(|i| -aperture.size + step * (i as f64 + 0.5))
            .collect();
        offsets
            .iter()
            .flat_map(|&y| offsets.iter().map(move |&x| (x, y)))
            .map(|(x, y)| self.location + self.right * x + self.up * y)
            .collect()
    }

    /// Lay the aperture grid out again after the basis changed.
    fn realign_lens(mut self) -> Self {
        if let Some(aperture) = self.aperture() {
            let origins = self.aperture_origins(&aperture);
            self.lens = Some(Lens { aperture, origins });
        }
        self
    }

    /// Number of render worker threads; `0` and `1` both mean sequential.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Log render progress at most once per `interval`.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Roll the camera around `to` by `degrees`.
    pub fn rotate(mut self, degrees: f64) -> Self {
        self.up = self.up.rotate(self.to, degrees).normalize();
        self.right = self.right.rotate(self.to, degrees).normalize();
        self.realign_lens()
    }

    /// Mirror the image horizontally.
    pub fn flip(mut self) -> Self {
        self.right = -self.right;
        self.realign_lens()
    }

    pub fn location(&self) -> Point3 {
        self.location
    }

    pub fn to(&self) -> Vector3 {
        self.to
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn right(&self) -> Vector3 {
        self.right
    }

    pub fn view_plane(&self) -> Option<ViewPlane> {
        self.view_plane
    }

    pub fn anti_aliasing(&self) -> AntiAliasing {
        self.anti_aliasing
    }

    pub fn aperture(&self) -> Option<Aperture> {
        self.lens.as_ref().map(|lens| lens.aperture)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn progress_interval(&self) -> Option<Duration> {
        self.progress_interval
    }

    /// Ray from the location through the center of pixel `(col, row)` of an
    /// `nx × ny` image.
    pub fn construct_ray(&self, nx: u32, ny: u32, col: u32, row: u32) -> Result<Ray, RenderError> {
        let vp = self.view_plane.ok_or(RenderError::MissingViewPlane)?;
        let (x, y) = pixel_center(&vp, nx, ny, col, row);
        Ok(self.ray_through(&vp, x, y))
    }

    /// Final color of pixel `(col, row)` using the configured sampling.
    pub fn pixel_color(
        &self,
        tracer: &dyn RayTracer,
        nx: u32,
        ny: u32,
        col: u32,
        row: u32,
    ) -> Result<Color, RenderError> {
        let vp = self.view_plane.ok_or(RenderError::MissingViewPlane)?;
        Ok(self.render_pixel(&vp, tracer, nx, ny, col, row))
    }

    pub(crate) fn render_pixel(
        &self,
        vp: &ViewPlane,
        tracer: &dyn RayTracer,
        nx: u32,
        ny: u32,
        col: u32,
        row: u32,
    ) -> Color {
        let (x, y) = pixel_center(vp, nx, ny, col, row);
        let rx = vp.width / nx as f64;
        let ry = vp.height / ny as f64;

        match self.anti_aliasing {
            AntiAliasing::None => self.sample(vp, tracer, x, y),
            AntiAliasing::Regular { grid } => {
                let n = grid as f64;
                let samples = (0..grid).flat_map(|i| (0..grid).map(move |j| (i, j)));
                Color::average(samples.map(|(i, j)| {
                    let dx = (j as f64 + 0.5) / n * rx - rx / 2.0;
                    let dy = (i as f64 + 0.5) / n * ry - ry / 2.0;
                    self.sample(vp, tracer, x + dx, y - dy)
                }))
            }
            AntiAliasing::Adaptive { depth } => {
                let (hw, hh) = (rx / 2.0, ry / 2.0);
                let corners = [
                    self.sample(vp, tracer, x - hw, y + hh),
                    self.sample(vp, tracer, x + hw, y + hh),
                    self.sample(vp, tracer, x - hw, y - hh),
                    self.sample(vp, tracer, x + hw, y - hh),
                ];
                self.adaptive(vp, tracer, x, y, rx, ry, depth, corners)
            }
        }
    }

    /// Subdivide a region whose corner colors (top-left, top-right,
    /// bottom-left, bottom-right) disagree.
    #[allow(clippy::too_many_arguments)]
    fn adaptive(
        &self,
        vp: &ViewPlane,
        tracer: &dyn RayTracer,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        depth: u32,
        corners: [Color; 4],
    ) -> Color {
        let similar = corners
            .iter()
            .enumerate()
            .all(|(i, a)| corners[i + 1..].iter().all(|b| a.similar(*b)));
        if depth <= 1 || similar {
            return Color::average(corners);
        }

        let [tl, tr, bl, br] = corners;
        let (hw, hh) = (width / 2.0, height / 2.0);
        let top = self.sample(vp, tracer, x, y + hh);
        let left = self.sample(vp, tracer, x - hw, y);
        let center = self.sample(vp, tracer, x, y);
        let right = self.sample(vp, tracer, x + hw, y);
        let bottom = self.sample(vp, tracer, x, y - hh);

        let (qw, qh) = (width / 4.0, height / 4.0);
        let quadrants = [
            (x - qw, y + qh, [tl, top, left, center]),
            (x + qw, y + qh, [top, tr, center, right]),
            (x - qw, y - qh, [left, center, bl, bottom]),
            (x + qw, y - qh, [center, right, bottom, br]),
        ];
        Color::average(quadrants.map(|(qx, qy, corners)| {
            self.adaptive(vp, tracer, qx, qy, hw, hh, depth - 1, corners)
        }))
    }

    /// Color seen through view-plane offset `(x, y)` from the plane center.
    fn sample(&self, vp: &ViewPlane, tracer: &dyn RayTracer, x: f64, y: f64) -> Color {
        let ray = self.ray_through(vp, x, y);
        match &self.lens {
            None => tracer.trace(&ray),
            Some(lens) => {
                let direction = ray.direction();
                let t = lens.aperture.focal_distance / direction.dot(self.to);
                let focal_point = ray.origin() + direction * t;

                let rays: Vec<Ray> = lens
                    .origins
                    .iter()
                    .filter_map(|&origin| {
                        focal_point
                            .subtract(origin)
                            .ok()
                            .map(|dir| Ray::new(origin, dir))
                    })
                    .collect();
                if rays.is_empty() {
                    tracer.trace(&ray)
                } else {
                    Color::average(rays.iter().map(|r| tracer.trace(r)))
                }
            }
        }
    }

    fn ray_through(&self, vp: &ViewPlane, x: f64, y: f64) -> Ray {
        let direction = self.to * vp.distance + self.right * x + self.up * y;
        // Never zero: the view plane is at a positive distance along `to`
        let direction = Vector3::try_from(direction).unwrap_or(self.to);
        Ray::new(self.location, direction)
    }
}

/// Offset of the center of pixel `(col, row)` from the view-plane center,
/// along `right` and `up`.
fn pixel_center(vp: &ViewPlane, nx: u32, ny: u32, col: u32, row: u32) -> (f64, f64) {
    let rx = vp.width / nx as f64;
    let ry = vp.height / ny as f64;
    let x = (col as f64 - (nx as f64 - 1.0) / 2.0) * rx;
    let y = -(row as f64 - (ny as f64 - 1.0) / 2.0) * ry;
    (x, y)
}
