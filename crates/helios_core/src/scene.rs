//! Scene description consumed by the tracer.
//!
//! A scene owns everything a render reads: the geometry composite, the
//! ambient term, the background color for rays that escape, and the light
//! sources. It is built once and then shared read-only by all render workers.

use crate::color::Color;
use crate::geometry::{Geometries, Intersectable};
use crate::light::{AmbientLight, LightSource};

/// A complete scene: geometry, lights and background.
#[derive(Debug, Default)]
pub struct Scene {
    /// Scene name (usually from the description file)
    pub name: String,

    /// All geometry, possibly nested
    pub geometries: Geometries,

    /// Ambient light added at every hit
    pub ambient: AmbientLight,

    /// Color of rays that hit nothing
    pub background: Color,

    /// Directional, point and spot lights
    pub lights: Vec<LightSource>,
}

impl Scene {
    /// Create an empty scene with a black background and no lights.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self
    }

    /// Add one object to the scene's geometry.
    pub fn with_geometry(mut self, object: impl Intersectable + 'static) -> Self {
        self.geometries.add(object);
        self
    }

    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_lights(mut self, lights: Vec<LightSource>) -> Self {
        self.lights = lights;
        self
    }

    /// Add a single light source.
    pub fn with_light(mut self, light: impl Into<LightSource>) -> Self {
        self.lights.push(light.into());
        self
    }

    /// Get light count.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}
