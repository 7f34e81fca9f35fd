//! JSON scene descriptions.
//!
//! A scene file looks like:
//!
//! ```json
//! {
//!   "name": "spheres",
//!   "background": [0, 0, 0],
//!   "ambient": { "color": [255, 255, 255], "ka": 0.1 },
//!   "geometries": [
//!     { "type": "sphere", "center": [0, 0, -100], "radius": 50,
//!       "emission": [100, 60, 20],
//!       "material": { "kd": 0.5, "ks": 0.5, "shininess": 100, "kt": 0.3 } }
//!   ],
//!   "lights": [
//!     { "type": "spot", "color": [1000, 600, 0], "position": [-100, -100, 500],
//!       "direction": [-1, -1, -2], "kl": 0.0004, "kq": 0.0000006 }
//!   ]
//! }
//! ```
//!
//! Every material coefficient accepts either a scalar or an `[r, g, b]`
//! triple. Unknown top-level keys (such as a `camera` section read by the
//! command line front end) are ignored.

use std::path::Path;

use glam::DVec3;
use helios_math::{Point3, Ray, Vector3, ZeroVectorError};
use serde::Deserialize;
use thiserror::Error;

use crate::color::Color;
use crate::geometry::{
    Cylinder, Geometries, Geometry, GeometryError, Plane, Polygon, Shape, Sphere, Triangle, Tube,
};
use crate::light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
use crate::material::Material;
use crate::scene::Scene;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Invalid direction: {0}")]
    ZeroVector(#[from] ZeroVectorError),
}

/// Result type for scene loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// A material coefficient: one value for all channels or one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Scalar(f64),
    Rgb([f64; 3]),
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::Scalar(0.0)
    }
}

impl From<Coefficient> for DVec3 {
    fn from(c: Coefficient) -> Self {
        match c {
            Coefficient::Scalar(v) => DVec3::splat(v),
            Coefficient::Rgb(rgb) => DVec3::from_array(rgb),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MaterialDescription {
    kd: Coefficient,
    ks: Coefficient,
    kr: Coefficient,
    kt: Coefficient,
    kdg: f64,
    ksg: f64,
    shininess: i32,
}

impl From<MaterialDescription> for Material {
    fn from(m: MaterialDescription) -> Self {
        Material::new()
            .with_kd(m.kd)
            .with_ks(m.ks)
            .with_kr(m.kr)
            .with_kt(m.kt)
            .with_kdg(m.kdg)
            .with_ksg(m.ksg)
            .with_shininess(m.shininess)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisDescription {
    origin: Point3,
    direction: [f64; 3],
}

impl AxisDescription {
    fn to_ray(&self) -> LoadResult<Ray> {
        Ok(Ray::new(self.origin, Vector3::try_from(self.direction)?))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeDescription {
    Sphere {
        center: Point3,
        radius: f64,
    },
    Plane {
        point: Point3,
        normal: [f64; 3],
    },
    Triangle {
        vertices: [Point3; 3],
    },
    Polygon {
        vertices: Vec<Point3>,
    },
    Tube {
        axis: AxisDescription,
        radius: f64,
    },
    Cylinder {
        axis: AxisDescription,
        radius: f64,
        height: f64,
    },
}

impl ShapeDescription {
    fn build(self) -> LoadResult<Shape> {
        let shape = match self {
            ShapeDescription::Sphere { center, radius } => Sphere::new(center, radius)?.into(),
            ShapeDescription::Plane { point, normal } => {
                Plane::new(point, Vector3::try_from(normal)?).into()
            }
            ShapeDescription::Triangle { vertices: [a, b, c] } => Triangle::new(a, b, c)?.into(),
            ShapeDescription::Polygon { vertices } => Polygon::new(vertices)?.into(),
            ShapeDescription::Tube { axis, radius } => Tube::new(axis.to_ray()?, radius)?.into(),
            ShapeDescription::Cylinder {
                axis,
                radius,
                height,
            } => Cylinder::new(axis.to_ray()?, radius, height)?.into(),
        };
        Ok(shape)
    }
}

#[derive(Debug, Deserialize)]
struct GeometryDescription {
    #[serde(flatten)]
    shape: ShapeDescription,
    #[serde(default)]
    emission: Color,
    #[serde(default)]
    material: MaterialDescription,
}

fn default_kc() -> f64 {
    1.0
}

fn default_narrow_beam() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LightDescription {
    Directional {
        color: Color,
        direction: [f64; 3],
    },
    Point {
        color: Color,
        position: Point3,
        #[serde(default = "default_kc")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
    },
    Spot {
        color: Color,
        position: Point3,
        direction: [f64; 3],
        #[serde(default = "default_kc")]
        kc: f64,
        #[serde(default)]
        kl: f64,
        #[serde(default)]
        kq: f64,
        #[serde(default = "default_narrow_beam")]
        narrow_beam: f64,
    },
}

impl LightDescription {
    fn build(self) -> LoadResult<LightSource> {
        let light = match self {
            LightDescription::Directional { color, direction } => {
                DirectionalLight::new(color, Vector3::try_from(direction)?).into()
            }
            LightDescription::Point {
                color,
                position,
                kc,
                kl,
                kq,
            } => PointLight::new(color, position)
                .with_kc(kc)
                .with_kl(kl)
                .with_kq(kq)
                .into(),
            LightDescription::Spot {
                color,
                position,
                direction,
                kc,
                kl,
                kq,
                narrow_beam,
            } => SpotLight::new(color, position, Vector3::try_from(direction)?)
                .with_kc(kc)
                .with_kl(kl)
                .with_kq(kq)
                .with_narrow_beam(narrow_beam)
                .into(),
        };
        Ok(light)
    }
}

fn default_ka() -> Coefficient {
    Coefficient::Scalar(1.0)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AmbientDescription {
    color: Color,
    #[serde(default = "default_ka")]
    ka: Coefficient,
}

#[derive(Debug, Deserialize)]
struct SceneDescription {
    name: Option<String>,
    #[serde(default)]
    background: Color,
    ambient: Option<AmbientDescription>,
    #[serde(default)]
    geometries: Vec<GeometryDescription>,
    #[serde(default)]
    lights: Vec<LightDescription>,
}

impl SceneDescription {
    fn into_scene(self, fallback_name: &str) -> LoadResult<Scene> {
        let name = self.name.unwrap_or_else(|| fallback_name.to_string());

        let mut geometries = Geometries::new();
        for description in self.geometries {
            let geometry = Geometry::new(description.shape.build()?)
                .with_emission(description.emission)
                .with_material(description.material.into());
            log::debug!("Scene '{}': adding {:?}", name, geometry.shape());
            geometries.add(geometry);
        }

        let lights = self
            .lights
            .into_iter()
            .map(LightDescription::build)
            .collect::<LoadResult<Vec<_>>>()?;
        if lights.is_empty() {
            log::warn!("Scene '{}' has no light sources", name);
        }

        let ambient = self
            .ambient
            .map(|a| AmbientLight::new(a.color, a.ka))
            .unwrap_or_default();

        log::info!(
            "Loaded scene '{}': {} geometries, {} lights",
            name,
            geometries.len(),
            lights.len()
        );

        Ok(Scene::new(name)
            .with_geometries(geometries)
            .with_ambient(ambient)
            .with_background(self.background)
            .with_lights(lights))
    }
}

/// Parse a scene from JSON text.
///
/// Scenes without a `name` are called `"scene"`.
pub fn parse_scene(json: &str) -> LoadResult<Scene> {
    parse_scene_named(json, "scene")
}

/// Parse a scene from JSON text, naming it `fallback_name` unless the
/// description carries its own `name`.
pub fn parse_scene_named(json: &str, fallback_name: &str) -> LoadResult<Scene> {
    let description: SceneDescription = serde_json::from_str(json)?;
    description.into_scene(fallback_name)
}

/// Load a scene from a JSON file.
///
/// Scenes without a `name` are named after the file stem.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene");
    parse_scene_named(&content, stem)
}
