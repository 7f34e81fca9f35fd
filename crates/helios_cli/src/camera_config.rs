//! The optional `camera` section of a scene file.

use anyhow::{bail, Result};
use helios_math::{Point3, Vector3};
use helios_renderer::{Aperture, AntiAliasing, Camera};
use serde::Deserialize;

/// Scene file fields read by the binary; everything else belongs to the
/// scene loader.
#[derive(Debug, Default, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub camera: Option<CameraConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    #[serde(default = "default_location")]
    location: Point3,
    #[serde(default)]
    to: Option<Vector3>,
    #[serde(default)]
    up: Option<Vector3>,
    #[serde(default)]
    look_at: Option<Point3>,
    #[serde(default)]
    rotate: f64,
    #[serde(default)]
    flip: bool,
    #[serde(default)]
    view_plane: ViewPlaneConfig,
    #[serde(default)]
    anti_aliasing: AntiAliasingConfig,
    #[serde(default)]
    aperture: Option<ApertureConfig>,
    #[serde(default)]
    threads: Option<usize>,
}

fn default_location() -> Point3 {
    Point3::new(0.0, 0.0, 1000.0)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewPlaneConfig {
    width: f64,
    height: f64,
    distance: f64,
}

impl Default for ViewPlaneConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 200.0,
            distance: 1000.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
enum AntiAliasingConfig {
    #[default]
    None,
    Regular {
        grid: u32,
    },
    Adaptive {
        depth: u32,
    },
}

impl From<&AntiAliasingConfig> for AntiAliasing {
    fn from(config: &AntiAliasingConfig) -> Self {
        match *config {
            AntiAliasingConfig::None => AntiAliasing::None,
            AntiAliasingConfig::Regular { grid } => AntiAliasing::Regular { grid },
            AntiAliasingConfig::Adaptive { depth } => AntiAliasing::Adaptive { depth },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApertureConfig {
    size: f64,
    focal_distance: f64,
    #[serde(default = "default_aperture_points")]
    points: u32,
}

fn default_aperture_points() -> u32 {
    3
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            to: None,
            up: None,
            look_at: None,
            rotate: 0.0,
            flip: false,
            view_plane: ViewPlaneConfig::default(),
            anti_aliasing: AntiAliasingConfig::default(),
            aperture: None,
            threads: None,
        }
    }
}

impl CameraConfig {
    /// Threads requested by the scene file, if any.
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn build(&self) -> Result<Camera> {
        let camera = match (self.look_at, self.to, self.up) {
            (Some(target), None, None) => Camera::look_at(self.location, target)?,
            (None, to, up) => Camera::new(
                self.location,
                to.unwrap_or(-Vector3::Z),
                up.unwrap_or(Vector3::Y),
            )?,
            (Some(_), _, _) => bail!("camera takes either `look_at` or `to`/`up`, not both"),
        };

        let mut camera = camera.rotate(self.rotate);
        if self.flip {
            camera = camera.flip();
        }

        let vp = &self.view_plane;
        let mut camera = camera
            .with_view_plane(vp.width, vp.height, vp.distance)?
            .with_anti_aliasing((&self.anti_aliasing).into())?;

        if let Some(aperture) = &self.aperture {
            camera = camera.with_aperture(Aperture {
                size: aperture.size,
                focal_distance: aperture.focal_distance,
                points: aperture.points,
            })?;
        }
        Ok(camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<CameraConfig> {
        serde_json::from_str::<SceneFile>(json).unwrap().camera
    }

    #[test]
    fn test_missing_camera_section() {
        assert!(parse(r#"{ "geometries": [], "lights": [] }"#).is_none());

        let camera = CameraConfig::default().build().unwrap();
        assert_eq!(camera.location(), Point3::new(0.0, 0.0, 1000.0));
        assert_eq!(camera.to(), -Vector3::Z);
        assert_eq!(camera.view_plane().map(|vp| vp.distance), Some(1000.0));
        assert_eq!(camera.anti_aliasing(), AntiAliasing::None);
    }

    #[test]
    fn test_full_camera_section() {
        let config = parse(
            r#"{
                "background": [0, 0, 0],
                "camera": {
                    "location": [0, 0, 500],
                    "look_at": [0, 0, 0],
                    "view_plane": { "width": 100, "height": 50, "distance": 250 },
                    "anti_aliasing": { "mode": "adaptive", "depth": 4 },
                    "aperture": { "size": 2.5, "focal_distance": 500 },
                    "threads": 8
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.threads(), Some(8));

        let camera = config.build().unwrap();
        assert_eq!(camera.location(), Point3::new(0.0, 0.0, 500.0));
        assert!((camera.to().z() + 1.0).abs() < 1e-12);
        assert_eq!(camera.anti_aliasing(), AntiAliasing::Adaptive { depth: 4 });
        assert_eq!(camera.aperture().map(|a| a.points), Some(3));
        let vp = camera.view_plane().unwrap();
        assert_eq!((vp.width, vp.height, vp.distance), (100.0, 50.0, 250.0));
    }

    #[test]
    fn test_regular_and_rotation() {
        let config = parse(
            r#"{ "camera": {
                "to": [0, 1, 0], "up": [0, 0, 1],
                "rotate": 90, "flip": true,
                "anti_aliasing": { "mode": "regular", "grid": 3 }
            } }"#,
        )
        .unwrap();
        let camera = config.build().unwrap();
        assert_eq!(camera.anti_aliasing(), AntiAliasing::Regular { grid: 3 });
        assert!(camera.to().dot(camera.up()).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_camera() {
        let both = parse(r#"{ "camera": { "look_at": [0, 0, 0], "to": [0, 0, -1] } }"#).unwrap();
        assert!(both.build().is_err());

        let skewed = parse(r#"{ "camera": { "to": [0, 0, -1], "up": [0, 1, -1] } }"#).unwrap();
        assert!(skewed.build().is_err());

        let zero_grid = parse(r#"{ "camera": { "anti_aliasing": { "mode": "regular", "grid": 0 } } }"#).unwrap();
        assert!(zero_grid.build().is_err());

        assert!(serde_json::from_str::<SceneFile>(r#"{ "camera": { "fov": 90 } }"#).is_err());
        assert!(serde_json::from_str::<SceneFile>(r#"{ "camera": { "to": [0, 0, 0] } }"#).is_err());
    }

    #[test]
    fn test_demo_scenes_load() {
        for name in ["spheres", "glass_room"] {
            let path = format!("{}/../../demos/scenes/{name}.json", env!("CARGO_MANIFEST_DIR"));
            let text = std::fs::read_to_string(&path).unwrap();
            helios_core::parse_scene(&text).unwrap();
            let config = parse(&text).unwrap();
            config.build().unwrap();
        }
    }
}
