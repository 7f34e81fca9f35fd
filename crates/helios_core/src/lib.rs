//! Helios Core - scene model and geometry kernel for the Helios ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: analytic primitives (sphere, plane, polygon, triangle,
//!   tube, cylinder), their intersection tests and the nestable
//!   [`Geometries`] composite
//! - **Shading inputs**: [`Color`], [`Material`] and the light sources
//! - **Scene loading**: JSON scene descriptions
//!
//! # Example
//!
//! ```ignore
//! use helios_core::description::load_scene;
//!
//! let scene = load_scene("demos/scenes/spheres.json")?;
//! println!("Loaded '{}' with {} lights", scene.name, scene.light_count());
//! ```

pub mod color;
pub mod description;
pub mod geometry;
pub mod light;
pub mod material;
pub mod scene;

// Re-export commonly used types
pub use color::Color;
pub use description::{load_scene, parse_scene, parse_scene_named, LoadError, LoadResult};
pub use geometry::{
    Crossings, Cylinder, Geometries, Geometry, GeometryError, Hit, Intersectable, Plane, Polygon,
    Shape, Sphere, Surface, Triangle, Tube,
};
pub use light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
pub use material::Material;
pub use scene::Scene;
