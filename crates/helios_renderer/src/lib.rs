//! Helios renderer: Whitted-style CPU ray tracing.
//!
//! A [`Camera`] turns pixels into primary rays, a [`RayTracer`] computes the
//! color seen along each ray, and [`render`] schedules the pixels of an
//! [`ImageSink`] across worker threads.

mod camera;
mod pixel;
mod renderer;
mod sampling;
mod sink;
mod tracer;

pub use camera::{Aperture, AntiAliasing, Camera, CameraError, ViewPlane};
pub use pixel::{PixelQueue, Progress};
pub use renderer::{render, RenderError};
pub use sampling::{BeamSampler, DEFAULT_BEAM_DISTANCE, DEFAULT_BEAM_EDGE, DEFAULT_BEAM_RESOLUTION};
pub use sink::{ImageBuffer, ImageSink, ImageWriter};
pub use tracer::{BasicRayTracer, RayTracer, DEFAULT_MAX_LEVEL, HARD_MAX_LEVEL, MIN_CALC_COLOR_K};
