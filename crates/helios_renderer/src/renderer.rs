//! Render scheduler.
//!
//! Casts camera rays for every pixel of an [`ImageSink`] and writes the traced
//! colors back, either on the calling thread or on a dedicated rayon pool.

use log::info;
use rayon::ThreadPoolBuilder;
use thiserror::Error;

use crate::camera::Camera;
use crate::pixel::{PixelQueue, Progress};
use crate::sink::ImageSink;
use crate::tracer::RayTracer;

/// Errors that abort a render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("camera has no view plane")]
    MissingViewPlane,

    #[error("image has zero area")]
    EmptyImage,

    #[error("failed to start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Render every pixel of `sink` as seen by `camera`, then finalize the sink.
///
/// Configuration problems are reported before any ray is cast. With more
/// than one configured thread, exactly that many workers pull pixels from a
/// shared queue until the image is done.
pub fn render(camera: &Camera, tracer: &dyn RayTracer, sink: &dyn ImageSink) -> Result<(), RenderError> {
    let view_plane = camera.view_plane().ok_or(RenderError::MissingViewPlane)?;
    let (nx, ny) = sink.resolution();
    if nx == 0 || ny == 0 {
        return Err(RenderError::EmptyImage);
    }

    let queue = PixelQueue::new(nx, ny);
    let progress = Progress::new(queue.total(), camera.progress_interval());
    let threads = camera.threads();
    info!("Rendering {}x{} image on {} thread(s)", nx, ny, threads.max(1));

    let worker = || {
        while let Some((col, row)) = queue.next_pixel() {
            let color = camera.render_pixel(&view_plane, tracer, nx, ny, col, row);
            sink.write_pixel(col, row, color);
            progress.pixel_done();
        }
    };

    if threads <= 1 {
        worker();
    } else {
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.scope(|s| {
            for _ in 0..threads {
                s.spawn(|_| worker());
            }
        });
    }

    info!(
        "Rendered {} pixels in {:.2?}",
        progress.done(),
        progress.elapsed()
    );
    sink.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::AntiAliasing;
    use crate::sink::ImageBuffer;
    use crate::tracer::BasicRayTracer;
    use glam::DVec3;
    use helios_core::{AmbientLight, Color, DirectionalLight, Geometry, Material, Scene, Sphere};
    use helios_math::{Point3, Ray, Vector3};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingSink {
        width: u32,
        height: u32,
        writes: Vec<AtomicUsize>,
        finalized: AtomicBool,
    }

    impl CountingSink {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                writes: (0..width * height).map(|_| AtomicUsize::new(0)).collect(),
                finalized: AtomicBool::new(false),
            }
        }
    }

    impl ImageSink for CountingSink {
        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn write_pixel(&self, col: u32, row: u32, _color: Color) {
            self.writes[(row * self.width + col) as usize].fetch_add(1, Ordering::Relaxed);
        }

        fn finalize(&self) -> Result<(), RenderError> {
            self.finalized.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingTracer {
        traces: AtomicUsize,
    }

    impl RayTracer for CountingTracer {
        fn trace(&self, _ray: &Ray) -> Color {
            self.traces.fetch_add(1, Ordering::Relaxed);
            Color::WHITE
        }
    }

    fn camera() -> Camera {
        Camera::new(Point3::ORIGIN, -Vector3::Z, Vector3::Y)
            .unwrap()
            .with_view_plane(200.0, 200.0, 1000.0)
            .unwrap()
    }

    fn lit_scene() -> Scene {
        let material = Material::new()
            .with_kd(DVec3::splat(0.5))
            .with_ks(DVec3::splat(0.5))
            .with_shininess(30);
        Scene::new("lit")
            .with_background(Color::new(0.0, 0.0, 40.0))
            .with_ambient(AmbientLight::new(Color::WHITE, DVec3::splat(0.1)))
            .with_geometry(
                Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -200.0), 20.0).unwrap())
                    .with_material(material)
                    .with_emission(Color::new(20.0, 0.0, 0.0)),
            )
            .with_light(DirectionalLight::new(
                Color::new(200.0, 150.0, 100.0),
                Vector3::new(1.0, -1.0, -1.0).unwrap().normalize(),
            ))
    }

    #[test]
    fn test_every_pixel_written_once() {
        let camera = camera().with_threads(4);
        let sink = CountingSink::new(31, 17);
        let tracer = CountingTracer::default();

        render(&camera, &tracer, &sink).unwrap();

        assert!(sink.writes.iter().all(|w| w.load(Ordering::Relaxed) == 1));
        assert_eq!(tracer.traces.load(Ordering::Relaxed), 31 * 17);
        assert!(sink.finalized.load(Ordering::Relaxed));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let _ = env_logger::builder().is_test(true).try_init();
        let scene = lit_scene();
        let tracer = BasicRayTracer::new(&scene);
        let camera = camera()
            .with_anti_aliasing(AntiAliasing::Adaptive { depth: 3 })
            .unwrap()
            .with_progress_interval(Duration::ZERO);

        let sequential = ImageBuffer::new(24, 24);
        render(&camera, &tracer, &sequential).unwrap();

        let parallel = ImageBuffer::new(24, 24);
        render(&camera.clone().with_threads(3), &tracer, &parallel).unwrap();

        for row in 0..24 {
            for col in 0..24 {
                assert_eq!(sequential.get(col, row), parallel.get(col, row));
            }
        }
        // The sphere is in the middle, the corners see the background
        assert_ne!(sequential.get(12, 12), Some(Color::new(0.0, 0.0, 40.0)));
        assert_eq!(sequential.get(0, 0), Some(Color::new(0.0, 0.0, 40.0)));
    }

    #[test]
    fn test_missing_view_plane() {
        let camera = Camera::new(Point3::ORIGIN, -Vector3::Z, Vector3::Y).unwrap();
        let sink = CountingSink::new(4, 4);
        let tracer = CountingTracer::default();

        let result = render(&camera, &tracer, &sink);
        assert!(matches!(result, Err(RenderError::MissingViewPlane)));
        assert_eq!(tracer.traces.load(Ordering::Relaxed), 0);
        assert!(!sink.finalized.load(Ordering::Relaxed));
    }

    #[test]
    fn test_empty_image() {
        let tracer = CountingTracer::default();
        let result = render(&camera().with_threads(2), &tracer, &ImageBuffer::new(0, 10));
        assert!(matches!(result, Err(RenderError::EmptyImage)));
        assert_eq!(tracer.traces.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_ambient_only_sphere() {
        let emission = Color::new(0.0, 0.0, 100.0);
        let background = Color::new(10.0, 20.0, 30.0);
        let scene = Scene::new("ambient")
            .with_background(background)
            .with_ambient(AmbientLight::new(Color::WHITE, DVec3::splat(0.2)))
            .with_geometry(
                Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -200.0), 60.0).unwrap())
                    .with_emission(emission),
            );
        let tracer = BasicRayTracer::new(&scene);
        let expected = Color::new(51.0, 51.0, 151.0);
        let close = |c: Option<Color>| {
            c.is_some_and(|c| (c.as_dvec3() - expected.as_dvec3()).abs().max_element() < 1e-9)
        };

        // The sphere fills the whole 200x200 view
        let image = ImageBuffer::new(20, 20);
        render(&camera().with_threads(2), &tracer, &image).unwrap();
        for row in 0..20 {
            for col in 0..20 {
                assert!(close(image.get(col, row)));
            }
        }

        // A wider view sees the background around the silhouette
        let wide = Camera::new(Point3::ORIGIN, -Vector3::Z, Vector3::Y)
            .unwrap()
            .with_view_plane(800.0, 800.0, 1000.0)
            .unwrap();
        let image = ImageBuffer::new(10, 10);
        render(&wide, &tracer, &image).unwrap();
        assert!(close(image.get(5, 5)));
        assert_eq!(image.get(0, 0), Some(background));
        assert_eq!(image.get(9, 0), Some(background));
    }
}
