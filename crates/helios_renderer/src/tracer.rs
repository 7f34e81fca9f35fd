//! Whitted-style recursive ray tracer.
//!
//! The color at a hit is the sum of:
//!
//! - **Local effects**: the geometry's emission plus diffuse and specular
//!   (Phong) light from every light source that reaches the point, attenuated
//!   by the transparency of anything in between
//! - **Global effects**: the color seen along the reflected and refracted
//!   rays, weighted by the material's `kr` and `kt`
//!
//! Recursion stops at the configured level, or earlier once the accumulated
//! attenuation `k` drops below [`MIN_CALC_COLOR_K`] on every channel.

use glam::DVec3;
use helios_core::{Color, Hit, Intersectable, LightSource, Material, Scene};
use helios_math::{align_zero, is_zero, Ray, Vector3};

use crate::sampling::BeamSampler;

/// Default recursion depth for reflection and refraction.
pub const DEFAULT_MAX_LEVEL: u32 = 10;
/// Recursion depth can never be configured above this.
pub const HARD_MAX_LEVEL: u32 = 32;
/// Attenuation below which a contribution is not computed.
pub const MIN_CALC_COLOR_K: f64 = 0.001;

/// Computes the color seen along a ray.
pub trait RayTracer: Send + Sync {
    fn trace(&self, ray: &Ray) -> Color;
}

#[inline]
fn below_threshold(k: DVec3) -> bool {
    k.max_element() < MIN_CALC_COLOR_K
}

/// Recursive tracer over a borrowed scene.
pub struct BasicRayTracer<'s> {
    scene: &'s Scene,
    max_level: u32,
    beam: BeamSampler,
}

impl<'s> BasicRayTracer<'s> {
    /// Create a tracer with the default recursion depth and beam sampler.
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            max_level: DEFAULT_MAX_LEVEL,
            beam: BeamSampler::default(),
        }
    }

    /// Set the recursion depth, clamped to `1..=HARD_MAX_LEVEL`.
    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level.clamp(1, HARD_MAX_LEVEL);
        self
    }

    /// Set the sampler used for glossy and diffuse-glass materials.
    pub fn with_beam(mut self, beam: BeamSampler) -> Self {
        self.beam = beam;
        self
    }

    #[inline]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    #[inline]
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    fn color_at(&self, hit: &Hit<'_>, ray: &Ray, level: u32, k: DVec3) -> Color {
        let color = self.local_effects(hit, ray, k);
        if level <= 1 {
            color
        } else {
            color + self.global_effects(hit, ray, level, k)
        }
    }

    fn local_effects(&self, hit: &Hit<'_>, ray: &Ray, k: DVec3) -> Color {
        let geometry = hit.geometry;
        let mut color = geometry.emission();

        let v = ray.direction();
        let n = hit.normal();
        let nv = align_zero(n.dot(v));
        if nv == 0.0 {
            return color;
        }

        let material = geometry.material();
        for light in &self.scene.lights {
            let Some(l) = light.direction(hit.point) else {
                continue;
            };
            let nl = align_zero(n.dot(l));
            // Light and viewer must be on the same side of the surface
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(hit, light, l, n);
            if below_threshold(ktr * k) {
                continue;
            }

            let intensity = light.intensity_at(hit.point) * ktr;
            let response = diffuse(material, nl) + specular(material, n, l, nl, v);
            color = color + intensity * response;
        }
        color
    }

    /// Fraction of the light that reaches the hit through transparent blockers.
    fn transparency(&self, hit: &Hit<'_>, light: &LightSource, l: Vector3, n: Vector3) -> DVec3 {
        let shadow_ray = Ray::offset(hit.point, -l, n);
        let light_distance = light.distance(hit.point);

        let mut ktr = DVec3::ONE;
        for blocker in self.scene.geometries.find_intersections(&shadow_ray) {
            if align_zero(blocker.point.distance(hit.point) - light_distance) < 0.0 {
                ktr *= blocker.geometry.material().kt;
                if below_threshold(ktr) {
                    return DVec3::ZERO;
                }
            }
        }
        ktr
    }

    fn global_effects(&self, hit: &Hit<'_>, ray: &Ray, level: u32, k: DVec3) -> Color {
        let v = ray.direction();
        let n = hit.normal();
        let material = hit.geometry.material();

        let reflected = Ray::offset(hit.point, v.reflect(n), n);
        let refracted = Ray::offset(hit.point, v, n);

        self.global_effect(&reflected, n, level, k, material.kr, material.ksg)
            + self.global_effect(&refracted, n, level, k, material.kt, material.kdg)
    }

    fn global_effect(
        &self,
        ray: &Ray,
        n: Vector3,
        level: u32,
        k: DVec3,
        kx: DVec3,
        spread: f64,
    ) -> Color {
        let kkx = k * kx;
        if below_threshold(kkx) {
            return Color::BLACK;
        }

        let color = if is_zero(spread) {
            self.secondary_color(ray, level, kkx)
        } else {
            let beam = self.beam.sample(ray, spread, n);
            if beam.is_empty() {
                self.secondary_color(ray, level, kkx)
            } else {
                Color::average(beam.iter().map(|r| self.secondary_color(r, level, kkx)))
            }
        };
        color * kx
    }

    fn secondary_color(&self, ray: &Ray, level: u32, kkx: DVec3) -> Color {
        match self.scene.geometries.find_closest(ray) {
            None => self.scene.background,
            Some(hit) => {
                if is_zero(hit.normal().dot(ray.direction())) {
                    Color::BLACK
                } else {
                    self.color_at(&hit, ray, level - 1, kkx)
                }
            }
        }
    }
}

fn diffuse(material: &Material, nl: f64) -> DVec3 {
    material.kd * nl.abs()
}

fn specular(material: &Material, n: Vector3, l: Vector3, nl: f64, v: Vector3) -> DVec3 {
    let r = l.as_dvec3() - n.as_dvec3() * (2.0 * nl);
    let vr = align_zero(-v.as_dvec3().dot(r)).max(0.0);
    material.ks * vr.powi(material.shininess)
}

impl RayTracer for BasicRayTracer<'_> {
    fn trace(&self, ray: &Ray) -> Color {
        match self.scene.geometries.find_closest(ray) {
            None => self.scene.background,
            Some(hit) => {
                self.scene.ambient.intensity()
                    + self.color_at(&hit, ray, self.max_level, DVec3::ONE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_core::{AmbientLight, DirectionalLight, Geometry, Plane, PointLight, Sphere};
    use helios_math::Point3;

    fn approx(a: Color, b: Color) -> bool {
        (a.as_dvec3() - b.as_dvec3()).abs().max_element() < 1e-6
    }

    fn gray(v: f64) -> Color {
        Color::new(v, v, v)
    }

    fn floor(material: Material) -> Geometry {
        Geometry::new(Plane::new(Point3::ORIGIN, Vector3::Z)).with_material(material)
    }

    fn down_ray() -> Ray {
        Ray::new(Point3::new(0.0, 0.0, 10.0), -Vector3::Z)
    }

    fn sun() -> DirectionalLight {
        DirectionalLight::new(Color::WHITE, -Vector3::Z)
    }

    #[test]
    fn test_max_level_clamped() {
        let scene = Scene::new("empty");
        assert_eq!(BasicRayTracer::new(&scene).max_level(), DEFAULT_MAX_LEVEL);
        assert_eq!(BasicRayTracer::new(&scene).with_max_level(100).max_level(), HARD_MAX_LEVEL);
        assert_eq!(BasicRayTracer::new(&scene).with_max_level(0).max_level(), 1);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new("empty").with_background(gray(42.0));
        let tracer = BasicRayTracer::new(&scene);
        assert_eq!(tracer.trace(&down_ray()), gray(42.0));
    }

    #[test]
    fn test_ambient_and_emission() {
        let scene = Scene::new("ambient")
            .with_ambient(AmbientLight::new(Color::WHITE, DVec3::splat(0.2)))
            .with_geometry(floor(Material::default()).with_emission(Color::new(10.0, 0.0, 5.0)));
        let tracer = BasicRayTracer::new(&scene);
        assert!(approx(tracer.trace(&down_ray()), Color::new(61.0, 51.0, 56.0)));
    }

    #[test]
    fn test_diffuse_and_specular() {
        let material = Material::new()
            .with_kd(DVec3::splat(0.5))
            .with_ks(DVec3::splat(0.25))
            .with_shininess(20);
        let scene = Scene::new("lit").with_geometry(floor(material)).with_light(sun());
        let tracer = BasicRayTracer::new(&scene);
        assert!(approx(tracer.trace(&down_ray()), gray(255.0 * 0.75)));
    }

    #[test]
    fn test_light_behind_surface_ignored() {
        let material = Material::new().with_kd(DVec3::ONE);
        let scene = Scene::new("backlit")
            .with_geometry(floor(material))
            .with_light(PointLight::new(Color::WHITE, Point3::new(0.0, 0.0, -5.0)));
        let tracer = BasicRayTracer::new(&scene);
        assert_eq!(tracer.trace(&down_ray()), Color::BLACK);
    }

    #[test]
    fn test_shadows() {
        let material = Material::new().with_kd(DVec3::splat(0.5));
        let blocker = |kt: f64| {
            Geometry::new(Sphere::new(Point3::new(3.0, 0.0, 5.0), 1.0).unwrap())
                .with_material(Material::new().with_kt(DVec3::splat(kt)))
        };
        // Looking at the floor point right below the blocker
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vector3::new(3.0, 0.0, -10.0).unwrap());

        let opaque = Scene::new("opaque")
            .with_geometry(floor(material))
            .with_geometry(blocker(0.0))
            .with_light(sun());
        assert_eq!(BasicRayTracer::new(&opaque).with_max_level(1).trace(&ray), Color::BLACK);

        // Light crosses the transparent sphere twice
        let glass = Scene::new("glass")
            .with_geometry(floor(material))
            .with_geometry(blocker(0.5))
            .with_light(sun());
        let color = BasicRayTracer::new(&glass).with_max_level(1).trace(&ray);
        assert!(approx(color, gray(127.5 * 0.25)));
    }

    fn mirror_box(kr: f64) -> Scene {
        let mirror = Material::new().with_kr(DVec3::splat(kr));
        Scene::new("mirrors")
            .with_geometry(
                Geometry::new(Plane::new(Point3::ORIGIN, Vector3::Z))
                    .with_material(mirror)
                    .with_emission(gray(10.0)),
            )
            .with_geometry(
                Geometry::new(Plane::new(Point3::new(0.0, 0.0, 10.0), -Vector3::Z))
                    .with_material(mirror)
                    .with_emission(gray(10.0)),
            )
    }

    #[test]
    fn test_reflection_attenuates_with_depth() {
        let scene = mirror_box(0.5);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vector3::Z);

        let colors: Vec<f64> = (1..=HARD_MAX_LEVEL)
            .map(|level| BasicRayTracer::new(&scene).with_max_level(level).trace(&ray).r())
            .collect();

        // Each bounce adds half of the previous one: 10 * (2 - 2^(1-L))
        for (i, c) in colors.iter().take(10).enumerate() {
            let level = i as i32 + 1;
            assert!((c - 10.0 * (2.0 - 2f64.powi(1 - level))).abs() < 1e-9);
        }
        for pair in colors.windows(2) {
            assert!(pair[1] >= pair[0]);
            assert!(pair[1] - pair[0] <= 10.0);
        }
        // Below the attenuation threshold deeper levels change nothing
        assert_eq!(colors[15], colors[31]);
        assert!(colors[31] < 20.0);
    }

    #[test]
    fn test_refraction_passes_straight_through() {
        let glass = Material::new().with_kt(DVec3::splat(0.5));
        let scene = Scene::new("window")
            .with_background(gray(100.0))
            .with_geometry(
                Geometry::new(Plane::new(Point3::new(0.0, 0.0, 5.0), Vector3::Z)).with_material(glass),
            )
            .with_geometry(floor(Material::default()).with_emission(gray(80.0)));
        let tracer = BasicRayTracer::new(&scene);
        // Through the window onto the emissive floor
        assert!(approx(tracer.trace(&down_ray()), gray(40.0)));
    }

    #[test]
    fn test_glossy_reflection_averages_beam() {
        let glossy = Material::new().with_kr(DVec3::splat(0.5)).with_ksg(0.5);
        let scene = Scene::new("glossy")
            .with_background(gray(100.0))
            .with_geometry(floor(glossy));
        let tracer = BasicRayTracer::new(&scene);
        // Every beam sample escapes to the background
        assert!(approx(tracer.trace(&down_ray()), gray(50.0)));
    }
}
