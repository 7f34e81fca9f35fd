//! Light sources.
//!
//! [`AmbientLight`] is a constant term added once per hit. The positional and
//! directional lights are gathered in the closed [`LightSource`] enum, which is
//! what the tracer iterates over for direct lighting and shadows.

use glam::DVec3;
use helios_math::{align_zero, Point3, Vector3};

use crate::color::Color;

/// Uniform light reaching every point, scaled by an attenuation factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// Ambient light of color `ia` attenuated by `ka`.
    pub fn new(ia: Color, ka: impl Into<DVec3>) -> Self {
        Self {
            intensity: ia * ka.into(),
        }
    }

    /// No ambient contribution.
    pub fn none() -> Self {
        Self {
            intensity: Color::BLACK,
        }
    }

    #[inline]
    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::none()
    }
}

/// Light arriving from infinitely far away along a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vector3,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vector3) -> Self {
        Self {
            intensity,
            direction: direction.normalize(),
        }
    }
}

/// Omni-directional light at a position, dimmed by `kc + kl·d + kq·d²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    intensity: Color,
    position: Point3,
    kc: f64,
    kl: f64,
    kq: f64,
}

impl PointLight {
    pub fn new(intensity: Color, position: Point3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.kq = kq;
        self
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }

    fn intensity_at(&self, p: Point3) -> Color {
        let d2 = p.distance_squared(self.position);
        let dim = self.kc + self.kl * d2.sqrt() + self.kq * d2;
        self.intensity.reduce(dim)
    }

    fn direction(&self, p: Point3) -> Option<Vector3> {
        p.subtract(self.position).ok().map(|v| v.normalize())
    }
}

/// A point light restricted to a cone around `direction`.
///
/// The intensity is scaled by `max(0, dir·l)^narrow_beam`; larger exponents
/// give a tighter beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    point: PointLight,
    direction: Vector3,
    narrow_beam: f64,
}

impl SpotLight {
    pub fn new(intensity: Color, position: Point3, direction: Vector3) -> Self {
        Self {
            point: PointLight::new(intensity, position),
            direction: direction.normalize(),
            narrow_beam: 1.0,
        }
    }

    pub fn with_kc(mut self, kc: f64) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: f64) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: f64) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }

    pub fn with_narrow_beam(mut self, narrow_beam: f64) -> Self {
        self.narrow_beam = narrow_beam;
        self
    }

    fn intensity_at(&self, p: Point3) -> Color {
        let Some(l) = self.point.direction(p) else {
            return Color::BLACK;
        };
        let factor = align_zero(self.direction.dot(l));
        if factor <= 0.0 {
            return Color::BLACK;
        }
        self.point.intensity_at(p).scale(factor.powf(self.narrow_beam))
    }
}

/// Any light that illuminates from a direction and casts shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource {
    /// Intensity of this light arriving at `p`.
    pub fn intensity_at(&self, p: Point3) -> Color {
        match self {
            LightSource::Directional(light) => light.intensity,
            LightSource::Point(light) => light.intensity_at(p),
            LightSource::Spot(light) => light.intensity_at(p),
        }
    }

    /// Unit direction from the light towards `p`.
    ///
    /// `None` when `p` coincides with a positional light.
    pub fn direction(&self, p: Point3) -> Option<Vector3> {
        match self {
            LightSource::Directional(light) => Some(light.direction),
            LightSource::Point(light) => light.direction(p),
            LightSource::Spot(light) => light.point.direction(p),
        }
    }

    /// Distance from the light to `p`; infinite for directional lights.
    pub fn distance(&self, p: Point3) -> f64 {
        match self {
            LightSource::Directional(_) => f64::INFINITY,
            LightSource::Point(light) => light.position.distance(p),
            LightSource::Spot(light) => light.point.position.distance(p),
        }
    }
}

impl From<DirectionalLight> for LightSource {
    fn from(light: DirectionalLight) -> Self {
        LightSource::Directional(light)
    }
}

impl From<PointLight> for LightSource {
    fn from(light: PointLight) -> Self {
        LightSource::Point(light)
    }
}

impl From<SpotLight> for LightSource {
    fn from(light: SpotLight) -> Self {
        LightSource::Spot(light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_color(a: Color, b: Color) -> bool {
        (a.as_dvec3() - b.as_dvec3()).abs().max_element() < 1e-9
    }

    #[test]
    fn test_ambient_intensity() {
        let ambient = AmbientLight::new(Color::new(200.0, 100.0, 50.0), DVec3::splat(0.5));
        assert_eq!(ambient.intensity(), Color::new(100.0, 50.0, 25.0));
        assert_eq!(AmbientLight::default().intensity(), Color::BLACK);
    }

    #[test]
    fn test_directional_light() {
        let light: LightSource =
            DirectionalLight::new(Color::WHITE, Vector3::new(0.0, 0.0, -5.0).unwrap()).into();
        let p = Point3::new(3.0, 4.0, 5.0);
        assert_eq!(light.intensity_at(p), Color::WHITE);
        assert_eq!(light.direction(p), Some(-Vector3::Z));
        assert_eq!(light.distance(p), f64::INFINITY);
    }

    #[test]
    fn test_point_light_attenuation() {
        let light: LightSource = PointLight::new(Color::new(100.0, 100.0, 100.0), Point3::ORIGIN)
            .with_kl(0.5)
            .with_kq(0.25)
            .into();
        let p = Point3::new(0.0, 0.0, 2.0);
        // 1 + 0.5*2 + 0.25*4 = 3
        assert!(approx_color(
            light.intensity_at(p),
            Color::new(100.0, 100.0, 100.0) / 3.0
        ));
        assert_eq!(light.direction(p), Some(Vector3::Z));
        assert!((light.distance(p) - 2.0).abs() < 1e-12);
        assert_eq!(light.direction(Point3::ORIGIN), None);
    }

    #[test]
    fn test_spot_light_cone() {
        let spot: LightSource = SpotLight::new(Color::WHITE, Point3::ORIGIN, -Vector3::Z).into();

        // Straight down the beam: full intensity
        let below = Point3::new(0.0, 0.0, -1.0);
        assert!(approx_color(spot.intensity_at(below), Color::WHITE));

        // Behind the light: nothing
        let behind = Point3::new(0.0, 0.0, 1.0);
        assert_eq!(spot.intensity_at(behind), Color::BLACK);

        // At 45 degrees the factor is cos(45)
        let side = Point3::new(1.0, 0.0, -1.0);
        let expected = Color::WHITE * std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_color(spot.intensity_at(side), expected));
    }

    #[test]
    fn test_narrow_beam_tightens() {
        let wide = SpotLight::new(Color::WHITE, Point3::ORIGIN, -Vector3::Z);
        let narrow = wide.with_narrow_beam(10.0);
        let side = Point3::new(1.0, 0.0, -1.0);
        let wide_i = LightSource::from(wide).intensity_at(side);
        let narrow_i = LightSource::from(narrow).intensity_at(side);
        assert!(narrow_i.r() < wide_i.r());
    }
}
