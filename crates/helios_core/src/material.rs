//! Phong-style surface material.

use glam::DVec3;

/// Surface response coefficients.
///
/// `kd`/`ks` weight the diffuse and specular terms of direct lighting, `kr`/`kt`
/// the reflected and transmitted contributions. `kdg` and `ksg` spread the
/// refracted and reflected rays into a beam (diffuse glass and glossy
/// reflection); zero means a single ideal ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kd: DVec3,
    pub ks: DVec3,
    pub kr: DVec3,
    pub kt: DVec3,
    pub kdg: f64,
    pub ksg: f64,
    pub shininess: i32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: DVec3::ZERO,
            ks: DVec3::ZERO,
            kr: DVec3::ZERO,
            kt: DVec3::ZERO,
            kdg: 0.0,
            ksg: 0.0,
            shininess: 0,
        }
    }
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kd(mut self, kd: impl Into<DVec3>) -> Self {
        self.kd = kd.into();
        self
    }

    pub fn with_ks(mut self, ks: impl Into<DVec3>) -> Self {
        self.ks = ks.into();
        self
    }

    pub fn with_kr(mut self, kr: impl Into<DVec3>) -> Self {
        self.kr = kr.into();
        self
    }

    pub fn with_kt(mut self, kt: impl Into<DVec3>) -> Self {
        self.kt = kt.into();
        self
    }

    pub fn with_kdg(mut self, kdg: f64) -> Self {
        self.kdg = kdg;
        self
    }

    pub fn with_ksg(mut self, ksg: f64) -> Self {
        self.ksg = ksg;
        self
    }

    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }
}
