//! RGB colors on the 0..255 display scale.

use std::iter::Sum;
use std::ops::{Add, Div, Mul};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Maximum per-channel difference for two colors to count as similar.
///
/// One step of an 8-bit channel: colors closer than this are
/// indistinguishable in the output image.
pub const SIMILARITY_THRESHOLD: f64 = 1.0;

/// A non-negative RGB color.
///
/// Channels are kept unclamped while light is accumulated and only clamped to
/// 0..=255 when converted for output by [`Color::to_rgb8`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Color(DVec3);

impl Color {
    pub const BLACK: Color = Color(DVec3::ZERO);
    pub const WHITE: Color = Color(DVec3::splat(255.0));

    /// Create a color; negative channels are raised to zero.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self::from_dvec3(DVec3::new(r, g, b))
    }

    pub fn from_dvec3(rgb: DVec3) -> Self {
        Self(rgb.max(DVec3::ZERO))
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn g(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.0.z
    }

    #[inline]
    pub fn as_dvec3(&self) -> DVec3 {
        self.0
    }

    /// Multiply every channel by `factor`.
    pub fn scale(&self, factor: f64) -> Color {
        Self::from_dvec3(self.0 * factor)
    }

    /// Per-channel product with an attenuation factor.
    pub fn scale_rgb(&self, factor: DVec3) -> Color {
        Self::from_dvec3(self.0 * factor)
    }

    /// Divide every channel by `divisor`.
    pub fn reduce(&self, divisor: f64) -> Color {
        Self::from_dvec3(self.0 / divisor)
    }

    /// Average of a set of colors, black when empty.
    pub fn average<I>(colors: I) -> Color
    where
        I: IntoIterator<Item = Color>,
    {
        let (sum, count) = colors
            .into_iter()
            .fold((DVec3::ZERO, 0usize), |(sum, n), c| (sum + c.0, n + 1));
        if count == 0 {
            Color::BLACK
        } else {
            Color(sum / count as f64)
        }
    }

    /// True when every channel differs from `other` by at most
    /// [`SIMILARITY_THRESHOLD`].
    pub fn similar(&self, other: Color) -> bool {
        (self.0 - other.0).abs().max_element() <= SIMILARITY_THRESHOLD
    }

    /// Clamp to 0..=255 and round to 8-bit channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.0.clamp(DVec3::ZERO, DVec3::splat(255.0)).round();
        [c.x as u8, c.y as u8, c.z as u8]
    }
}

impl From<[f64; 3]> for Color {
    fn from(a: [f64; 3]) -> Self {
        Self::from_dvec3(DVec3::from_array(a))
    }
}

impl From<Color> for [f64; 3] {
    fn from(c: Color) -> Self {
        c.0.to_array()
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color(self.0 + rhs.0)
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Color {
        self.scale(rhs)
    }
}

impl Mul<DVec3> for Color {
    type Output = Color;

    fn mul(self, rhs: DVec3) -> Color {
        self.scale_rgb(rhs)
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, rhs: f64) -> Color {
        self.reduce(rhs)
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::BLACK, |acc, c| acc + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_channels_clamped() {
        let c = Color::new(-5.0, 10.0, 300.0);
        assert_eq!(c.as_dvec3(), DVec3::new(0.0, 10.0, 300.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Color::new(10.0, 20.0, 30.0);
        let b = Color::new(1.0, 2.0, 3.0);

        assert_eq!(a + b, Color::new(11.0, 22.0, 33.0));
        assert_eq!(a * 2.0, Color::new(20.0, 40.0, 60.0));
        assert_eq!(a / 10.0, Color::new(1.0, 2.0, 3.0));
        assert_eq!(
            a * DVec3::new(0.5, 0.0, 1.0),
            Color::new(5.0, 0.0, 30.0)
        );
        assert_eq!([a, b].into_iter().sum::<Color>(), a + b);
    }

    #[test]
    fn test_average() {
        let avg = Color::average([Color::new(0.0, 0.0, 0.0), Color::new(100.0, 50.0, 10.0)]);
        assert_eq!(avg, Color::new(50.0, 25.0, 5.0));
        assert_eq!(Color::average(Vec::new()), Color::BLACK);
    }

    #[test]
    fn test_similar() {
        let a = Color::new(100.0, 100.0, 100.0);
        assert!(a.similar(Color::new(100.5, 99.0, 101.0)));
        assert!(!a.similar(Color::new(100.0, 100.0, 101.5)));
    }

    #[test]
    fn test_to_rgb8_clamps() {
        assert_eq!(Color::new(-1.0, 127.6, 1000.0).to_rgb8(), [0, 128, 255]);
    }
}
