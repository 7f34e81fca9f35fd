//! Image sinks: where rendered pixels go.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use helios_core::Color;
use image::{ImageFormat, Rgb, RgbImage};
use log::{info, warn};

use crate::renderer::RenderError;

/// Destination for rendered pixels.
///
/// `write_pixel` takes `&self` and is called concurrently from render
/// workers, always for distinct pixels.
pub trait ImageSink: Sync {
    /// Image size as `(columns, rows)`.
    fn resolution(&self) -> (u32, u32);

    fn write_pixel(&self, col: u32, row: u32, color: Color);

    /// Called once after every pixel has been written.
    fn finalize(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// In-memory image that accepts concurrent pixel writes.
///
/// Each channel is stored as the bit pattern of an `f64` in an `AtomicU64`,
/// so colors stay unclamped until conversion.
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[AtomicU64; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: (0..count).map(|_| Default::default()).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, col: u32, row: u32) -> Option<usize> {
        (col < self.width && row < self.height)
            .then(|| row as usize * self.width as usize + col as usize)
    }

    /// Color at `(col, row)`, or `None` outside the image.
    pub fn get(&self, col: u32, row: u32) -> Option<Color> {
        let [r, g, b] = &self.pixels[self.index(col, row)?];
        let load = |c: &AtomicU64| f64::from_bits(c.load(Ordering::Relaxed));
        Some(Color::new(load(r), load(g), load(b)))
    }

    /// Set the color at `(col, row)`; writes outside the image are dropped.
    pub fn set(&self, col: u32, row: u32, color: Color) {
        let Some(index) = self.index(col, row) else {
            warn!(
                "Pixel ({col}, {row}) outside {}x{} image ignored",
                self.width, self.height
            );
            return;
        };
        let rgb = color.as_dvec3().to_array();
        for (channel, value) in self.pixels[index].iter().zip(rgb) {
            channel.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Overlay grid lines every `interval` pixels.
    pub fn draw_grid(&self, interval: u32, color: Color) {
        if interval == 0 {
            return;
        }
        for row in 0..self.height {
            for col in 0..self.width {
                if col % interval == 0 || row % interval == 0 {
                    self.set(col, row, color);
                }
            }
        }
    }

    /// Convert to an 8-bit RGB image, clamping every channel to 0..=255.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |col, row| {
            Rgb(self.get(col, row).unwrap_or(Color::BLACK).to_rgb8())
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        self.to_rgb_image()
            .save_with_format(path.as_ref(), ImageFormat::Png)?;
        Ok(())
    }
}

impl ImageSink for ImageBuffer {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_pixel(&self, col: u32, row: u32, color: Color) {
        self.set(col, row, color);
    }
}

/// Image buffer that is written to a PNG file when the render finishes.
pub struct ImageWriter {
    buffer: ImageBuffer,
    path: PathBuf,
    grid: Option<(u32, Color)>,
}

impl ImageWriter {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            buffer: ImageBuffer::new(width, height),
            path: path.into(),
            grid: None,
        }
    }

    /// Draw grid lines over the finished image before it is saved.
    pub fn with_grid(mut self, interval: u32, color: Color) -> Self {
        self.grid = Some((interval, color));
        self
    }

    pub fn buffer(&self) -> &ImageBuffer {
        &self.buffer
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSink for ImageWriter {
    fn resolution(&self) -> (u32, u32) {
        self.buffer.resolution()
    }

    fn write_pixel(&self, col: u32, row: u32, color: Color) {
        self.buffer.set(col, row, color);
    }

    fn finalize(&self) -> Result<(), RenderError> {
        if let Some((interval, color)) = self.grid {
            self.buffer.draw_grid(interval, color);
        }
        self.buffer.save_png(&self.path)?;
        info!(
            "Wrote {}x{} image to {}",
            self.buffer.width,
            self.buffer.height,
            self.path.display()
        );
        Ok(())
    }
}
