//! Pixel hand-out and progress tracking for render workers.
//!
//! Workers pull pixels one at a time from a shared [`PixelQueue`] until it is
//! exhausted, so faster workers naturally take more of the image. Both the
//! queue and [`Progress`] are lock-free.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::info;

/// Shared counter over the pixels of a `width × height` image, in row-major
/// order.
#[derive(Debug)]
pub struct PixelQueue {
    width: u32,
    height: u32,
    next: AtomicUsize,
}

impl PixelQueue {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next: AtomicUsize::new(0),
        }
    }

    /// Total number of pixels.
    pub fn total(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Claim the next unrendered pixel as `(col, row)`.
    pub fn next_pixel(&self) -> Option<(u32, u32)> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        if index >= self.total() {
            return None;
        }
        let width = self.width as usize;
        Some(((index % width) as u32, (index / width) as u32))
    }
}

/// Counts finished pixels and logs the percentage done at most once per
/// interval.
#[derive(Debug)]
pub struct Progress {
    total: usize,
    done: AtomicUsize,
    start: Instant,
    interval: Option<Duration>,
    last_report_ms: AtomicU64,
}

impl Progress {
    pub fn new(total: usize, interval: Option<Duration>) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            start: Instant::now(),
            interval,
            last_report_ms: AtomicU64::new(0),
        }
    }

    /// Record one finished pixel.
    pub fn pixel_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let Some(interval) = self.interval else {
            return;
        };

        let now = self.start.elapsed().as_millis() as u64;
        let last = self.last_report_ms.load(Ordering::Relaxed);
        if now.saturating_sub(last) < interval.as_millis() as u64 {
            return;
        }
        // Only the worker that wins the exchange reports
        if self
            .last_report_ms
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            info!(
                "Rendered {:.1}% ({}/{} pixels)",
                self.percent(done),
                done,
                self.total
            );
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn percent(&self, done: usize) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            done as f64 * 100.0 / self.total as f64
        }
    }
}
