//! Gaussian blur approximated by three successive box blurs per axis.
//!
//! Each pass runs a sliding-window box filter horizontally and then vertically. Three passes of a
//! box of width `d` approximate a Gaussian with standard deviation `d / 1.88` closely enough for
//! display work, at a cost independent of the radius.

use crate::foundation::pixel::Channels;
use crate::foundation::surface::{Surface, SurfaceMut, overlap};

/// `3 * sqrt(2 * pi) / 4`, the box width per unit of standard deviation.
pub const KERNEL_FACTOR: f32 = 1.879_971_2;

/// Upper bound on the box width along either axis.
pub const MAX_KERNEL_SIZE: usize = 512;

const PASSES: usize = 3;

/// Box width for a standard deviation, `floor(std_dev * KERNEL_FACTOR + 0.5)`.
///
/// Returns 0 (no blur on that axis) for non-positive or NaN input and caps at
/// [`MAX_KERNEL_SIZE`].
pub fn kernel_size(std_dev: f32) -> usize {
    let k = (std_dev * KERNEL_FACTOR + 0.5).floor();
    if k >= 1.0 {
        // Saturating cast; the cap keeps the ring buffer bounded.
        (k as usize).min(MAX_KERNEL_SIZE)
    } else {
        0
    }
}

/// Blur `src` into `out` with the given per-axis standard deviations.
///
/// Only the overlapping region is touched. When both kernels round to zero the region is
/// copied unchanged. Edge pixels are averaged against implicit transparent black.
#[tracing::instrument(level = "trace", skip(src, out))]
pub fn gaussian_blur(src: &Surface<'_>, out: &mut SurfaceMut<'_>, std_dev_x: f32, std_dev_y: f32) {
    let extent = overlap([src.extent(), out.extent()]);
    let mut region = out.sub_mut(0, 0, extent.width, extent.height);
    region.copy_from(src);
    blur_region(&mut region, std_dev_x, std_dev_y);
}

/// In-place form of [`gaussian_blur`].
#[tracing::instrument(level = "trace", skip(surface))]
pub fn gaussian_blur_in_place(surface: &mut SurfaceMut<'_>, std_dev_x: f32, std_dev_y: f32) {
    blur_region(surface, std_dev_x, std_dev_y);
}

fn blur_region(surface: &mut SurfaceMut<'_>, std_dev_x: f32, std_dev_y: f32) {
    let kernel_x = kernel_size(std_dev_x).min(usize::from(surface.width()));
    let kernel_y = kernel_size(std_dev_y).min(usize::from(surface.height()));
    tracing::debug!(kernel_x, kernel_y, "box blur kernels");
    if kernel_x == 0 && kernel_y == 0 {
        return;
    }

    let mut ring = [0u32; MAX_KERNEL_SIZE];
    for _ in 0..PASSES {
        box_pass(surface, kernel_x, kernel_y, &mut ring);
    }
}

fn box_pass(surface: &mut SurfaceMut<'_>, kernel_x: usize, kernel_y: usize, ring: &mut [u32]) {
    let width = usize::from(surface.width());
    let height = usize::from(surface.height());
    let stride = surface.stride() as usize;
    let pixels = surface.raw_mut();

    if kernel_x > 0 {
        for y in 0..height {
            box_line(pixels, y * stride, 1, width, kernel_x, ring);
        }
    }
    if kernel_y > 0 {
        for x in 0..width {
            box_line(pixels, x, stride, height, kernel_y, ring);
        }
    }
}

/// Running sum of four channels.
#[derive(Clone, Copy, Default)]
struct Sum {
    r: u32,
    g: u32,
    b: u32,
    a: u32,
}

impl Sum {
    fn add(&mut self, px: u32) {
        let c = Channels::unpack(px);
        self.r += c.r;
        self.g += c.g;
        self.b += c.b;
        self.a += c.a;
    }

    fn sub(&mut self, px: u32) {
        let c = Channels::unpack(px);
        self.r -= c.r;
        self.g -= c.g;
        self.b -= c.b;
        self.a -= c.a;
    }

    fn mean(self, n: u32) -> u32 {
        Channels::new(self.r / n, self.g / n, self.b / n, self.a / n).pack()
    }
}

/// Box-filter `len` pixels starting at `start`, `step` apart, in place.
///
/// The window's inputs are kept in `ring`, so writes (which trail the read head by
/// `kernel / 2`) never feed back into the sum.
fn box_line(pixels: &mut [u32], start: usize, step: usize, len: usize, kernel: usize, ring: &mut [u32]) {
    let kernel = kernel.min(len);
    if kernel == 0 {
        return;
    }
    let half = kernel / 2;
    let n = kernel as u32;
    let mut sum = Sum::default();

    for i in 0..len + kernel {
        let slot = i % kernel;
        if i >= kernel {
            sum.sub(ring[slot]);
        }
        if i < len {
            let px = pixels[start + i * step];
            ring[slot] = px;
            sum.add(px);
        }
        if i >= half && i - half < len {
            pixels[start + (i - half) * step] = sum.mean(n);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
