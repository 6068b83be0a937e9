//! 5x4 color matrices over straight (unpremultiplied) channels.

use crate::foundation::pixel::{Channels, ClampChannel};
use crate::foundation::surface::{Surface, SurfaceMut, Unary};

/// Row-major 4x5 affine color map.
///
/// Row `i` computes one output channel (R, G, B, A in that order) as
/// `m[5i]*R + m[5i+1]*G + m[5i+2]*B + m[5i+3]*A + m[5i+4]*255`, where `R, G, B, A` are straight
/// 0..=255 channel values. Results are clamped to `[0, 255]` and premultiplied again.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ColorMatrix(pub [f32; 20]);

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    /// Leaves every channel unchanged.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    /// Scale alpha by `amount` (0 transparent, 1 unchanged).
    pub fn opacity(amount: f32) -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, amount, 0.0,
        ])
    }

    /// Scale color by `amount` (1 unchanged, <1 darker, >1 brighter).
    pub fn brightness(amount: f32) -> Self {
        Self([
            amount, 0.0, 0.0, 0.0, 0.0, //
            0.0, amount, 0.0, 0.0, 0.0, //
            0.0, 0.0, amount, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Interpolate toward the inverted color (0 unchanged, 1 fully inverted).
    pub fn invert(amount: f32) -> Self {
        let scale = 1.0 - 2.0 * amount;
        Self([
            scale, 0.0, 0.0, 0.0, amount, //
            0.0, scale, 0.0, 0.0, amount, //
            0.0, 0.0, scale, 0.0, amount, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Scale color around mid-gray (1 unchanged).
    pub fn contrast(amount: f32) -> Self {
        let offset = (1.0 - amount) * 0.5;
        Self([
            amount, 0.0, 0.0, 0.0, offset, //
            0.0, amount, 0.0, 0.0, offset, //
            0.0, 0.0, amount, 0.0, offset, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Luma-preserving saturation (0 gray, 1 unchanged, >1 oversaturated).
    pub fn saturate(amount: f32) -> Self {
        Self([
            0.213 + 0.787 * amount,
            0.715 - 0.715 * amount,
            0.072 - 0.072 * amount,
            0.0,
            0.0,
            //
            0.213 - 0.213 * amount,
            0.715 + 0.285 * amount,
            0.072 - 0.072 * amount,
            0.0,
            0.0,
            //
            0.213 - 0.213 * amount,
            0.715 - 0.715 * amount,
            0.072 + 0.928 * amount,
            0.0,
            0.0,
            //
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
        ])
    }

    /// Interpolate toward Rec. 709 luma (0 unchanged, 1 fully gray).
    pub fn grayscale(amount: f32) -> Self {
        let inv = 1.0 - amount;
        Self([
            inv + amount * 0.2126,
            amount * 0.7152,
            amount * 0.0722,
            0.0,
            0.0,
            //
            amount * 0.2126,
            inv + amount * 0.7152,
            amount * 0.0722,
            0.0,
            0.0,
            //
            amount * 0.2126,
            amount * 0.7152,
            inv + amount * 0.0722,
            0.0,
            0.0,
            //
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
        ])
    }

    /// Interpolate toward a warm sepia tone (0 unchanged, 1 full sepia).
    pub fn sepia(amount: f32) -> Self {
        let inv = 1.0 - amount;
        Self([
            0.393 + 0.607 * inv,
            0.769 - 0.769 * inv,
            0.189 - 0.189 * inv,
            0.0,
            0.0,
            //
            0.349 - 0.349 * inv,
            0.686 + 0.314 * inv,
            0.168 - 0.168 * inv,
            0.0,
            0.0,
            //
            0.272 - 0.272 * inv,
            0.534 - 0.534 * inv,
            0.131 + 0.869 * inv,
            0.0,
            0.0,
            //
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
        ])
    }

    /// Rotate hue by `angle` degrees around the luma axis.
    pub fn hue_rotate(angle: f32) -> Self {
        let rad = angle * (std::f32::consts::PI / 180.0);
        // cos/sin in f64 then narrowed, so results match a double-precision libm.
        let a1 = f64::from(rad).cos() as f32;
        let a2 = f64::from(rad).sin() as f32;
        Self([
            0.213 + a1 * 0.787 - a2 * 0.213,
            0.715 - a1 * 0.715 - a2 * 0.715,
            0.072 - a1 * 0.072 + a2 * 0.928,
            0.0,
            0.0,
            //
            0.213 - a1 * 0.213 + a2 * 0.143,
            0.715 + a1 * 0.285 + a2 * 0.140,
            0.072 - a1 * 0.072 - a2 * 0.283,
            0.0,
            0.0,
            //
            0.213 - a1 * 0.213 - a2 * 0.787,
            0.715 - a1 * 0.715 + a2 * 0.715,
            0.072 + a1 * 0.928 + a2 * 0.072,
            0.0,
            0.0,
            //
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
        ])
    }

    /// Transform one premultiplied pixel.
    #[inline]
    pub fn apply(&self, argb: u32) -> u32 {
        let m = &self.0;
        let c = Channels::unpack(argb).unpremultiply();
        let (r, g, b, a) = (c.r as f32, c.g as f32, c.b as f32, c.a as f32);

        let rr = r * m[0] + g * m[1] + b * m[2] + a * m[3] + m[4] * 255.0;
        let gg = r * m[5] + g * m[6] + b * m[7] + a * m[8] + m[9] * 255.0;
        let bb = r * m[10] + g * m[11] + b * m[12] + a * m[13] + m[14] * 255.0;
        let aa = r * m[15] + g * m[16] + b * m[17] + a * m[18] + m[19] * 255.0;

        Channels::new(
            rr.clamp_channel(),
            gg.clamp_channel(),
            bb.clamp_channel(),
            aa.clamp_channel(),
        )
        .premultiply()
        .pack()
    }

    pub(crate) fn run(&self, target: Unary<'_, '_, '_>) {
        let extent = target.run(|px| self.apply(px));
        tracing::trace!(width = extent.width, height = extent.height, "color matrix applied");
    }
}

/// Apply `matrix` to every pixel of `src`, writing into `out`.
///
/// Only the overlapping region of the two surfaces is processed.
#[tracing::instrument(level = "trace", skip_all)]
pub fn color_transform(src: &Surface<'_>, out: &mut SurfaceMut<'_>, matrix: &ColorMatrix) {
    matrix.run(Unary::Separate { src: *src, out });
}

/// Apply `matrix` to every pixel of `surface` in place.
#[tracing::instrument(level = "trace", skip_all)]
pub fn color_transform_in_place(surface: &mut SurfaceMut<'_>, matrix: &ColorMatrix) {
    matrix.run(Unary::InPlace(surface));
}

#[inline]
fn luminance_alpha(argb: u32) -> u32 {
    let c = Channels::unpack(argb).unpremultiply();
    let l = c.r as f32 * 0.2126 + c.g as f32 * 0.7152 + c.b as f32 * 0.0722;
    Channels::new(0, 0, 0, l.clamp_channel()).pack()
}

/// Replace alpha with the luma of the straight color and zero the color channels.
#[tracing::instrument(level = "trace", skip_all)]
pub fn luminance_to_alpha(src: &Surface<'_>, out: &mut SurfaceMut<'_>) {
    Unary::Separate { src: *src, out }.run(luminance_alpha);
}

/// In-place form of [`luminance_to_alpha`].
#[tracing::instrument(level = "trace", skip_all)]
pub fn luminance_to_alpha_in_place(surface: &mut SurfaceMut<'_>) {
    Unary::InPlace(surface).run(luminance_alpha);
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
