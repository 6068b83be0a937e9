//! Packed ARGB32 pixel codec.
//!
//! A pixel is a `u32` laid out as `0xAARRGGBB`. At rest the color channels are premultiplied by
//! alpha; [`Channels::unpremultiply`] recovers straight color for math that must ignore opacity.

/// The four channels of one pixel, widened to `u32` so arithmetic does not overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Channels {
    /// Red.
    pub r: u32,
    /// Green.
    pub g: u32,
    /// Blue.
    pub b: u32,
    /// Alpha.
    pub a: u32,
}

impl Channels {
    /// Build from individual channel values.
    pub const fn new(r: u32, g: u32, b: u32, a: u32) -> Self {
        Self { r, g, b, a }
    }

    /// Split a packed `0xAARRGGBB` pixel.
    #[inline]
    pub const fn unpack(pixel: u32) -> Self {
        Self {
            r: (pixel >> 16) & 0xFF,
            g: (pixel >> 8) & 0xFF,
            b: pixel & 0xFF,
            a: (pixel >> 24) & 0xFF,
        }
    }

    /// Pack into `0xAARRGGBB`. Channels are expected to be `<= 255` already.
    #[inline]
    pub const fn pack(self) -> u32 {
        ((self.a & 0xFF) << 24) | ((self.r & 0xFF) << 16) | ((self.g & 0xFF) << 8) | (self.b & 0xFF)
    }

    /// Scale color by alpha with `c * (a + 1) >> 8`.
    ///
    /// The `+ 1` bias keeps non-zero color non-zero under non-zero alpha and makes `a == 255`
    /// an exact identity.
    #[inline]
    pub const fn premultiply(self) -> Self {
        let a1 = self.a + 1;
        Self {
            r: (self.r * a1) >> 8,
            g: (self.g * a1) >> 8,
            b: (self.b * a1) >> 8,
            a: self.a,
        }
    }

    /// Divide color by alpha with truncating integer division.
    ///
    /// Zero alpha carries no color, so every color channel becomes 0. Inputs that violate
    /// `channel <= alpha` can produce values above 255; callers clamp where it matters.
    #[inline]
    pub const fn unpremultiply(self) -> Self {
        if self.a == 0 {
            return Self {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            };
        }
        Self {
            r: (255 * self.r) / self.a,
            g: (255 * self.g) / self.a,
            b: (255 * self.b) / self.a,
            a: self.a,
        }
    }

    /// Apply `f` to the three color channels, leaving alpha untouched.
    #[inline]
    pub fn map_color(self, mut f: impl FnMut(u32) -> u32) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }
}

/// Saturating conversion of an intermediate result into an 8-bit channel value.
pub trait ClampChannel {
    /// Clamp to `[0, 255]` and truncate toward zero.
    fn clamp_channel(self) -> u32;
}

impl ClampChannel for f32 {
    #[inline]
    fn clamp_channel(self) -> u32 {
        // NaN survives `clamp` and then saturates to 0 in the cast.
        self.clamp(0.0, 255.0) as u32
    }
}

impl ClampChannel for i32 {
    #[inline]
    fn clamp_channel(self) -> u32 {
        self.clamp(0, 255) as u32
    }
}

impl ClampChannel for i64 {
    #[inline]
    fn clamp_channel(self) -> u32 {
        self.clamp(0, 255) as u32
    }
}

/// Integer approximation of `round(x / 255)`.
#[inline]
pub const fn div255(x: i32) -> i32 {
    (x + (x >> 8) + 0x80) >> 8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixel.rs"]
mod tests;
