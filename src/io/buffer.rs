//! Owned premultiplied ARGB32 storage and conversion from/to straight RGBA8.

use crate::effects::gamma::Transfer;
use crate::foundation::error::{FilterError, FilterResult};
use crate::foundation::pixel::Channels;
use crate::foundation::surface::{Extent, Surface, SurfaceMut};

/// Color space pixel values are held in between load and save.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Decode sRGB on load and re-encode on save, so filters see linear light.
    #[default]
    LinearRgb,
    /// Keep encoded sRGB values as they are.
    Srgb,
}

/// A `width x height` image of premultiplied ARGB32 pixels, rows tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, 0)
    }

    /// Buffer with every pixel set to `argb`.
    pub fn filled(width: u16, height: u16, argb: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![argb; Extent::new(width, height).pixel_count()],
        }
    }

    /// Wrap existing pixels; `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u16, height: u16, pixels: Vec<u32>) -> FilterResult<Self> {
        let need = Extent::new(width, height).pixel_count();
        if pixels.len() != need {
            return Err(FilterError::validation(format!(
                "{width}x{height} buffer needs {need} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert straight (non-premultiplied) RGBA8 bytes.
    ///
    /// With [`ColorSpace::LinearRgb`] the color channels are decoded from sRGB before
    /// premultiplying.
    pub fn from_straight_rgba8(
        bytes: &[u8],
        width: u16,
        height: u16,
        space: ColorSpace,
    ) -> FilterResult<Self> {
        let need = Extent::new(width, height).pixel_count() * 4;
        if bytes.len() != need {
            return Err(FilterError::validation(format!(
                "{width}x{height} RGBA8 image needs {need} bytes, got {}",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| {
                let c = Channels::new(
                    u32::from(px[0]),
                    u32::from(px[1]),
                    u32::from(px[2]),
                    u32::from(px[3]),
                );
                let c = match space {
                    ColorSpace::LinearRgb => c.map_color(|v| {
                        u32::from(Transfer::SrgbToLinear.channel(v as u8))
                    }),
                    ColorSpace::Srgb => c,
                };
                c.premultiply().pack()
            })
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Straight RGBA8 bytes, re-encoded to sRGB when `space` is [`ColorSpace::LinearRgb`].
    pub fn to_straight_rgba8(&self, space: ColorSpace) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &px in &self.pixels {
            let c = Channels::unpack(px).unpremultiply().map_color(|v| v.min(255));
            let c = match space {
                ColorSpace::LinearRgb => {
                    c.map_color(|v| u32::from(Transfer::LinearToSrgb.channel(v as u8)))
                }
                ColorSpace::Srgb => c,
            };
            out.extend_from_slice(&[c.r as u8, c.g as u8, c.b as u8, c.a as u8]);
        }
        out
    }

    /// Straight RGB8 bytes with alpha dropped, for formats without an alpha channel.
    pub fn to_straight_rgb8(&self, space: ColorSpace) -> Vec<u8> {
        self.to_straight_rgba8(space)
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Return `true` when any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.iter().any(|px| px >> 24 != 0xFF)
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Width and height.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Take the pixel storage.
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Read-only surface over the whole buffer.
    pub fn surface(&self) -> Surface<'_> {
        Surface::from_valid_parts(&self.pixels, self.width, self.height)
    }

    /// Writable surface over the whole buffer.
    pub fn surface_mut(&mut self) -> SurfaceMut<'_> {
        SurfaceMut::from_valid_parts(&mut self.pixels, self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/buffer.rs"]
mod tests;
