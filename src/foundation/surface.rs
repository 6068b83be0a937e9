//! Borrowed views over caller-owned ARGB32 pixel buffers.
//!
//! A surface never owns or allocates pixel memory. Rows start every `stride` pixels; only the
//! first `width` pixels of each row belong to the surface. Sub-surfaces share the parent's buffer
//! and stride.

use crate::foundation::error::{FilterError, FilterResult};

/// Width and height of a surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Extent {
    /// Create an extent.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Largest rectangle anchored at the origin contained in both extents.
    pub fn intersect(self, other: Self) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    /// Return `true` when the extent covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn pixel_count(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Common extent of several surfaces: the minimum width and the minimum height.
///
/// Multi-surface operations iterate over this region only, so mismatched inputs are cropped to
/// their top-left intersection rather than rejected.
pub fn overlap<const N: usize>(extents: [Extent; N]) -> Extent {
    extents
        .into_iter()
        .fold(Extent::new(u16::MAX, u16::MAX), Extent::intersect)
}

/// Minimum slice length for a `width x height` surface with the given stride.
///
/// The last row only needs `width` pixels, which is what lets a clipped sub-surface borrow the
/// tail of its parent's buffer.
fn required_len(width: u16, height: u16, stride: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    (stride as usize)
        .checked_mul(usize::from(height) - 1)?
        .checked_add(usize::from(width))
}

fn check_layout(len: usize, width: u16, height: u16, stride: u32) -> FilterResult<()> {
    if stride < u32::from(width) {
        return Err(FilterError::validation(format!(
            "surface stride {stride} is smaller than width {width}"
        )));
    }
    let need = required_len(width, height, stride)
        .ok_or_else(|| FilterError::validation("surface size overflows usize"))?;
    if len < need {
        return Err(FilterError::validation(format!(
            "surface {width}x{height} (stride {stride}) needs {need} pixels, buffer has {len}"
        )));
    }
    Ok(())
}

/// Clip `(x, y, width, height)` against `parent` and return the element offset and extent.
fn clip_sub(parent: Extent, stride: u32, x: u16, y: u16, width: u16, height: u16) -> (usize, Extent) {
    let x = x.min(parent.width);
    let y = y.min(parent.height);
    let extent = Extent::new(width.min(parent.width - x), height.min(parent.height - y));
    let offset = usize::from(y) * stride as usize + usize::from(x);
    (offset, extent)
}

fn row_range(stride: u32, width: u16, y: u16) -> std::ops::Range<usize> {
    let start = usize::from(y) * stride as usize;
    start..start + usize::from(width)
}

/// Read-only view over premultiplied ARGB32 pixels.
#[derive(Clone, Copy, Debug)]
pub struct Surface<'a> {
    pixels: &'a [u32],
    width: u16,
    height: u16,
    stride: u32,
}

impl<'a> Surface<'a> {
    /// View `pixels` as a `width x height` surface whose rows start every `stride` pixels.
    ///
    /// Fails when `stride < width` or the buffer cannot hold every row.
    pub fn new(pixels: &'a [u32], width: u16, height: u16, stride: u32) -> FilterResult<Self> {
        check_layout(pixels.len(), width, height, stride)?;
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// View a tightly packed buffer (`stride == width`).
    pub fn packed(pixels: &'a [u32], width: u16, height: u16) -> FilterResult<Self> {
        Self::new(pixels, width, height, u32::from(width))
    }

    /// Packed view over a buffer whose length is already known to be `width * height`.
    pub(crate) fn from_valid_parts(pixels: &'a [u32], width: u16, height: u16) -> Self {
        debug_assert!(check_layout(pixels.len(), width, height, u32::from(width)).is_ok());
        Self {
            pixels,
            width,
            height,
            stride: u32::from(width),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixels per row in the backing buffer.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Width and height.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// When `(x, y)` lies outside the backing buffer. Coordinates past `width` but inside the
    /// stride padding read padding pixels.
    pub fn pixel(&self, x: u16, y: u16) -> u32 {
        self.pixels[usize::from(y) * self.stride as usize + usize::from(x)]
    }

    /// The `width` pixels of row `y`.
    pub fn row(&self, y: u16) -> &'a [u32] {
        if self.width == 0 {
            return &[];
        }
        &self.pixels[row_range(self.stride, self.width, y)]
    }

    /// Sub-surface at `(x, y)` clipped to this surface's bounds.
    ///
    /// A rectangle entirely outside the bounds yields an empty surface.
    pub fn sub(&self, x: u16, y: u16, width: u16, height: u16) -> Surface<'a> {
        let (offset, extent) = clip_sub(self.extent(), self.stride, x, y, width, height);
        let pixels = if extent.is_empty() {
            &self.pixels[..0]
        } else {
            &self.pixels[offset..]
        };
        Surface {
            pixels,
            width: extent.width,
            height: extent.height,
            stride: self.stride,
        }
    }

    /// Shrink the view to at most `extent`, keeping the top-left origin.
    pub fn crop_to(&mut self, extent: Extent) {
        let e = self.extent().intersect(extent);
        self.width = e.width;
        self.height = e.height;
    }
}

/// Mutable view over premultiplied ARGB32 pixels.
#[derive(Debug)]
pub struct SurfaceMut<'a> {
    pixels: &'a mut [u32],
    width: u16,
    height: u16,
    stride: u32,
}

impl<'a> SurfaceMut<'a> {
    /// View `pixels` as a writable `width x height` surface whose rows start every `stride`
    /// pixels.
    pub fn new(pixels: &'a mut [u32], width: u16, height: u16, stride: u32) -> FilterResult<Self> {
        check_layout(pixels.len(), width, height, stride)?;
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// View a tightly packed buffer (`stride == width`).
    pub fn packed(pixels: &'a mut [u32], width: u16, height: u16) -> FilterResult<Self> {
        Self::new(pixels, width, height, u32::from(width))
    }

    /// Writable form of [`Surface::from_valid_parts`].
    pub(crate) fn from_valid_parts(pixels: &'a mut [u32], width: u16, height: u16) -> Self {
        debug_assert!(check_layout(pixels.len(), width, height, u32::from(width)).is_ok());
        Self {
            pixels,
            width,
            height,
            stride: u32::from(width),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixels per row in the backing buffer.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Width and height.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Reborrow as a read-only surface.
    pub fn as_surface(&self) -> Surface<'_> {
        Surface {
            pixels: &*self.pixels,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u16, y: u16) -> u32 {
        self.pixels[usize::from(y) * self.stride as usize + usize::from(x)]
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: u16, y: u16, argb: u32) {
        self.pixels[usize::from(y) * self.stride as usize + usize::from(x)] = argb;
    }

    /// The `width` pixels of row `y`.
    pub fn row(&self, y: u16) -> &[u32] {
        if self.width == 0 {
            return &[];
        }
        &self.pixels[row_range(self.stride, self.width, y)]
    }

    /// The `width` pixels of row `y`, writable.
    pub fn row_mut(&mut self, y: u16) -> &mut [u32] {
        if self.width == 0 {
            return &mut [];
        }
        &mut self.pixels[row_range(self.stride, self.width, y)]
    }

    /// Writable sub-surface at `(x, y)` clipped to this surface's bounds.
    pub fn sub_mut(&mut self, x: u16, y: u16, width: u16, height: u16) -> SurfaceMut<'_> {
        let (offset, extent) = clip_sub(self.extent(), self.stride, x, y, width, height);
        let pixels = if extent.is_empty() {
            &mut self.pixels[..0]
        } else {
            &mut self.pixels[offset..]
        };
        SurfaceMut {
            pixels,
            width: extent.width,
            height: extent.height,
            stride: self.stride,
        }
    }

    /// Consume the view and return the clipped sub-surface with the full lifetime.
    pub fn into_sub(self, x: u16, y: u16, width: u16, height: u16) -> SurfaceMut<'a> {
        let (offset, extent) = clip_sub(self.extent(), self.stride, x, y, width, height);
        let pixels = self.pixels;
        let pixels = if extent.is_empty() {
            &mut pixels[..0]
        } else {
            &mut pixels[offset..]
        };
        SurfaceMut {
            pixels,
            width: extent.width,
            height: extent.height,
            stride: self.stride,
        }
    }

    /// Shrink the view to at most `extent`, keeping the top-left origin.
    pub fn crop_to(&mut self, extent: Extent) {
        let e = self.extent().intersect(extent);
        self.width = e.width;
        self.height = e.height;
    }

    /// Copy the overlapping region of `src` into this surface.
    pub fn copy_from(&mut self, src: &Surface<'_>) {
        Unary::Separate { src: *src, out: self }.run(|px| px);
    }

    /// Fill the surface with one pixel value.
    pub fn fill(&mut self, argb: u32) {
        Unary::InPlace(self).run(|_| argb);
    }

    pub(crate) fn raw_mut(&mut self) -> &mut [u32] {
        &mut *self.pixels
    }
}

/// Operands of a one-input operation.
///
/// `InPlace` is the aliasing form: each pixel is read and then overwritten before the next one
/// is visited.
pub(crate) enum Unary<'t, 'a, 'b> {
    Separate {
        src: Surface<'a>,
        out: &'t mut SurfaceMut<'b>,
    },
    InPlace(&'t mut SurfaceMut<'b>),
}

impl Unary<'_, '_, '_> {
    /// Effective extent once every operand is overlapped.
    pub(crate) fn extent(&self) -> Extent {
        match self {
            Unary::Separate { src, out } => overlap([src.extent(), out.extent()]),
            Unary::InPlace(out) => out.extent(),
        }
    }

    /// Write `f(input)` for every pixel of the overlapped region, row-major.
    pub(crate) fn run(self, mut f: impl FnMut(u32) -> u32) -> Extent {
        let extent = self.extent();
        if extent.is_empty() {
            return extent;
        }
        let w = usize::from(extent.width);
        match self {
            Unary::Separate { src, out } => {
                for y in 0..extent.height {
                    let src_row = &src.row(y)[..w];
                    for (o, &s) in out.row_mut(y)[..w].iter_mut().zip(src_row) {
                        *o = f(s);
                    }
                }
            }
            Unary::InPlace(out) => {
                for y in 0..extent.height {
                    for o in &mut out.row_mut(y)[..w] {
                        *o = f(*o);
                    }
                }
            }
        }
        extent
    }
}

/// Operands of a two-input (source, backdrop) operation.
///
/// `IntoSource` and `IntoBackdrop` write the result over one of the inputs.
pub(crate) enum Binary<'t, 'a, 'b> {
    Separate {
        src: Surface<'a>,
        backdrop: Surface<'a>,
        out: &'t mut SurfaceMut<'b>,
    },
    IntoSource {
        src: &'t mut SurfaceMut<'b>,
        backdrop: Surface<'a>,
    },
    IntoBackdrop {
        src: Surface<'a>,
        backdrop: &'t mut SurfaceMut<'b>,
    },
}

impl Binary<'_, '_, '_> {
    /// Effective extent once every operand is overlapped.
    pub(crate) fn extent(&self) -> Extent {
        match self {
            Binary::Separate { src, backdrop, out } => {
                overlap([src.extent(), backdrop.extent(), out.extent()])
            }
            Binary::IntoSource { src, backdrop } => overlap([src.extent(), backdrop.extent()]),
            Binary::IntoBackdrop { src, backdrop } => overlap([src.extent(), backdrop.extent()]),
        }
    }

    /// Write `f(source, backdrop)` for every pixel of the overlapped region, row-major.
    pub(crate) fn run(self, mut f: impl FnMut(u32, u32) -> u32) -> Extent {
        let extent = self.extent();
        if extent.is_empty() {
            return extent;
        }
        let w = usize::from(extent.width);
        match self {
            Binary::Separate { src, backdrop, out } => {
                for y in 0..extent.height {
                    let s_row = &src.row(y)[..w];
                    let b_row = &backdrop.row(y)[..w];
                    for ((o, &s), &b) in out.row_mut(y)[..w].iter_mut().zip(s_row).zip(b_row) {
                        *o = f(s, b);
                    }
                }
            }
            Binary::IntoSource { src, backdrop } => {
                for y in 0..extent.height {
                    let b_row = &backdrop.row(y)[..w];
                    for (o, &b) in src.row_mut(y)[..w].iter_mut().zip(b_row) {
                        *o = f(*o, b);
                    }
                }
            }
            Binary::IntoBackdrop { src, backdrop } => {
                for y in 0..extent.height {
                    let s_row = &src.row(y)[..w];
                    for (o, &s) in backdrop.row_mut(y)[..w].iter_mut().zip(s_row) {
                        *o = f(s, *o);
                    }
                }
            }
        }
        extent
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/surface.rs"]
mod tests;
