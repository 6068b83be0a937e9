//! surfacefx filters and composites premultiplied ARGB32 pixel surfaces.
//!
//! Every operation reads one or two borrowed [`Surface`]s and writes a [`SurfaceMut`], working on
//! the top-left region the surfaces have in common:
//!
//! - [`color_transform`] with a [`ColorMatrix`] (opacity, brightness, invert, contrast, saturate,
//!   grayscale, sepia, hue-rotate presets) and [`luminance_to_alpha`]
//! - [`srgb_to_linear`] / [`linear_to_srgb`]
//! - [`gaussian_blur`]
//! - [`blend`] with a [`BlendMode`], [`composite`] with a [`CompositeOp`], and
//!   [`composite_arithmetic`]
//!
//! Each has in-place forms for when the output is one of the inputs. [`FilterChain`] describes a
//! sequence of single-input filters in JSON, and [`PixelBuffer`] with [`load_image`] /
//! [`save_image`] moves pixels to and from image files.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Pixel math, surfaces and errors.
pub mod foundation;

/// The effect kernels.
pub mod effects;

/// JSON-configurable filter chains.
pub mod pipeline;

/// Owned pixel storage and image files.
pub mod io;

pub use crate::foundation::error::{FilterError, FilterResult};
pub use crate::foundation::pixel::{Channels, ClampChannel, div255};
pub use crate::foundation::surface::{Extent, Surface, SurfaceMut, overlap};

pub use crate::effects::blend::{BlendMode, blend, blend_into_backdrop, blend_into_source};
pub use crate::effects::blur::{gaussian_blur, gaussian_blur_in_place, kernel_size};
pub use crate::effects::color::{
    ColorMatrix, color_transform, color_transform_in_place, luminance_to_alpha,
    luminance_to_alpha_in_place,
};
pub use crate::effects::composite::{
    Arithmetic, CompositeOp, composite, composite_arithmetic, composite_arithmetic_into_backdrop,
    composite_arithmetic_into_source, composite_into_backdrop, composite_into_source,
};
pub use crate::effects::gamma::{
    Transfer, linear_to_srgb, linear_to_srgb_in_place, srgb_to_linear, srgb_to_linear_in_place,
};
pub use crate::io::buffer::{ColorSpace, PixelBuffer};
pub use crate::io::codec::{load_image, output_file_name, save_image};
pub use crate::pipeline::filter::{Filter, FilterChain};
