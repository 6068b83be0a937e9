use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::effects::blur::{gaussian_blur, gaussian_blur_in_place};
use crate::effects::color::{
    ColorMatrix, color_transform, color_transform_in_place, luminance_to_alpha,
    luminance_to_alpha_in_place,
};
use crate::effects::gamma::{
    Transfer, linear_to_srgb, linear_to_srgb_in_place, srgb_to_linear, srgb_to_linear_in_place,
};
use crate::foundation::error::{FilterError, FilterResult};
use crate::foundation::surface::{Surface, SurfaceMut};

/// One single-input effect, as described in JSON configuration.
///
/// Tagged by `"op"`, e.g. `{"op": "sepia", "amount": 0.8}` or
/// `{"op": "gaussian-blur", "std_dev_x": 2.0}`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Filter {
    /// Arbitrary 5x4 color matrix.
    ColorMatrix {
        /// Row-major coefficients.
        matrix: ColorMatrix,
    },
    /// See [`ColorMatrix::opacity`].
    Opacity {
        /// Alpha scale.
        amount: f32,
    },
    /// See [`ColorMatrix::brightness`].
    Brightness {
        /// Color scale.
        amount: f32,
    },
    /// See [`ColorMatrix::invert`].
    Invert {
        /// Inversion strength.
        amount: f32,
    },
    /// See [`ColorMatrix::contrast`].
    Contrast {
        /// Contrast scale around mid-gray.
        amount: f32,
    },
    /// See [`ColorMatrix::saturate`].
    Saturate {
        /// Saturation scale.
        amount: f32,
    },
    /// See [`ColorMatrix::grayscale`].
    Grayscale {
        /// Desaturation strength.
        amount: f32,
    },
    /// See [`ColorMatrix::sepia`].
    Sepia {
        /// Sepia strength.
        amount: f32,
    },
    /// See [`ColorMatrix::hue_rotate`].
    HueRotate {
        /// Rotation in degrees.
        angle: f32,
    },
    /// Luma into alpha, color cleared.
    LuminanceToAlpha,
    /// Decode sRGB color into linear light.
    SrgbToLinear,
    /// Encode linear-light color as sRGB.
    LinearToSrgb,
    /// Three-pass box approximation of a Gaussian blur.
    GaussianBlur {
        /// Horizontal standard deviation in pixels.
        std_dev_x: f32,
        /// Vertical standard deviation; same as horizontal when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        std_dev_y: Option<f32>,
    },
}

impl Filter {
    /// The `"op"` tag of this filter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ColorMatrix { .. } => "color-matrix",
            Self::Opacity { .. } => "opacity",
            Self::Brightness { .. } => "brightness",
            Self::Invert { .. } => "invert",
            Self::Contrast { .. } => "contrast",
            Self::Saturate { .. } => "saturate",
            Self::Grayscale { .. } => "grayscale",
            Self::Sepia { .. } => "sepia",
            Self::HueRotate { .. } => "hue-rotate",
            Self::LuminanceToAlpha => "luminance-to-alpha",
            Self::SrgbToLinear => "srgb-to-linear",
            Self::LinearToSrgb => "linear-to-srgb",
            Self::GaussianBlur { .. } => "gaussian-blur",
        }
    }

    /// The color matrix this filter reduces to, if it is a matrix filter.
    pub fn matrix(&self) -> Option<ColorMatrix> {
        Some(match *self {
            Self::ColorMatrix { matrix } => matrix,
            Self::Opacity { amount } => ColorMatrix::opacity(amount),
            Self::Brightness { amount } => ColorMatrix::brightness(amount),
            Self::Invert { amount } => ColorMatrix::invert(amount),
            Self::Contrast { amount } => ColorMatrix::contrast(amount),
            Self::Saturate { amount } => ColorMatrix::saturate(amount),
            Self::Grayscale { amount } => ColorMatrix::grayscale(amount),
            Self::Sepia { amount } => ColorMatrix::sepia(amount),
            Self::HueRotate { angle } => ColorMatrix::hue_rotate(angle),
            Self::LuminanceToAlpha
            | Self::SrgbToLinear
            | Self::LinearToSrgb
            | Self::GaussianBlur { .. } => return None,
        })
    }

    /// Reject non-finite parameters and negative blur deviations.
    pub fn validate(&self) -> FilterResult<()> {
        let finite = |what: &str, v: f32| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(FilterError::validation(format!(
                    "{}: {what} must be finite, got {v}",
                    self.name()
                )))
            }
        };
        match *self {
            Self::ColorMatrix { matrix } => {
                for (i, v) in matrix.0.iter().enumerate() {
                    finite(&format!("matrix[{i}]"), *v)?;
                }
                Ok(())
            }
            Self::Opacity { amount }
            | Self::Brightness { amount }
            | Self::Invert { amount }
            | Self::Contrast { amount }
            | Self::Saturate { amount }
            | Self::Grayscale { amount }
            | Self::Sepia { amount } => finite("amount", amount),
            Self::HueRotate { angle } => finite("angle", angle),
            Self::LuminanceToAlpha | Self::SrgbToLinear | Self::LinearToSrgb => Ok(()),
            Self::GaussianBlur {
                std_dev_x,
                std_dev_y,
            } => {
                let std_dev_y = std_dev_y.unwrap_or(std_dev_x);
                finite("std_dev_x", std_dev_x)?;
                finite("std_dev_y", std_dev_y)?;
                if std_dev_x < 0.0 || std_dev_y < 0.0 {
                    return Err(FilterError::validation(format!(
                        "gaussian-blur: deviations must be >= 0, got ({std_dev_x}, {std_dev_y})"
                    )));
                }
                Ok(())
            }
        }
    }

    fn kernel(&self) -> Kernel {
        match *self {
            Self::LuminanceToAlpha => Kernel::LuminanceToAlpha,
            Self::SrgbToLinear => Kernel::Transfer(Transfer::SrgbToLinear),
            Self::LinearToSrgb => Kernel::Transfer(Transfer::LinearToSrgb),
            Self::GaussianBlur {
                std_dev_x,
                std_dev_y,
            } => Kernel::Blur(std_dev_x, std_dev_y.unwrap_or(std_dev_x)),
            _ => Kernel::Matrix(self.matrix().unwrap_or_default()),
        }
    }

    /// Apply to `src`, writing into `out`.
    pub fn apply(&self, src: &Surface<'_>, out: &mut SurfaceMut<'_>) {
        match self.kernel() {
            Kernel::Matrix(m) => color_transform(src, out, &m),
            Kernel::LuminanceToAlpha => luminance_to_alpha(src, out),
            Kernel::Transfer(Transfer::SrgbToLinear) => srgb_to_linear(src, out),
            Kernel::Transfer(Transfer::LinearToSrgb) => linear_to_srgb(src, out),
            Kernel::Blur(x, y) => gaussian_blur(src, out, x, y),
        }
    }

    /// Apply in place.
    pub fn apply_in_place(&self, surface: &mut SurfaceMut<'_>) {
        match self.kernel() {
            Kernel::Matrix(m) => color_transform_in_place(surface, &m),
            Kernel::LuminanceToAlpha => luminance_to_alpha_in_place(surface),
            Kernel::Transfer(Transfer::SrgbToLinear) => srgb_to_linear_in_place(surface),
            Kernel::Transfer(Transfer::LinearToSrgb) => linear_to_srgb_in_place(surface),
            Kernel::Blur(x, y) => gaussian_blur_in_place(surface, x, y),
        }
    }
}

/// What a [`Filter`] runs once its parameters are resolved.
enum Kernel {
    Matrix(ColorMatrix),
    LuminanceToAlpha,
    Transfer(Transfer),
    Blur(f32, f32),
}

/// An ordered list of filters applied one after another.
///
/// JSON form: `{"filters": [{"op": "grayscale", "amount": 1.0}, ...]}`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterChain {
    /// Filters in application order.
    pub filters: Vec<Filter>,
}

impl FilterChain {
    /// Wrap an existing list of filters.
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// Parse and validate a chain from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FilterResult<Self> {
        let chain: Self = serde_json::from_reader(r)
            .map_err(|e| FilterError::serde(format!("parse filter chain JSON: {e}")))?;
        chain.validate()?;
        Ok(chain)
    }

    /// Parse and validate a chain from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FilterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FilterError::validation(format!("open filter chain JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate every filter, reporting the first failure with its index.
    pub fn validate(&self) -> FilterResult<()> {
        for (i, f) in self.filters.iter().enumerate() {
            f.validate().map_err(|e| match e {
                FilterError::Validation(msg) => FilterError::validation(format!("filters[{i}]: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }

    /// Apply every filter in order, in place.
    #[tracing::instrument(level = "trace", skip_all, fields(len = self.filters.len()))]
    pub fn apply_in_place(&self, surface: &mut SurfaceMut<'_>) {
        for f in &self.filters {
            tracing::debug!(filter = f.name(), "apply filter");
            f.apply_in_place(surface);
        }
    }

    /// Copy `src` into `out`, then apply the chain there.
    pub fn apply(&self, src: &Surface<'_>, out: &mut SurfaceMut<'_>) {
        out.copy_from(src);
        let extent = src.extent();
        let mut region = out.sub_mut(0, 0, extent.width, extent.height);
        self.apply_in_place(&mut region);
    }
}

impl FromStr for FilterChain {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/filter.rs"]
mod tests;
