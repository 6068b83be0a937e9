//! Separable blend modes over premultiplied pixels.
//!
//! Every mode shares the union alpha `sa + da - sa*da/255`; only the per-channel color term
//! differs. All products go through [`div255`] so the whole family stays in integer math.

use std::fmt;
use std::str::FromStr;

use crate::foundation::error::FilterError;
use crate::foundation::pixel::{Channels, ClampChannel, div255};
use crate::foundation::surface::{Binary, Surface, SurfaceMut};

/// Blend mode applied by [`blend`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Source over backdrop.
    #[default]
    Normal,
    /// Product of source and backdrop; never lighter than either.
    Multiply,
    /// Inverse product of inverses; never darker than either.
    Screen,
    /// Multiply or screen depending on the backdrop.
    Overlay,
    /// Darker of source and backdrop.
    Darken,
    /// Lighter of source and backdrop.
    Lighten,
    /// Brighten the backdrop toward the source.
    ColorDodge,
    /// Darken the backdrop toward the source.
    ColorBurn,
    /// Multiply or screen depending on the source.
    HardLight,
    /// Soft version of hard light.
    SoftLight,
    /// Absolute difference.
    Difference,
    /// Low-contrast difference.
    Exclusion,
}

impl BlendMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
    ];

    /// Kebab-case name, as used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }

    fn run(self, target: Binary<'_, '_, '_>) {
        // Mode dispatch happens once per call; each arm monomorphizes its own kernel.
        match self {
            Self::Normal => blend_with(target, |s, d, sa, _| s + div255(d * (255 - sa))),
            Self::Multiply => blend_with(target, |s, d, sa, da| {
                div255(s * d + s * (255 - da) + d * (255 - sa))
            }),
            Self::Screen => blend_with(target, |s, d, _, _| s + d - div255(s * d)),
            Self::Overlay => blend_with(target, |s, d, sa, da| hard_light(d, s, da, sa)),
            Self::Darken => blend_with(target, |s, d, sa, da| {
                let (sda, dsa) = (s * da, d * sa);
                s + d - div255(sda.max(dsa))
            }),
            Self::Lighten => blend_with(target, |s, d, sa, da| {
                let (sda, dsa) = (s * da, d * sa);
                s + d - div255(sda.min(dsa))
            }),
            Self::ColorDodge => blend_with(target, color_dodge),
            Self::ColorBurn => blend_with(target, color_burn),
            Self::HardLight => blend_with(target, hard_light),
            Self::SoftLight => blend_with(target, soft_light),
            Self::Difference => blend_with(target, |s, d, sa, da| {
                let (sda, dsa) = (s * da, d * sa);
                s + d - 2 * div255(sda.min(dsa))
            }),
            Self::Exclusion => blend_with(target, |s, d, _, _| div255(255 * (s + d) - 2 * s * d)),
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.name()).collect();
                FilterError::validation(format!(
                    "unknown blend mode '{s}' (expected one of: {})",
                    valid.join(", ")
                ))
            })
    }
}

/// Per-pixel driver: `op(s, d, sa, da)` on each color channel, union alpha, clamp.
fn blend_with<F>(target: Binary<'_, '_, '_>, op: F)
where
    F: Fn(i32, i32, i32, i32) -> i32,
{
    target.run(|src, backdrop| {
        let s = Channels::unpack(src);
        let d = Channels::unpack(backdrop);
        let (sa, da) = (s.a as i32, d.a as i32);
        let channel = |sc: u32, dc: u32| op(sc as i32, dc as i32, sa, da).clamp_channel();
        Channels::new(
            channel(s.r, d.r),
            channel(s.g, d.g),
            channel(s.b, d.b),
            (sa + da - div255(sa * da)).clamp_channel(),
        )
        .pack()
    });
}

fn hard_light(s: i32, d: i32, sa: i32, da: i32) -> i32 {
    let rest = s * (255 - da) + d * (255 - sa);
    if 2 * s <= sa {
        div255(2 * s * d + rest)
    } else {
        div255(sa * da - 2 * (da - d) * (sa - s) + rest)
    }
}

fn color_dodge(s: i32, d: i32, sa: i32, da: i32) -> i32 {
    let rest = s * (255 - da) + d * (255 - sa);
    if d == 0 {
        return div255(s * (255 - da));
    }
    if s == sa || da * (sa - s) < d * sa {
        return div255(sa * da + rest);
    }
    div255(sa * ((d * sa) / (sa - s)) + rest)
}

fn color_burn(s: i32, d: i32, sa: i32, da: i32) -> i32 {
    let rest = s * (255 - da) + d * (255 - sa);
    if d == da {
        return div255(sa * da + rest);
    }
    if s == 0 {
        return div255(d * (255 - sa));
    }
    if da * s < (da - d) * sa {
        return div255(rest);
    }
    div255(sa * (da - (da - d) * sa / s) + rest)
}

fn soft_light(s: i32, d: i32, sa: i32, da: i32) -> i32 {
    // Scaled by 255^2; i64 keeps out-of-range input from overflowing.
    let (s, d, sa, da) = (i64::from(s), i64::from(d), i64::from(sa), i64::from(da));
    let s2 = s << 1;
    let d_np = if da == 0 { 0 } else { (255 * d) / da };
    let rest = (s * (255 - da) + d * (255 - sa)) * 255;

    let v = if s2 < sa {
        (d * (sa * 255 + (s2 - sa) * (255 - d_np)) + rest) / 65025
    } else if 4 * d <= da {
        let poly = (((16 * d_np - 12 * 255) * d_np + 3 * 65025) * d_np) / 65025;
        (d * sa * 255 + da * (s2 - sa) * poly + rest) / 65025
    } else {
        let root = ((d_np * 255) as f32).sqrt() as i64;
        // d_np is subtracted once, outside the scaled product.
        (d * sa * 255 + da * (s2 - sa) * root - d_np + rest) / 65025
    };
    v.clamp(0, 255) as i32
}

/// Blend `src` over `backdrop` with `mode`, writing into `out`.
///
/// Only the region common to all three surfaces is processed.
#[tracing::instrument(level = "trace", skip_all, fields(%mode))]
pub fn blend(src: &Surface<'_>, backdrop: &Surface<'_>, out: &mut SurfaceMut<'_>, mode: BlendMode) {
    mode.run(Binary::Separate {
        src: *src,
        backdrop: *backdrop,
        out,
    });
}

/// [`blend`] with the result written over the source.
#[tracing::instrument(level = "trace", skip_all, fields(%mode))]
pub fn blend_into_source(src: &mut SurfaceMut<'_>, backdrop: &Surface<'_>, mode: BlendMode) {
    mode.run(Binary::IntoSource {
        src,
        backdrop: *backdrop,
    });
}

/// [`blend`] with the result written over the backdrop.
#[tracing::instrument(level = "trace", skip_all, fields(%mode))]
pub fn blend_into_backdrop(src: &Surface<'_>, backdrop: &mut SurfaceMut<'_>, mode: BlendMode) {
    mode.run(Binary::IntoBackdrop {
        src: *src,
        backdrop,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
