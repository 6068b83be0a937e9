//! Porter-Duff operators and the arithmetic composite.

use std::fmt;
use std::str::FromStr;

use crate::foundation::error::FilterError;
use crate::foundation::pixel::{Channels, ClampChannel, div255};
use crate::foundation::surface::{Binary, Surface, SurfaceMut};

/// Porter-Duff operator applied by [`composite`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    /// Source over backdrop.
    #[default]
    Over,
    /// Source where the backdrop is opaque.
    In,
    /// Source where the backdrop is transparent.
    Out,
    /// Source over backdrop, clipped to the backdrop's coverage.
    Atop,
    /// Source and backdrop where they do not overlap.
    Xor,
}

impl CompositeOp {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 5] = [Self::Over, Self::In, Self::Out, Self::Atop, Self::Xor];

    /// Lowercase name, as used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::In => "in",
            Self::Out => "out",
            Self::Atop => "atop",
            Self::Xor => "xor",
        }
    }

    fn run(self, target: Binary<'_, '_, '_>) {
        match self {
            Self::Over => composite_with(target, |s, d| {
                let inv_sa = 255 - s.a;
                let mix = |sc: u32, dc: u32| sc + div255_u(dc * inv_sa);
                Channels::new(mix(s.r, d.r), mix(s.g, d.g), mix(s.b, d.b), mix(s.a, d.a))
            }),
            Self::In => composite_with(target, |s, d| {
                let da = d.a;
                Channels::new(
                    div255_u(s.r * da),
                    div255_u(s.g * da),
                    div255_u(s.b * da),
                    div255_u(s.a * da),
                )
            }),
            Self::Out => composite_with(target, |s, d| {
                let inv_da = 255 - d.a;
                Channels::new(
                    div255_u(s.r * inv_da),
                    div255_u(s.g * inv_da),
                    div255_u(s.b * inv_da),
                    div255_u(s.a * inv_da),
                )
            }),
            // Alpha is the backdrop's alone; the source never extends coverage.
            Self::Atop => composite_with(target, |s, d| {
                let (da, inv_sa) = (d.a, 255 - s.a);
                let mix = |sc: u32, dc: u32| div255_u(sc * da) + div255_u(dc * inv_sa);
                Channels::new(mix(s.r, d.r), mix(s.g, d.g), mix(s.b, d.b), da)
            }),
            Self::Xor => composite_with(target, |s, d| {
                let (inv_sa, inv_da) = (255 - s.a, 255 - d.a);
                let mix = |sc: u32, dc: u32| div255_u(sc * inv_da) + div255_u(dc * inv_sa);
                Channels::new(mix(s.r, d.r), mix(s.g, d.g), mix(s.b, d.b), mix(s.a, d.a))
            }),
        }
    }
}

impl fmt::Display for CompositeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompositeOp {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|op| op.name()).collect();
                FilterError::validation(format!(
                    "unknown composite operator '{s}' (expected one of: {})",
                    valid.join(", ")
                ))
            })
    }
}

#[inline]
fn div255_u(x: u32) -> u32 {
    div255(x as i32) as u32
}

fn composite_with<F>(target: Binary<'_, '_, '_>, op: F)
where
    F: Fn(Channels, Channels) -> Channels,
{
    target.run(|src, backdrop| {
        let c = op(Channels::unpack(src), Channels::unpack(backdrop));
        // Sums of two terms can exceed 255 on non-premultiplied input; keep channels separate.
        Channels::new(c.r.min(255), c.g.min(255), c.b.min(255), c.a.min(255)).pack()
    });
}

/// Composite `src` with `backdrop` using `op`, writing into `out`.
#[tracing::instrument(level = "trace", skip_all, fields(%op))]
pub fn composite(src: &Surface<'_>, backdrop: &Surface<'_>, out: &mut SurfaceMut<'_>, op: CompositeOp) {
    op.run(Binary::Separate {
        src: *src,
        backdrop: *backdrop,
        out,
    });
}

/// [`composite`] with the result written over the source.
#[tracing::instrument(level = "trace", skip_all, fields(%op))]
pub fn composite_into_source(src: &mut SurfaceMut<'_>, backdrop: &Surface<'_>, op: CompositeOp) {
    op.run(Binary::IntoSource {
        src,
        backdrop: *backdrop,
    });
}

/// [`composite`] with the result written over the backdrop.
#[tracing::instrument(level = "trace", skip_all, fields(%op))]
pub fn composite_into_backdrop(src: &Surface<'_>, backdrop: &mut SurfaceMut<'_>, op: CompositeOp) {
    op.run(Binary::IntoBackdrop {
        src: *src,
        backdrop,
    });
}

/// Coefficients of `k1*s*d/255 + k2*s + k3*d + k4*255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Arithmetic {
    /// Weight of the product term.
    pub k1: f32,
    /// Weight of the source.
    pub k2: f32,
    /// Weight of the backdrop.
    pub k3: f32,
    /// Constant offset, in units of full intensity.
    pub k4: f32,
}

impl Arithmetic {
    /// Coefficients that pass the source through unchanged.
    pub const SOURCE: Self = Self {
        k1: 0.0,
        k2: 1.0,
        k3: 0.0,
        k4: 0.0,
    };

    /// Build from the four coefficients.
    pub const fn new(k1: f32, k2: f32, k3: f32, k4: f32) -> Self {
        Self { k1, k2, k3, k4 }
    }

    #[inline]
    fn channel(&self, s: u32, d: u32) -> u32 {
        let v = self.k1 * ((s * d) as f32 / 255.0)
            + self.k2 * s as f32
            + self.k3 * d as f32
            + self.k4 * 255.0;
        v.clamp_channel()
    }

    fn run(self, target: Binary<'_, '_, '_>) {
        target.run(|src, backdrop| {
            let (s, d) = (Channels::unpack(src), Channels::unpack(backdrop));
            Channels::new(
                self.channel(s.r, d.r),
                self.channel(s.g, d.g),
                self.channel(s.b, d.b),
                self.channel(s.a, d.a),
            )
            .pack()
        });
    }
}

/// Per-channel `k1*s*d/255 + k2*s + k3*d + k4*255`, clamped to `[0, 255]`.
///
/// Channels are combined independently, so coefficients that scale color and alpha
/// differently can yield color above alpha.
#[tracing::instrument(level = "trace", skip(src, backdrop, out))]
pub fn composite_arithmetic(
    src: &Surface<'_>,
    backdrop: &Surface<'_>,
    out: &mut SurfaceMut<'_>,
    k1: f32,
    k2: f32,
    k3: f32,
    k4: f32,
) {
    Arithmetic::new(k1, k2, k3, k4).run(Binary::Separate {
        src: *src,
        backdrop: *backdrop,
        out,
    });
}

/// [`composite_arithmetic`] with the result written over the source.
#[tracing::instrument(level = "trace", skip(src, backdrop))]
pub fn composite_arithmetic_into_source(
    src: &mut SurfaceMut<'_>,
    backdrop: &Surface<'_>,
    k: Arithmetic,
) {
    k.run(Binary::IntoSource {
        src,
        backdrop: *backdrop,
    });
}

/// [`composite_arithmetic`] with the result written over the backdrop.
#[tracing::instrument(level = "trace", skip(src, backdrop))]
pub fn composite_arithmetic_into_backdrop(
    src: &Surface<'_>,
    backdrop: &mut SurfaceMut<'_>,
    k: Arithmetic,
) {
    k.run(Binary::IntoBackdrop {
        src: *src,
        backdrop,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
