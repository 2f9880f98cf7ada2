use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// How normalized screen coordinates land on the complex plane.
///
/// The mapping decides which region is visible at the default viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateMapping {
    /// `c = (aspect·vx·scale + bias + offset.x, vy·scale + offset.y)`.
    ///
    /// `offset` acts as a translation added to every sample.
    Biased { bias: f64 },

    /// `c = (aspect·vx·scale − offset.x, vy·scale − offset.y)`.
    ///
    /// `offset` acts as a center subtracted from every sample, no bias.
    CenterSubtracted,
}

impl CoordinateMapping {
    /// Sign applied to the viewport offset in the forward map.
    #[inline]
    pub fn offset_sign(self) -> f64 {
        match self {
            Self::Biased { .. } => 1.0,
            Self::CenterSubtracted => -1.0,
        }
    }

    /// Constant added to the real part in the forward map.
    #[inline]
    pub fn bias(self) -> f64 {
        match self {
            Self::Biased { bias } => bias,
            Self::CenterSubtracted => 0.0,
        }
    }
}

impl Default for CoordinateMapping {
    fn default() -> Self {
        Self::Biased { bias: -0.5 }
    }
}

/// The visible region of the complex plane.
///
/// `offset` is the translate (biased mapping) or center (center-subtracted
/// mapping); `scale` is the half-height of the view in plane units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Complex,
    pub scale: f64,
    pub aspect_ratio: f64,
    pub mapping: CoordinateMapping,
}

impl Viewport {
    pub fn new(
        offset: Complex,
        scale: f64,
        aspect_ratio: f64,
        mapping: CoordinateMapping,
    ) -> crate::Result<Self> {
        if scale <= 0.0 || !scale.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("scale must be positive and finite, got {scale}"),
            });
        }
        if aspect_ratio <= 0.0 || !aspect_ratio.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("aspect ratio must be positive and finite, got {aspect_ratio}"),
            });
        }
        Ok(Self {
            offset,
            scale,
            aspect_ratio,
            mapping,
        })
    }

    /// Map a normalized sample `(vx, vy) ∈ [-1, 1]²` to the complex plane.
    #[inline]
    pub fn sample_to_plane(&self, vx: f64, vy: f64) -> Complex {
        let sign = self.mapping.offset_sign();
        Complex::new(
            self.aspect_ratio * vx * self.scale + self.mapping.bias() + sign * self.offset.re,
            vy * self.scale + sign * self.offset.im,
        )
    }

    /// Inverse of [`sample_to_plane`](Self::sample_to_plane).
    #[inline]
    pub fn plane_to_sample(&self, c: Complex) -> (f64, f64) {
        let sign = self.mapping.offset_sign();
        let vx = (c.re - self.mapping.bias() - sign * self.offset.re)
            / (self.aspect_ratio * self.scale);
        let vy = (c.im - sign * self.offset.im) / self.scale;
        (vx, vy)
    }

    /// Plane-space displacement produced by a normalized-space displacement.
    #[inline]
    pub fn sample_delta_to_plane(&self, dvx: f64, dvy: f64) -> Complex {
        Complex::new(self.aspect_ratio * dvx * self.scale, dvy * self.scale)
    }

    /// Move the offset so the whole image shifts by `delta` in the plane.
    ///
    /// A positive delta makes every sample land `delta` further along,
    /// whichever way the mapping applies the offset.
    pub fn shift_plane(&mut self, delta: Complex) {
        let sign = self.mapping.offset_sign();
        self.offset.re += sign * delta.re;
        self.offset.im += sign * delta.im;
    }
}

/// Normalized sample at the center of pixel `(px, py)` on a `width × height`
/// canvas. Row 0 is the top of the image (`vy` close to `+1`).
#[inline]
pub fn pixel_to_sample(px: u32, py: u32, width: u32, height: u32) -> (f64, f64) {
    let vx = 2.0 * (px as f64 + 0.5) / width as f64 - 1.0;
    let vy = 1.0 - 2.0 * (py as f64 + 0.5) / height as f64;
    (vx, vy)
}
