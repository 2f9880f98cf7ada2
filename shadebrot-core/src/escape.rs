use serde::{Deserialize, Serialize};

use crate::complex::{Complex, Real};
use crate::error::CoreError;

/// `|z|²` above which an orbit counts as escaped (`|z| > 2`).
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Initial orbit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZStart {
    /// `z₀ = 0`, the textbook recurrence.
    #[default]
    Zero,
    /// `z₀ = c`, one step ahead of [`ZStart::Zero`].
    C,
}

/// Floating-point width used for the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// `f32`, matching a fragment shader.
    #[default]
    Single,
    /// `f64`, extends usable zoom depth.
    Double,
}

/// Escape-time evaluation: how many steps of `z ← z² + c` before `|z|² > 4`.
///
/// Pure and total on finite input. Returns the index of the step on which
/// the orbit escaped, or `max_iterations` if it never did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeTime {
    max_iterations: u32,
    z_start: ZStart,
    precision: Precision,
}

impl EscapeTime {
    pub fn new(max_iterations: u32, z_start: ZStart, precision: Precision) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        Ok(Self {
            max_iterations,
            z_start,
            precision,
        })
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[inline]
    pub fn z_start(&self) -> ZStart {
        self.z_start
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Evaluate one plane point at the configured precision.
    #[inline]
    pub fn evaluate(&self, c: Complex) -> u32 {
        match self.precision {
            Precision::Single => escape_time(c.cast::<f32>(), self.max_iterations, self.z_start),
            Precision::Double => escape_time(c, self.max_iterations, self.z_start),
        }
    }
}

/// The iteration itself, written once for both precisions.
#[inline]
pub fn escape_time<T: Real>(c: Complex<T>, max_iterations: u32, z_start: ZStart) -> u32 {
    let bailout = T::from_f64(ESCAPE_RADIUS_SQ);
    let mut z = match z_start {
        ZStart::Zero => Complex::<T>::ZERO,
        ZStart::C => c,
    };
    for i in 0..max_iterations {
        z = z.square_add(c);
        if z.norm_sq() > bailout {
            return i;
        }
    }
    max_iterations
}
