use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A step only applies while `scale >= STEP_HEADROOM * step`, so one step
/// never removes more than two thirds of the current scale.
const STEP_HEADROOM: f64 = 1.5;

/// Scroll-zoom configuration: a descending table of step sizes and the
/// zoom-out bound.
///
/// Steps shrink as the scale shrinks, which keeps the *relative* zoom speed
/// roughly constant instead of the absolute one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub steps: Vec<f64>,
    pub max_scale: f64,
}

/// What a zoom request did to the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomOutcome {
    /// The scale moved to the contained value.
    Scaled(f64),
    /// Zoom-out hit `max_scale`; the caller restores its defaults.
    Reset,
    /// No step applies at this scale (deepest zoom reached).
    Unchanged,
}

impl ZoomConfig {
    /// Powers of ten from `10^-1` down to `10^-smallest_exponent`.
    pub fn powers_of_ten(smallest_exponent: i32, max_scale: f64) -> Self {
        Self {
            steps: (1..=smallest_exponent).map(|e| 1.0 / 10f64.powi(e)).collect(),
            max_scale,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.steps.is_empty() {
            return Err(CoreError::InvalidZoomTable {
                reason: "step table is empty".into(),
            });
        }
        if let Some(bad) = self.steps.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(CoreError::InvalidZoomTable {
                reason: format!("steps must be positive and finite, got {bad}"),
            });
        }
        if self.steps.windows(2).any(|w| w[1] >= w[0]) {
            return Err(CoreError::InvalidZoomTable {
                reason: "steps must be strictly descending".into(),
            });
        }
        if !(self.max_scale.is_finite() && self.max_scale > 0.0) {
            return Err(CoreError::InvalidZoomTable {
                reason: format!("max scale must be positive and finite, got {}", self.max_scale),
            });
        }
        Ok(())
    }

    /// Largest step that fits the current scale, if any.
    pub fn step_for(&self, scale: f64) -> Option<f64> {
        self.steps
            .iter()
            .copied()
            .find(|&step| scale >= STEP_HEADROOM * step)
    }

    /// Smallest step in the table.
    pub fn finest_step(&self) -> f64 {
        self.steps.last().copied().unwrap_or(f64::MIN_POSITIVE)
    }

    /// One zoom-in step from `scale`.
    pub fn zoom_in(&self, scale: f64) -> ZoomOutcome {
        match self.step_for(scale) {
            Some(step) => ZoomOutcome::Scaled(scale - step),
            None => ZoomOutcome::Unchanged,
        }
    }

    /// One zoom-out step from `scale`, resetting once `max_scale` is reached.
    pub fn zoom_out(&self, scale: f64) -> ZoomOutcome {
        let step = self.step_for(scale).unwrap_or_else(|| self.finest_step());
        let next = scale + step;
        if next >= self.max_scale {
            ZoomOutcome::Reset
        } else {
            ZoomOutcome::Scaled(next)
        }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self::powers_of_ten(5, 1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let z = ZoomConfig::default();
        assert_eq!(z.steps.len(), 5);
        assert!((z.steps[0] - 0.1).abs() < 1e-15);
        assert!((z.finest_step() - 0.00001).abs() < 1e-18);
        assert!(z.validate().is_ok());
    }

    #[test]
    fn step_shrinks_with_scale() {
        let z = ZoomConfig::default();
        assert_eq!(z.step_for(1.5), Some(0.1));
        assert_eq!(z.step_for(0.1), Some(0.01));
        assert_eq!(z.step_for(0.002), Some(0.001));
        assert_eq!(z.step_for(0.00001), None);
    }

    #[test]
    fn zooming_in_strictly_decreases() {
        let z = ZoomConfig::default();
        let mut scale = 1.5;
        let mut steps_taken = 0;
        loop {
            match z.zoom_in(scale) {
                ZoomOutcome::Scaled(next) => {
                    assert!(next < scale, "{next} !< {scale}");
                    assert!(next > 0.0);
                    let taken = scale - next;
                    assert!(
                        z.steps.iter().any(|s| (s - taken).abs() < 1e-12),
                        "one call subtracts exactly one table step, took {taken}"
                    );
                    scale = next;
                    steps_taken += 1;
                }
                ZoomOutcome::Unchanged => break,
                ZoomOutcome::Reset => panic!("zoom in never resets"),
            }
            assert!(steps_taken < 1000, "zoom-in must bottom out");
        }
        assert!(scale >= z.finest_step() / 2.0);
        assert!(scale < STEP_HEADROOM * z.finest_step());
    }

    #[test]
    fn zoom_out_from_default_resets() {
        let z = ZoomConfig::default();
        assert_eq!(z.zoom_out(1.5), ZoomOutcome::Reset);
        assert_eq!(z.zoom_out(1.45), ZoomOutcome::Reset);
    }

    #[test]
    fn zoom_out_grows_below_bound() {
        let z = ZoomConfig::default();
        match z.zoom_out(0.5) {
            ZoomOutcome::Scaled(s) => assert!((s - 0.6).abs() < 1e-12),
            other => panic!("unexpected {other:?}"),
        }
        // Below the finest step the smallest step is still used.
        match z.zoom_out(0.000001) {
            ZoomOutcome::Scaled(s) => assert!((s - 0.000011).abs() < 1e-15),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn in_then_out_returns_close_to_start() {
        let z = ZoomConfig::default();
        let mut scale = 0.7;
        if let ZoomOutcome::Scaled(s) = z.zoom_in(scale) {
            scale = s;
        }
        if let ZoomOutcome::Scaled(s) = z.zoom_out(scale) {
            scale = s;
        }
        assert!((scale - 0.7).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_bad_tables() {
        let mut z = ZoomConfig::default();
        z.steps.clear();
        assert!(z.validate().is_err());

        let z = ZoomConfig {
            steps: vec![0.01, 0.1],
            max_scale: 1.5,
        };
        assert!(z.validate().is_err());

        let z = ZoomConfig {
            steps: vec![0.1, -0.01],
            max_scale: 1.5,
        };
        assert!(z.validate().is_err());

        let z = ZoomConfig {
            steps: vec![0.1],
            max_scale: 0.0,
        };
        assert!(z.validate().is_err());
    }
}
