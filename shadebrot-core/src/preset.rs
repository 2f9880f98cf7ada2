use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;
use crate::escape::{EscapeTime, Precision, ZStart};
use crate::viewport::{CoordinateMapping, Viewport};
use crate::zoom::ZoomConfig;

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];

/// Number of entries in every built-in color ramp.
pub const DEFAULT_RAMP_LENGTH: usize = 256;

/// What to do with an odd number of anchor colors before spacing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddAnchorPadding {
    /// Use the anchors as given.
    #[default]
    None,
    /// Append a black anchor so the count is even. Shifts every span.
    AppendBlack,
}

/// What fills the ramp entries left over after the equal-sized spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Leave them black, as a zero-initialized table would.
    Black,
    /// Repeat the last anchor.
    #[default]
    LastAnchor,
}

/// Every tunable constant of the viewer in one place.
///
/// A session is built from a preset; nothing reads these values from
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub z_start: ZStart,
    #[serde(default)]
    pub mapping: CoordinateMapping,
    #[serde(default = "default_offset")]
    pub default_offset: Complex,
    #[serde(default = "default_scale")]
    pub default_scale: f64,
    #[serde(default)]
    pub zoom: ZoomConfig,
    pub anchors: Vec<Rgb>,
    #[serde(default = "default_ramp_length")]
    pub ramp_length: usize,
    #[serde(default)]
    pub odd_padding: OddAnchorPadding,
    #[serde(default)]
    pub remainder: RemainderPolicy,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_max_iterations() -> u32 {
    150
}
fn default_offset() -> Complex {
    Complex::ZERO
}
fn default_scale() -> f64 {
    1.5
}
fn default_ramp_length() -> usize {
    DEFAULT_RAMP_LENGTH
}

impl Preset {
    /// Default configuration: `z₀ = 0` with a `-0.5` bias in f32. The palette
    /// uses no padding and fills the remainder with the last anchor.
    pub fn standard() -> Self {
        Self {
            name: "standard".into(),
            window_width: 1280,
            window_height: 720,
            max_iterations: 150,
            precision: Precision::Single,
            z_start: ZStart::Zero,
            mapping: CoordinateMapping::Biased { bias: -0.5 },
            default_offset: Complex::ZERO,
            default_scale: 1.5,
            zoom: ZoomConfig::powers_of_ten(5, 1.5),
            anchors: vec![
                [0, 7, 100],
                [32, 107, 203],
                [237, 255, 255],
                [255, 170, 0],
                [0, 2, 0],
            ],
            ramp_length: DEFAULT_RAMP_LENGTH,
            odd_padding: OddAnchorPadding::None,
            remainder: RemainderPolicy::LastAnchor,
        }
    }

    /// 1280×720 shader demo: `z₀ = c`, odd palette padded with black,
    /// leftover ramp entries black.
    pub fn classic() -> Self {
        Self {
            name: "classic".into(),
            max_iterations: 100,
            z_start: ZStart::C,
            anchors: vec![
                BLACK,
                [0, 7, 100],
                [255, 255, 255],
                [255, 170, 0],
                [128, 0, 0],
            ],
            odd_padding: OddAnchorPadding::AppendBlack,
            remainder: RemainderPolicy::Black,
            ..Self::standard()
        }
    }

    /// 1920×1080 double-precision preset with a deeper zoom table.
    pub fn deep() -> Self {
        Self {
            name: "deep".into(),
            window_width: 1920,
            window_height: 1080,
            max_iterations: 200,
            precision: Precision::Double,
            z_start: ZStart::C,
            zoom: ZoomConfig::powers_of_ten(12, 1.5),
            anchors: vec![BLACK, [0, 0, 255], [0, 255, 255], [255, 255, 255]],
            ..Self::standard()
        }
    }

    /// 400×400 preset that subtracts a center instead of biasing.
    pub fn square() -> Self {
        Self {
            name: "square".into(),
            window_width: 400,
            window_height: 400,
            max_iterations: 100,
            mapping: CoordinateMapping::CenterSubtracted,
            anchors: vec![BLACK, [255, 0, 0]],
            remainder: RemainderPolicy::Black,
            ..Self::standard()
        }
    }

    pub fn builtins() -> Vec<Preset> {
        vec![Self::standard(), Self::classic(), Self::deep(), Self::square()]
    }

    /// Look up a built-in preset by name (case-insensitive).
    pub fn by_name(name: &str) -> crate::Result<Self> {
        Self::builtins()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownPreset(name.to_string()))
    }

    /// Anchor list after odd-count padding.
    pub fn padded_anchors(&self) -> Vec<Rgb> {
        let mut anchors = self.anchors.clone();
        if self.odd_padding == OddAnchorPadding::AppendBlack && anchors.len() % 2 == 1 {
            anchors.push(BLACK);
        }
        anchors
    }

    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |reason: String| CoreError::InvalidPreset {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid(format!(
                "window must be non-empty, got {}×{}",
                self.window_width, self.window_height
            )));
        }
        if self.max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(self.max_iterations));
        }
        if self.anchors.len() < 2 {
            return Err(CoreError::TooFewAnchors(self.anchors.len()));
        }
        let spans = self.padded_anchors().len() - 1;
        if self.ramp_length < spans {
            return Err(invalid(format!(
                "ramp of {} entries cannot hold {spans} spans",
                self.ramp_length
            )));
        }
        if let CoordinateMapping::Biased { bias } = self.mapping {
            if !bias.is_finite() {
                return Err(invalid(format!("bias must be finite, got {bias}")));
            }
        }
        if !(self.default_offset.re.is_finite() && self.default_offset.im.is_finite()) {
            return Err(invalid("default offset must be finite".into()));
        }
        self.zoom.validate()?;
        if !(self.default_scale > 0.0 && self.default_scale <= self.zoom.max_scale) {
            return Err(invalid(format!(
                "default scale {} must be in (0, {}]",
                self.default_scale, self.zoom.max_scale
            )));
        }
        Ok(())
    }

    pub fn escape_time(&self) -> crate::Result<EscapeTime> {
        EscapeTime::new(self.max_iterations, self.z_start, self.precision)
    }

    /// The view a session starts from, and returns to on reset.
    pub fn default_viewport(&self, aspect_ratio: f64) -> crate::Result<Viewport> {
        Viewport::new(
            self.default_offset,
            self.default_scale,
            aspect_ratio,
            self.mapping,
        )
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid_and_unique() {
        let presets = Preset::builtins();
        for p in &presets {
            p.validate().unwrap_or_else(|e| panic!("{}: {e}", p.name));
        }
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn builtin_constants() {
        let classic = Preset::classic();
        assert_eq!((classic.window_width, classic.window_height), (1280, 720));
        assert_eq!(classic.z_start, ZStart::C);
        assert_eq!(classic.mapping, CoordinateMapping::Biased { bias: -0.5 });

        let deep = Preset::deep();
        assert_eq!((deep.window_width, deep.window_height), (1920, 1080));
        assert_eq!(deep.precision, Precision::Double);
        assert_eq!(deep.zoom.steps.len(), 12);

        let square = Preset::square();
        assert_eq!((square.window_width, square.window_height), (400, 400));
        assert_eq!(square.mapping, CoordinateMapping::CenterSubtracted);
        assert_eq!(square.z_start, ZStart::Zero);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(Preset::by_name("DEEP").unwrap().name, "deep");
        assert!(matches!(
            Preset::by_name("nope"),
            Err(CoreError::UnknownPreset(_))
        ));
    }

    #[test]
    fn odd_padding_appends_black_only_when_odd() {
        let classic = Preset::classic();
        let padded = classic.padded_anchors();
        assert_eq!(padded.len(), 6);
        assert_eq!(*padded.last().unwrap(), BLACK);

        let even = Preset {
            anchors: vec![[1, 2, 3], [4, 5, 6]],
            ..Preset::classic()
        };
        assert_eq!(even.padded_anchors().len(), 2);

        let unpadded = Preset::standard();
        assert_eq!(unpadded.padded_anchors().len(), unpadded.anchors.len());
    }

    #[test]
    fn validation_catches_bad_fields() {
        let one_anchor = Preset {
            anchors: vec![BLACK],
            ..Preset::standard()
        };
        assert!(matches!(
            one_anchor.validate(),
            Err(CoreError::TooFewAnchors(1))
        ));

        let no_iters = Preset {
            max_iterations: 0,
            ..Preset::standard()
        };
        assert!(no_iters.validate().is_err());

        let oversized = Preset {
            default_scale: 2.0,
            ..Preset::standard()
        };
        assert!(oversized.validate().is_err());

        let tiny_ramp = Preset {
            ramp_length: 2,
            ..Preset::standard()
        };
        assert!(tiny_ramp.validate().is_err());
    }

    #[test]
    fn json_round_trip_and_defaults() {
        let p = Preset::classic();
        let json = serde_json::to_string(&p).unwrap();
        let back: Preset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, p.name);
        assert_eq!(back.anchors, p.anchors);
        assert_eq!(back.mapping, p.mapping);
        assert_eq!(back.z_start, p.z_start);
        assert_eq!(back.odd_padding, p.odd_padding);
        assert_eq!(back.remainder, p.remainder);
        assert_eq!(back.zoom.steps.len(), p.zoom.steps.len());
        for (a, b) in back.zoom.steps.iter().zip(&p.zoom.steps) {
            assert!((a - b).abs() <= b * 1e-12);
        }

        let minimal: Preset =
            serde_json::from_str(r#"{"name":"mine","anchors":[[0,0,0],[0,255,0]]}"#).unwrap();
        assert_eq!(minimal.ramp_length, DEFAULT_RAMP_LENGTH);
        assert_eq!(minimal.default_scale, 1.5);
        assert_eq!(minimal.zoom, ZoomConfig::default());
        assert!(minimal.validate().is_ok());
    }

    #[test]
    fn mapping_serializes_tagged() {
        let json = serde_json::to_string(&CoordinateMapping::CenterSubtracted).unwrap();
        assert_eq!(json, r#"{"kind":"center_subtracted"}"#);
        let biased: CoordinateMapping =
            serde_json::from_str(r#"{"kind":"biased","bias":-0.25}"#).unwrap();
        assert_eq!(biased, CoordinateMapping::Biased { bias: -0.25 });
    }
}
