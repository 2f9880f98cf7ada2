use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::escape::EscapeTime;
use crate::preset::Preset;
use crate::viewport::{pixel_to_sample, Viewport};
use crate::zoom::ZoomOutcome;

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub viewport: Viewport,
    pub escape: EscapeTime,
    pub width: u32,
    pub height: u32,
}

impl FrameParams {
    /// Plane coordinate sampled at the center of pixel `(px, py)`.
    #[inline]
    pub fn pixel_to_plane(&self, px: u32, py: u32) -> Complex {
        let (vx, vy) = pixel_to_sample(px, py, self.width, self.height);
        self.viewport.sample_to_plane(vx, vy)
    }
}

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    x: f64,
    y: f64,
    offset: Complex,
}

/// Interactive view state for one canvas.
///
/// Built from a [`Preset`]; scroll and drag handlers mutate the viewport,
/// and `revision` advances whenever the next frame would differ.
#[derive(Debug, Clone)]
pub struct Session {
    preset: Preset,
    escape: EscapeTime,
    viewport: Viewport,
    width: u32,
    height: u32,
    drag: Option<DragAnchor>,
    revision: u64,
}

impl Session {
    pub fn new(preset: Preset, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("dimensions must be > 0, got {width}×{height}"),
            });
        }
        preset.validate()?;
        let escape = preset.escape_time()?;
        let viewport = preset.default_viewport(width as f64 / height as f64)?;
        Ok(Self {
            preset,
            escape,
            viewport,
            width,
            height,
            drag: None,
            revision: 0,
        })
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn escape_time(&self) -> EscapeTime {
        self.escape
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            viewport: self.viewport,
            escape: self.escape,
            width: self.width,
            height: self.height,
        }
    }

    /// Plane coordinate under a (fractional) pixel position.
    pub fn pixel_to_plane(&self, x: f64, y: f64) -> Complex {
        let vx = 2.0 * x / self.width as f64 - 1.0;
        let vy = 1.0 - 2.0 * y / self.height as f64;
        self.viewport.sample_to_plane(vx, vy)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // -- Zoom --

    /// One scroll event: positive delta zooms in, negative zooms out.
    ///
    /// The magnitude is ignored; every event is exactly one table step.
    pub fn scroll(&mut self, delta: f64) -> bool {
        if delta > 0.0 {
            self.zoom_in()
        } else if delta < 0.0 {
            self.zoom_out()
        } else {
            false
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        let outcome = self.preset.zoom.zoom_in(self.viewport.scale);
        self.apply_zoom(outcome)
    }

    pub fn zoom_out(&mut self) -> bool {
        let outcome = self.preset.zoom.zoom_out(self.viewport.scale);
        self.apply_zoom(outcome)
    }

    fn apply_zoom(&mut self, outcome: ZoomOutcome) -> bool {
        match outcome {
            ZoomOutcome::Scaled(scale) => {
                self.viewport.scale = scale;
                self.touch();
                true
            }
            ZoomOutcome::Reset => {
                debug!(scale = self.viewport.scale, "Zoom-out bound reached, snapping to defaults");
                self.reset();
                true
            }
            ZoomOutcome::Unchanged => false,
        }
    }

    // -- Pan --

    /// Start a drag at pointer position `(x, y)` in pixels.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag = Some(DragAnchor {
            x,
            y,
            offset: self.viewport.offset,
        });
    }

    /// Move the view so the plane point grabbed at drag start follows the
    /// pointer to `(x, y)`.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        let dvx = 2.0 * (x - anchor.x) / self.width as f64;
        let dvy = -2.0 * (y - anchor.y) / self.height as f64;
        let delta = self.viewport.sample_delta_to_plane(dvx, dvy);
        self.viewport.offset = anchor.offset;
        self.viewport.shift_plane(-delta);
        self.touch();
        true
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    // -- Configuration --

    /// Back to the preset's default center/translate and scale.
    pub fn reset(&mut self) {
        self.viewport.offset = self.preset.default_offset;
        self.viewport.scale = self.preset.default_scale;
        self.drag = None;
        self.touch();
    }

    /// Follow a canvas resize. Zero-sized canvases are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.viewport.aspect_ratio = width as f64 / height as f64;
        self.touch();
        true
    }

    /// Switch to another preset, starting from its default view.
    pub fn set_preset(&mut self, preset: Preset) -> crate::Result<()> {
        preset.validate()?;
        let escape = preset.escape_time()?;
        let viewport = preset.default_viewport(self.viewport.aspect_ratio)?;
        debug!(name = %preset.name, "Switching preset");
        self.preset = preset;
        self.escape = escape;
        self.viewport = viewport;
        self.drag = None;
        self.touch();
        Ok(())
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> crate::Result<()> {
        self.escape = EscapeTime::new(max_iterations, self.escape.z_start(), self.escape.precision())?;
        self.preset.max_iterations = max_iterations;
        self.touch();
        Ok(())
    }
}
