use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::{egui, glow};
use tracing::{error, info, warn};

use shadebrot_core::{Complex, FrameParams, Precision, Preset, Session};
use shadebrot_render::{export_png, ColorRamp, ExportMetadata, RenderBuffer};

use crate::app_dir;
use crate::error::Result;
use crate::gpu::GpuRenderer;
use crate::preferences::{AppPreferences, BackendChoice};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
/// Seconds a status message stays on the HUD.
pub(crate) const STATUS_SECONDS: f32 = 5.0;

// ---------------------------------------------------------------------------
// Render statistics
// ---------------------------------------------------------------------------

/// What the HUD reports about the last frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameStats {
    pub(crate) backend: &'static str,
    pub(crate) elapsed: Duration,
    /// Escaped / interior counts; only the CPU path computes them.
    pub(crate) counts: Option<(usize, usize)>,
}

/// A transient message shown on the HUD.
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) at: Instant,
    pub(crate) is_error: bool,
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

pub struct ShadebrotApp {
    pub(crate) session: Session,
    pub(crate) presets: Vec<Preset>,
    pub(crate) preset_index: usize,
    pub(crate) ramp: ColorRamp,
    pub(crate) preferences: AppPreferences,

    gl: Option<Arc<glow::Context>>,
    pub(crate) gpu: Option<GpuRenderer>,

    texture: Option<egui::TextureHandle>,
    last_frame: Option<RenderBuffer>,
    rendered_revision: Option<u64>,
    pub(crate) stats: Option<FrameStats>,

    pub(crate) cursor_plane: Option<Complex>,
    pub(crate) show_hud: bool,
    pub(crate) status: Option<StatusMessage>,
}

impl ShadebrotApp {
    /// Build the app for the configured preset.
    ///
    /// A shader that fails to compile or link is returned as an error and
    /// aborts startup.
    pub fn new(cc: &eframe::CreationContext<'_>, preferences: AppPreferences) -> Result<Self> {
        let presets = preferences.presets();
        let preset_index = preferences.preset_index(&presets);
        let preset = presets[preset_index].clone();
        let size = preferences.window_size(&preset);

        let mut session = Session::new(preset, size[0] as u32, size[1] as u32)?;
        if let Some(n) = preferences.max_iterations {
            if let Err(e) = session.set_max_iterations(n) {
                warn!("Ignoring max_iterations override: {e}");
            }
        }
        let ramp = ColorRamp::from_preset(session.preset())?;

        let gl = match preferences.backend {
            BackendChoice::Gpu => {
                if cc.gl.is_none() {
                    warn!("No GL context available, using the CPU renderer");
                }
                cc.gl.clone()
            }
            BackendChoice::Cpu => None,
        };

        let gpu = match &gl {
            Some(gl) if wants_gpu(session.preset()) => {
                Some(GpuRenderer::new(Arc::clone(gl), session.preset(), &ramp)?)
            }
            Some(_) => {
                warn!(preset = %session.preset().name, "Double-precision preset, using the CPU renderer");
                None
            }
            None => None,
        };

        info!(
            preset = %session.preset().name,
            backend = if gpu.is_some() { "gpu" } else { "cpu" },
            "Session started"
        );

        Ok(Self {
            session,
            presets,
            preset_index,
            ramp,
            show_hud: preferences.show_hud,
            preferences,
            gl,
            gpu,
            texture: None,
            last_frame: None,
            rendered_revision: None,
            stats: None,
            cursor_plane: None,
            status: None,
        })
    }

    // -- Presets -----------------------------------------------------------

    /// Switch to the next preset in the list, wrapping around.
    pub(crate) fn cycle_preset(&mut self) {
        let next = (self.preset_index + 1) % self.presets.len();
        let preset = self.presets[next].clone();
        if let Err(e) = self.apply_preset(preset) {
            error!("Failed to switch preset: {e}");
            self.set_status(format!("Preset switch failed: {e}"), true);
            return;
        }
        self.preset_index = next;
        self.set_status(format!("Preset: {}", self.session.preset().name), false);
    }

    fn apply_preset(&mut self, preset: Preset) -> Result<()> {
        let ramp = ColorRamp::from_preset(&preset)?;
        self.session.set_preset(preset)?;
        if let Some(n) = self.preferences.max_iterations {
            if let Err(e) = self.session.set_max_iterations(n) {
                warn!("Ignoring max_iterations override: {e}");
            }
        }
        self.ramp = ramp;
        self.rebuild_gpu();
        Ok(())
    }

    /// The shader bakes in preset constants, so a new preset needs a new
    /// program.
    fn rebuild_gpu(&mut self) {
        if let Some(old) = self.gpu.take() {
            old.destroy();
        }
        let Some(gl) = &self.gl else {
            return;
        };
        if !wants_gpu(self.session.preset()) {
            warn!(preset = %self.session.preset().name, "Double-precision preset, using the CPU renderer");
            return;
        }
        match GpuRenderer::new(Arc::clone(gl), self.session.preset(), &self.ramp) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                error!("GPU backend unavailable, using the CPU renderer: {e}");
                self.gl = None;
            }
        }
    }

    // -- Rendering ---------------------------------------------------------

    fn render_if_needed(&mut self, ctx: &egui::Context) {
        if self.rendered_revision == Some(self.session.revision()) {
            return;
        }
        let frame = self.session.frame_params();
        match self.render_buffer(&frame) {
            Ok(buffer) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [buffer.width as usize, buffer.height as usize],
                    &buffer.pixels,
                );
                self.texture = Some(ctx.load_texture("fractal", image, egui::TextureOptions::LINEAR));
                self.last_frame = Some(buffer);
            }
            Err(e) => {
                error!("Render failed: {e}");
                self.set_status(format!("Render failed: {e}"), true);
            }
        }
        self.rendered_revision = Some(self.session.revision());
    }

    fn render_buffer(&mut self, frame: &FrameParams) -> Result<RenderBuffer> {
        if let Some(gpu) = self.gpu.as_mut() {
            let start = Instant::now();
            match gpu.render(frame) {
                Ok(buffer) => {
                    self.stats = Some(FrameStats {
                        backend: "GPU",
                        elapsed: start.elapsed(),
                        counts: None,
                    });
                    return Ok(buffer);
                }
                Err(e) => {
                    warn!("GPU render failed, falling back to the CPU renderer: {e}");
                    if let Some(gpu) = self.gpu.take() {
                        gpu.destroy();
                    }
                    self.gl = None;
                }
            }
        }

        let result = shadebrot_render::render(frame)?;
        self.stats = Some(FrameStats {
            backend: "CPU",
            elapsed: result.elapsed,
            counts: Some((result.escaped, result.interior)),
        });
        Ok(self.ramp.colorize(&result.iterations))
    }

    // -- Export ------------------------------------------------------------

    /// Save the frame currently on screen as a PNG under `images/`.
    pub(crate) fn export_screenshot(&mut self) {
        let Some(buffer) = &self.last_frame else {
            self.set_status("Nothing rendered yet".into(), true);
            return;
        };

        let dir = app_dir::images_directory();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            error!("Failed to create export directory: {e}");
            self.set_status(format!("Export failed: {e}"), true);
            return;
        }
        let name = format!(
            "{}_{}_{}x{}",
            self.session.preset().name,
            self.session.escape_time().max_iterations(),
            buffer.width,
            buffer.height
        );
        let path = app_dir::unique_path(&dir, &name, "png");
        let metadata = ExportMetadata::from_session(&self.session);

        match export_png(buffer, &path, &metadata) {
            Ok(()) => {
                info!("Exported {}", path.display());
                self.set_status(format!("Saved {}", path.display()), false);
            }
            Err(e) => {
                error!("Export failed: {e}");
                self.set_status(format!("Export failed: {e}"), true);
            }
        }
    }

    pub(crate) fn set_status(&mut self, text: String, is_error: bool) {
        self.status = Some(StatusMessage {
            text,
            at: Instant::now(),
            is_error,
        });
    }
}

/// Fragment shaders compute in `f32`; double-precision presets stay on the CPU.
fn wants_gpu(preset: &Preset) -> bool {
    preset.precision == Precision::Single
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for ShadebrotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_size();
                let width = available.x.max(1.0) as u32;
                let height = available.y.max(1.0) as u32;
                self.session.resize(width, height);

                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());
                self.handle_canvas_input(ctx, &response);
                self.render_if_needed(ctx);

                if let Some(ref tex) = self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                }
            });

        self.show_hud(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        self.preferences.preset = self.session.preset().name.clone();
        self.preferences.show_hud = self.show_hud;
        self.preferences.save();
    }
}
