use eframe::egui;

use shadebrot_core::CoordinateMapping;

use crate::app::{ShadebrotApp, HUD_CORNER_RADIUS, HUD_MARGIN, STATUS_SECONDS};

const HUD_ALPHA: u8 = 166;

impl ShadebrotApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        self.expire_status();
        if !self.show_hud {
            return;
        }

        // -- Top-left: view parameters --
        egui::Area::new(egui::Id::new("hud_params"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                hud_frame().show(ui, |ui| {
                    ui.style_mut().visuals.override_text_color =
                        Some(egui::Color32::from_rgb(220, 220, 220));

                    let preset = self.session.preset();
                    let vp = self.session.viewport();
                    ui.label(format!("Preset: {}", preset.name));
                    let offset_label = match vp.mapping {
                        CoordinateMapping::Biased { .. } => "Translate",
                        CoordinateMapping::CenterSubtracted => "Center",
                    };
                    ui.label(format!("{offset_label}: {:.10} {:+.10}i", vp.offset.re, vp.offset.im));
                    ui.label(format!("Scale: {:.3e}", vp.scale));
                    ui.label(format!(
                        "Iterations: {}",
                        self.session.escape_time().max_iterations()
                    ));
                    if let Some(c) = self.cursor_plane {
                        ui.label(format!("Cursor: {:.10} {:+.10}i", c.re, c.im));
                    }
                });
            });

        // -- Bottom-centre: render stats and status --
        egui::Area::new(egui::Id::new("hud_render"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN])
            .show(ctx, |ui| {
                hud_frame().show(ui, |ui| {
                    ui.style_mut().visuals.override_text_color =
                        Some(egui::Color32::from_rgb(200, 200, 200));
                    ui.style_mut().spacing.item_spacing.y = 2.0;

                    if let Some(stats) = self.stats {
                        ui.label(format!(
                            "{}: {:.1} ms",
                            stats.backend,
                            stats.elapsed.as_secs_f64() * 1000.0
                        ));
                        if let Some((escaped, interior)) = stats.counts {
                            ui.label(format!("Escaped: {escaped}  Interior: {interior}"));
                        }
                    }
                    if let Some(status) = &self.status {
                        let color = if status.is_error {
                            egui::Color32::from_rgb(255, 100, 100)
                        } else {
                            egui::Color32::from_rgb(100, 255, 140)
                        };
                        ui.colored_label(color, &status.text);
                    }
                    ui.small("+/- zoom  R reset  P preset  S save  H hide");
                });
            });

        if self.status.is_some() {
            ctx.request_repaint();
        }
    }

    fn expire_status(&mut self) {
        if let Some(status) = &self.status {
            if status.at.elapsed().as_secs_f32() > STATUS_SECONDS {
                self.status = None;
            }
        }
    }
}

fn hud_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
        .inner_margin(egui::Margin::same(8))
        .corner_radius(HUD_CORNER_RADIUS)
}
