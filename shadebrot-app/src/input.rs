use eframe::egui;

use crate::app::ShadebrotApp;

impl ShadebrotApp {
    /// Scroll zoom and drag pan on the canvas.
    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let origin = response.rect.min;
        self.cursor_plane = response.hover_pos().map(|pos| {
            self.session
                .pixel_to_plane((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
        });

        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y != 0.0 && response.hovered() {
            self.session.scroll(scroll_y as f64);
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session
                    .begin_drag((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session
                    .drag_to((pos.x - origin.x) as f64, (pos.y - origin.y) as f64);
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.session.end_drag();
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let (zoom_in, zoom_out, reset, next_preset, export, toggle_hud) = ctx.input(|input| {
            (
                input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals),
                input.key_pressed(egui::Key::Minus),
                input.key_pressed(egui::Key::R),
                input.key_pressed(egui::Key::P),
                input.key_pressed(egui::Key::S),
                input.key_pressed(egui::Key::H),
            )
        });

        if zoom_in {
            self.session.zoom_in();
        }
        if zoom_out {
            self.session.zoom_out();
        }
        if reset {
            self.session.reset();
        }
        if next_preset {
            self.cycle_preset();
        }
        if export {
            self.export_screenshot();
        }
        if toggle_hud {
            self.show_hud = !self.show_hud;
        }
    }
}
