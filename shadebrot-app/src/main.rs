mod app;
mod app_dir;
mod error;
mod gpu;
mod hud;
mod input;
mod preferences;
mod shader;

use eframe::egui;
use tracing::info;

use app::ShadebrotApp;
use preferences::AppPreferences;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting shadebrot");

    let prefs = AppPreferences::load();
    let presets = prefs.presets();
    let size = prefs.window_size(&presets[prefs.preset_index(&presets)]);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("shadebrot")
            .with_inner_size(size),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "shadebrot",
        options,
        Box::new(move |cc| Ok(Box::new(ShadebrotApp::new(cc, prefs)?))),
    )
}
