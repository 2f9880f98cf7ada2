use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use shadebrot_core::Preset;

// ---------------------------------------------------------------------------
// Backend choice
// ---------------------------------------------------------------------------

/// Which renderer draws the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendChoice {
    /// Fragment shader when a GL context exists and the preset is single
    /// precision; CPU otherwise.
    #[default]
    Gpu,
    /// Always the row-parallel CPU renderer.
    Cpu,
}

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

/// Startup configuration. Never holds view state: every launch starts from
/// the chosen preset's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub backend: BackendChoice,
    /// Overrides the preset's window width when set.
    #[serde(default)]
    pub window_width: Option<u32>,
    #[serde(default)]
    pub window_height: Option<u32>,
    /// Overrides the preset's iteration cap when set.
    #[serde(default)]
    pub max_iterations: Option<u32>,
    #[serde(default = "default_true")]
    pub show_hud: bool,
    /// Extra presets offered after the built-in ones.
    #[serde(default)]
    pub custom_presets: Vec<Preset>,
}

fn default_preset() -> String {
    "standard".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            backend: BackendChoice::default(),
            window_width: None,
            window_height: None,
            max_iterations: None,
            show_hud: true,
            custom_presets: Vec::new(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from the executable directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Built-in presets followed by the valid custom ones.
    ///
    /// Custom presets that fail validation or reuse an earlier name are
    /// skipped with a warning.
    pub fn presets(&self) -> Vec<Preset> {
        let mut presets = Preset::builtins();
        for custom in &self.custom_presets {
            if let Err(e) = custom.validate() {
                warn!("Skipping custom preset: {e}");
                continue;
            }
            if presets
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&custom.name))
            {
                warn!(name = %custom.name, "Skipping custom preset with a duplicate name");
                continue;
            }
            presets.push(custom.clone());
        }
        presets
    }

    /// Index of the configured preset in `presets`, or of the first preset
    /// when the name is unknown.
    pub fn preset_index(&self, presets: &[Preset]) -> usize {
        match presets
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(&self.preset))
        {
            Some(i) => i,
            None => {
                warn!(name = %self.preset, "Unknown preset in preferences, using default");
                0
            }
        }
    }

    /// Window size for `preset` after applying overrides.
    pub fn window_size(&self, preset: &Preset) -> [f32; 2] {
        [
            self.window_width.unwrap_or(preset.window_width).max(1) as f32,
            self.window_height.unwrap_or(preset.window_height).max(1) as f32,
        ]
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
