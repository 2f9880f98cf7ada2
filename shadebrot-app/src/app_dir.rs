//! Directory where the executable lives. Preferences and screenshots are
//! stored next to the app so it can run as a standalone exe.

use std::path::{Path, PathBuf};

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Directory for exported screenshots.
pub fn images_directory() -> PathBuf {
    exe_directory().join("images")
}

/// First `name.ext`, `name_001.ext`, `name_002.ext`, ... that does not exist yet.
pub fn unique_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    let base = dir.join(format!("{name}.{ext}"));
    if !base.exists() {
        return base;
    }
    for i in 1..10000 {
        let candidate = dir.join(format!("{name}_{i:03}.{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }
    dir.join(format!("{name}_export.{ext}"))
}
