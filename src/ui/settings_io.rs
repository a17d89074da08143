use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::ui::settings::GeneratorSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sketch_codegen");
    path.push("settings.json");
    path
}

pub fn load_settings() -> GeneratorSettings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &GeneratorSettings) -> anyhow::Result<()> {
    save_settings_to(&settings_path(), settings)
}

fn load_settings_from(path: &Path) -> GeneratorSettings {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            GeneratorSettings::default()
        }),
        Err(_) => GeneratorSettings::default(),
    }
}

fn save_settings_to(path: &Path, settings: &GeneratorSettings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating config directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}

/// Write generated code or a preview document chosen for download.
pub fn export_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sketch_codegen_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        assert_eq!(
            load_settings_from(&dir.join("settings.json")),
            GeneratorSettings::default()
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = temp_dir("save");
        let path = dir.join("nested").join("settings.json");
        let settings = GeneratorSettings {
            model: "llama".into(),
            canvas_width: 640.0,
            ..Default::default()
        };

        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), settings);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), GeneratorSettings::default());
        let _ = fs::remove_dir_all(&dir);
    }
}
