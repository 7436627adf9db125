use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ui::settings::AppSettings;

pub const API_KEY_VAR: &str = "API_KEY";
pub const API_BASE_VAR: &str = "EMBER_API_BASE";

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(crate::APP_DIR);
    path.push("settings.json");
    path
}

/// Settings from disk, then environment overrides. A missing or broken
/// file means defaults.
pub fn load_settings() -> AppSettings {
    let path = settings_path();
    let mut settings = match read_settings(&path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::info!("using default settings: {e:#}");
            AppSettings::default()
        }
    };
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn save_settings(settings: &AppSettings) -> Result<()> {
    write_settings(&settings_path(), settings)
}

fn read_settings(path: &Path) -> Result<AppSettings> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn write_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // Keys from the environment stay out of the file.
    let mut on_disk = settings.clone();
    if std::env::var(API_KEY_VAR).is_ok() {
        on_disk.llm.api_key = None;
    }
    let json = serde_json::to_string_pretty(&on_disk)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn apply_env(settings: &mut AppSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(key) = var(API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
        settings.llm.api_key = Some(key);
    }
    if let Some(base) = var(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
        settings.llm.base_url = base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::scene::SceneType;

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"llm": {"text_model": "gpt-story"}, "audio": {"tracks": {"forest": "/tmp/forest.ogg"}}}"#,
        )
        .unwrap();

        let settings = read_settings(&path).unwrap();
        assert_eq!(settings.llm.text_model, "gpt-story");
        assert_eq!(settings.llm.base_url, "http://localhost:1234/v1");
        assert_eq!(
            settings.audio.tracks.get(&SceneType::Forest),
            Some(&PathBuf::from("/tmp/forest.ogg"))
        );
        assert_eq!(settings.ui.typewriter_ms, 25);
    }

    #[test]
    fn environment_overrides_key_and_base_url() {
        let mut settings = AppSettings::default();
        apply_env(&mut settings, |key| match key {
            API_KEY_VAR => Some("sk-test".into()),
            API_BASE_VAR => Some("https://api.example.com/v1".into()),
            _ => None,
        });
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.llm.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut settings = AppSettings::default();
        apply_env(&mut settings, |_| Some("  ".into()));
        assert!(settings.llm.api_key.is_none());
    }

    #[test]
    fn written_settings_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("settings.json");
        let mut settings = AppSettings::default();
        settings.ui.ui_scale = 1.5;

        write_settings(&path, &settings).unwrap();
        assert_eq!(read_settings(&path).unwrap().ui.ui_scale, 1.5);
    }
}
