use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::app::infrastructure::error::{AppError, Result};

/// Preview stylesheet flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Quiet period before a re-render, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub theme_mode: ThemeMode,

    #[serde(default = "default_true")]
    pub auto_pair_enabled: bool,

    #[serde(default = "default_true")]
    pub highlighting_enabled: bool,

    /// Embed mermaid.js and convert ```mermaid fences into diagram containers.
    #[serde(default = "default_true")]
    pub mermaid_enabled: bool,

    /// Embed MathJax for `$...$` and `$$...$$`.
    #[serde(default = "default_true")]
    pub math_enabled: bool,

    #[serde(default)]
    pub last_open_directory: Option<String>,
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_true() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            theme_mode: ThemeMode::default(),
            auto_pair_enabled: true,
            highlighting_enabled: true,
            mermaid_enabled: true,
            math_enabled: true,
            last_open_directory: None,
        }
    }
}

impl AppSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load settings from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_or_default(&Self::get_config_path())
    }

    /// Load from `path`; a missing file yields defaults silently, a corrupt one
    /// yields defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(AppError::FileRead { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(e) => {
                warn!("{e}. Using default settings.");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::read(path, e))?;
        let settings: Self = serde_json::from_str(&contents)
            .map_err(|e| AppError::Settings(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::write(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| AppError::write(path, e))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.debounce_ms > 10_000 {
            return Err(AppError::Settings(format!(
                "debounce_ms must be at most 10000, got {}",
                self.debounce_ms
            )));
        }
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("simple-md");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.debounce_ms, 150);
        assert_eq!(settings.debounce(), Duration::from_millis(150));
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert!(settings.auto_pair_enabled);
        assert!(settings.highlighting_enabled);
        assert!(settings.mermaid_enabled);
        assert!(settings.math_enabled);
        assert!(settings.last_open_directory.is_none());
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"auto_pair_enabled": false}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.debounce_ms, 150);
        assert!(!settings.auto_pair_enabled);
    }

    #[test]
    fn test_theme_mode_serialization() {
        let settings = AppSettings {
            theme_mode: ThemeMode::Light,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"Light\""));
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");
        let settings = AppSettings {
            debounce_ms: 300,
            last_open_directory: Some("/home/me/notes".to_string()),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load_or_default(&dir.path().join("nope.json"));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppSettings::load_from(&path), Err(AppError::Settings(_))));
        assert_eq!(AppSettings::load_or_default(&path), AppSettings::default());
    }

    #[test]
    fn test_rejects_absurd_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = AppSettings {
            debounce_ms: 60_000,
            ..Default::default()
        };
        assert!(settings.save_to(&path).is_err());
        assert!(!path.exists());
    }
}
