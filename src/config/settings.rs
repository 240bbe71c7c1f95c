use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {

    pub debounce_ms: u64,

    /// Shows development-only currencies in the selector
    pub development_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            development_mode: cfg!(debug_assertions),
        }
    }
}

impl Settings {
    /// `settings.json` next to the executable.
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("."))
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("settings.json")
    }

    /// Read `path` if it exists (missing fields keep their defaults), then
    /// apply `HYPERDEX_DEBOUNCE_MS` and `HYPERDEX_DEVELOPMENT`.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: Settings = serde_json::from_str(&content)?;
            tracing::info!("Loaded settings from {:?}", path);
            settings
        } else {
            Self::default()
        };

        Ok(settings.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var("HYPERDEX_DEBOUNCE_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => self.debounce_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid HYPERDEX_DEBOUNCE_MS: {}", raw),
            }
        }

        if let Ok(raw) = std::env::var("HYPERDEX_DEVELOPMENT") {
            self.development_mode = matches!(raw.as_str(), "1" | "true" | "yes");
        }

        self
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.debounce_ms, 500);
        assert_eq!(s.debounce_window(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(s.debounce_ms, Settings::default().debounce_ms);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "debounceMs": 250 }"#).unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.debounce_window(), Duration::from_millis(250));
        assert_eq!(s.development_mode, Settings::default().development_mode);
    }

    #[test]
    fn test_settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let saved = Settings {
            debounce_ms: 750,
            development_mode: true,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&saved).unwrap()).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), saved);
        assert!(Settings::load(&dir.path().join("nope.json")).is_ok());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
