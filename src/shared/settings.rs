//! User preferences: a flat JSON document in the platform config
//! directory, loaded once at startup and persisted on every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tokio::fs;
use tracing::warn;
use ts_rs::TS;

use super::error::{AppError, AppResult};
use super::events::{emit_event, AppEvent};
use super::types::TranslationMode;

pub const OPACITY_MIN: f64 = 0.3;
pub const OPACITY_MAX: f64 = 1.0;

pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Vietnamese";

/// Speech-synthesis parameters for one language, applied by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "ui/bindings/")]
pub struct VoiceProfile {
    pub voice_name: Option<String>,
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            voice_name: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "ui/bindings/")]
pub struct AppSettings {
    pub model: String,
    pub target_language: String,
    pub translation_mode: TranslationMode,
    pub opacity: f64,
    pub startup_enabled: bool,
    pub voice_settings: HashMap<String, VoiceProfile>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            translation_mode: TranslationMode::Meaning,
            opacity: OPACITY_MAX,
            startup_enabled: false,
            voice_settings: HashMap::new(),
        }
    }
}

/// Clamp an opacity value to the supported window range. A NaN slider
/// value falls back to fully opaque.
pub fn clamp_opacity(value: f64) -> f64 {
    if value.is_nan() {
        return OPACITY_MAX;
    }
    value.clamp(OPACITY_MIN, OPACITY_MAX)
}

impl AppSettings {
    pub fn settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "traytranslate", "tray-translate")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Settings("could not determine config directory".to_string()))
    }

    pub async fn load() -> AppResult<Self> {
        Self::load_from(&Self::settings_path()?).await
    }

    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.persist_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Settings(format!("failed to read settings file: {e}")))?;
        let mut settings: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("failed to parse settings file: {e}")))?;
        settings.normalize();
        Ok(settings)
    }

    pub async fn save(&self) -> AppResult<()> {
        self.persist_to(&Self::settings_path()?).await
    }

    pub async fn persist_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Settings(format!("failed to create config directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Settings(format!("failed to serialize settings: {e}")))?;
        fs::write(path, content)
            .await
            .map_err(|e| AppError::Settings(format!("failed to write settings file: {e}")))
    }

    fn normalize(&mut self) {
        self.opacity = clamp_opacity(self.opacity);
    }
}

/// Process-wide preference record held in Tauri managed state.
pub struct SettingsState {
    inner: Mutex<AppSettings>,
}

impl SettingsState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }

    pub fn snapshot(&self) -> AppSettings {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply a mutation, persist it, and notify listeners. A failed write
    /// degrades to a `warning` event rather than rolling back the
    /// in-memory state.
    pub async fn update<F>(&self, app: &AppHandle, mutate: F) -> AppSettings
    where
        F: FnOnce(&mut AppSettings),
    {
        let snapshot = {
            let mut guard = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            mutate(&mut guard);
            guard.normalize();
            guard.clone()
        };

        match snapshot.save().await {
            Ok(()) => emit_event(app, &AppEvent::SettingsUpdated(snapshot.clone())),
            Err(err) => {
                warn!(target: "settings", "failed to persist preferences: {err}");
                emit_event(
                    app,
                    &AppEvent::Warning(format!("Could not save preferences: {err}")),
                );
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tray-translate-{name}-{}", std::process::id()))
            .join("settings.json")
    }

    async fn cleanup(path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent).await;
        }
    }

    #[test]
    fn opacity_clamps_to_bounds() {
        assert_eq!(clamp_opacity(2.0), OPACITY_MAX);
        assert_eq!(clamp_opacity(-1.0), OPACITY_MIN);
        assert_eq!(clamp_opacity(0.05), OPACITY_MIN);
        assert_eq!(clamp_opacity(0.7), 0.7);
        assert_eq!(clamp_opacity(f64::NAN), OPACITY_MAX);
    }

    #[test]
    fn defaults_match_first_run_behavior() {
        let settings = AppSettings::default();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.target_language, DEFAULT_TARGET_LANGUAGE);
        assert_eq!(settings.translation_mode, TranslationMode::Meaning);
        assert_eq!(settings.opacity, OPACITY_MAX);
        assert!(!settings.startup_enabled);
        assert!(settings.voice_settings.is_empty());
    }

    #[test]
    fn voice_profile_defaults() {
        let profile = VoiceProfile::default();
        assert!(profile.voice_name.is_none());
        assert_eq!(profile.rate, 1.0);
        assert_eq!(profile.pitch, 1.0);
        assert_eq!(profile.volume, 0.85);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let path = scratch_path("round-trip");

        let mut voices = HashMap::new();
        voices.insert(
            "Japanese".to_string(),
            VoiceProfile {
                voice_name: Some("Kyoko".to_string()),
                rate: 1.2,
                pitch: 0.9,
                volume: 0.6,
            },
        );
        let settings = AppSettings {
            model: "gpt-4.1-mini".to_string(),
            target_language: "Japanese".to_string(),
            translation_mode: TranslationMode::Detailed,
            opacity: 0.55,
            startup_enabled: true,
            voice_settings: voices,
        };

        settings.persist_to(&path).await.unwrap();
        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded, settings);

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn missing_file_yields_defaults_and_creates_it() {
        let path = scratch_path("first-run");

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded, AppSettings::default());
        assert!(path.exists());

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn out_of_range_opacity_clamps_on_load() {
        let path = scratch_path("clamp-on-load");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, r#"{"opacity": 3.5}"#).await.unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.opacity, OPACITY_MAX);

        tokio::fs::write(&path, r#"{"opacity": 0.01}"#).await.unwrap();
        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.opacity, OPACITY_MIN);

        cleanup(&path).await;
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let path = scratch_path("partial");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, r#"{"targetLanguage": "English"}"#)
            .await
            .unwrap();

        let loaded = AppSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded.target_language, "English");
        assert_eq!(loaded.model, DEFAULT_MODEL);

        cleanup(&path).await;
    }
}
