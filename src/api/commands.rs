//! Tauri commands: the request/response half of the renderer bridge.
//! Preference setters persist immediately; a failed write is degraded
//! to a `warning` event by the settings state rather than failing the
//! command.

use std::collections::HashMap;

use tauri::{AppHandle, State};
use tauri_plugin_autostart::ManagerExt;

use crate::core::orchestrator::{self, WindowPresenter};
use crate::core::translator::OpenAiTranslator;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::{clamp_opacity, AppSettings, SettingsState, VoiceProfile};
use crate::shared::types::{ManualTranslatePayload, TranslationMode, TranslationRequest, TranslationResult};
use crate::system::shell::AppShell;

#[tauri::command]
pub async fn get_settings(settings: State<'_, SettingsState>) -> AppResult<AppSettings> {
    Ok(settings.snapshot())
}

#[tauri::command]
pub async fn set_model(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    model: String,
) -> AppResult<()> {
    settings.update(&app, |s| s.model = model).await;
    Ok(())
}

#[tauri::command]
pub async fn set_target_language(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    target_language: String,
) -> AppResult<()> {
    settings
        .update(&app, |s| s.target_language = target_language)
        .await;
    Ok(())
}

#[tauri::command]
pub async fn set_translation_mode(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    mode: TranslationMode,
) -> AppResult<()> {
    settings.update(&app, |s| s.translation_mode = mode).await;
    Ok(())
}

#[tauri::command]
pub async fn set_opacity(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    shell: State<'_, AppShell>,
    opacity: f64,
) -> AppResult<()> {
    let opacity = clamp_opacity(opacity);
    shell.window().set_opacity(opacity);
    settings.update(&app, |s| s.opacity = opacity).await;
    Ok(())
}

#[tauri::command]
pub async fn set_startup_enabled(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    enabled: bool,
) -> AppResult<()> {
    let autolaunch = app.autolaunch();
    let result = if enabled {
        autolaunch.enable()
    } else {
        autolaunch.disable()
    };
    result.map_err(|e| AppError::Settings(format!("could not update login item: {e}")))?;

    settings.update(&app, |s| s.startup_enabled = enabled).await;
    Ok(())
}

/// Reads the actual login-item state rather than the persisted flag, so
/// the checkbox reflects reality even if the user changed it in the
/// system settings.
#[tauri::command]
pub async fn get_startup_enabled(app: AppHandle) -> AppResult<bool> {
    app.autolaunch()
        .is_enabled()
        .map_err(|e| AppError::Settings(e.to_string()))
}

#[tauri::command]
pub async fn set_voice_settings(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    voice_settings: HashMap<String, VoiceProfile>,
) -> AppResult<()> {
    settings
        .update(&app, |s| s.voice_settings = voice_settings)
        .await;
    Ok(())
}

/// Translate on behalf of the renderer's translate button. The window
/// receives the same processing/success/error events a hotkey dispatch
/// would push, and the call also answers the invoking renderer directly.
#[tauri::command]
pub async fn manual_translate(
    app: AppHandle,
    settings: State<'_, SettingsState>,
    shell: State<'_, AppShell>,
    backend: State<'_, OpenAiTranslator>,
    payload: ManualTranslatePayload,
) -> AppResult<TranslationResult> {
    let text = payload.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let current = settings.snapshot();
    let mode_override = payload.translation_mode;
    let model = payload.model.unwrap_or(current.model);
    let target_language = payload
        .target_language
        .unwrap_or(current.target_language);
    let mode = mode_override.unwrap_or(current.translation_mode);

    // A manual translate doubles as a preference change for the chosen
    // target language (and mode, when one was picked explicitly).
    {
        let target_language = target_language.clone();
        settings
            .update(&app, move |s| {
                s.target_language = target_language;
                if let Some(mode) = mode_override {
                    s.translation_mode = mode;
                }
            })
            .await;
    }

    shell.window().ensure()?;
    shell.window().show()?;

    let request = TranslationRequest::new(text, model, target_language, mode)?;
    orchestrator::translate_and_report(
        shell.window(),
        backend.inner(),
        shell.sequencer(),
        request,
    )
    .await
}

#[tauri::command]
pub async fn hide_window(shell: State<'_, AppShell>) -> AppResult<()> {
    shell.window().hide()
}
