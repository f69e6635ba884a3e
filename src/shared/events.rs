use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter};
use tracing::warn;
use ts_rs::TS;

use super::settings::AppSettings;
use super::types::{ProcessingPayload, TranslationResult};

/// Events pushed from the host process to the renderer.
///
/// The serde rename doubles as the wire event name, so the frontend
/// listens on the same strings this enum declares.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "payload")]
#[ts(export, export_to = "ui/bindings/")]
pub enum AppEvent {
    #[serde(rename = "translation://processing")]
    Processing(ProcessingPayload),

    #[serde(rename = "translation://success")]
    Success(TranslationResult),

    #[serde(rename = "translation://error")]
    Error(String),

    #[serde(rename = "translation://warning")]
    Warning(String),

    #[serde(rename = "translation://info")]
    Info(String),

    #[serde(rename = "ui://focus-input")]
    FocusInput,

    #[serde(rename = "settings://updated")]
    SettingsUpdated(AppSettings),
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::Processing(_) => "translation://processing",
            AppEvent::Success(_) => "translation://success",
            AppEvent::Error(_) => "translation://error",
            AppEvent::Warning(_) => "translation://warning",
            AppEvent::Info(_) => "translation://info",
            AppEvent::FocusInput => "ui://focus-input",
            AppEvent::SettingsUpdated(_) => "settings://updated",
        }
    }
}

/// Broadcast an application event to every window.
pub fn emit_event(app: &AppHandle, event: &AppEvent) {
    if let Err(err) = dispatch(app, event, None) {
        warn!(target: "events", "failed to emit {}: {err}", event.name());
    }
}

/// Push an application event to a single window by label.
pub fn emit_event_to(app: &AppHandle, label: &str, event: &AppEvent) {
    if let Err(err) = dispatch(app, event, Some(label)) {
        warn!(target: "events", "failed to emit {} to {label}: {err}", event.name());
    }
}

fn dispatch(app: &AppHandle, event: &AppEvent, label: Option<&str>) -> tauri::Result<()> {
    // Tauri's emit takes the payload type directly, so unwrap each
    // variant instead of sending the tagged enum envelope.
    match event {
        AppEvent::Processing(payload) => send(app, event.name(), payload, label),
        AppEvent::Success(result) => send(app, event.name(), result, label),
        AppEvent::Error(message)
        | AppEvent::Warning(message)
        | AppEvent::Info(message) => send(app, event.name(), message, label),
        AppEvent::FocusInput => send(app, event.name(), &(), label),
        AppEvent::SettingsUpdated(settings) => send(app, event.name(), settings, label),
    }
}

fn send<P: Serialize + Clone>(
    app: &AppHandle,
    name: &str,
    payload: &P,
    label: Option<&str>,
) -> tauri::Result<()> {
    match label {
        Some(label) => app.emit_to(label, name, payload.clone()),
        None => app.emit(name, payload.clone()),
    }
}
