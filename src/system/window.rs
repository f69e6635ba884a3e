//! The single floating translator window.

#[cfg(target_os = "macos")]
pub mod macos;

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tracing::{debug, warn};

use crate::core::orchestrator::WindowPresenter;
use crate::shared::error::AppResult;
use crate::shared::events::{emit_event_to, AppEvent};
use crate::shared::settings::SettingsState;

pub const WINDOW_LABEL: &str = "translator";

const WINDOW_TITLE: &str = "Tray Translate";
const WINDOW_WIDTH: f64 = 800.0;
const WINDOW_HEIGHT: f64 = 420.0;
const MIN_WIDTH: f64 = 600.0;
const MIN_HEIGHT: f64 = 300.0;

/// Tauri-backed implementation of the `WindowPresenter` capability.
/// Holds no window handle of its own; the window is looked up by label
/// so a destroyed window is observed rather than dangled.
#[derive(Clone)]
pub struct TranslatorWindow {
    app: AppHandle,
}

impl TranslatorWindow {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn existing(&self) -> Option<WebviewWindow> {
        self.app.get_webview_window(WINDOW_LABEL)
    }

    fn create(&self) -> AppResult<WebviewWindow> {
        let window = WebviewWindowBuilder::new(
            &self.app,
            WINDOW_LABEL,
            WebviewUrl::App("index.html".into()),
        )
        .title(WINDOW_TITLE)
        .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .min_inner_size(MIN_WIDTH, MIN_HEIGHT)
        .resizable(true)
        .decorations(false)
        .transparent(true)
        .skip_taskbar(true)
        .always_on_top(true)
        .visible(false)
        .focused(true)
        .center()
        .build()?;

        #[cfg(target_os = "macos")]
        if let Err(err) = macos::configure_overlay(&window) {
            warn!(target: "window", "failed to configure overlay behavior: {err}");
        }

        // Re-apply the persisted opacity; a freshly created window
        // starts fully opaque.
        if let Some(settings) = self.app.try_state::<SettingsState>() {
            apply_opacity(&window, settings.snapshot().opacity);
        }

        debug!(target: "window", "created translator window");
        Ok(window)
    }
}

impl WindowPresenter for TranslatorWindow {
    fn ensure(&self) -> AppResult<bool> {
        if self.existing().is_some() {
            return Ok(false);
        }
        self.create()?;
        Ok(true)
    }

    fn show(&self) -> AppResult<()> {
        let window = match self.existing() {
            Some(window) => window,
            None => self.create()?,
        };

        // AppKit can drop the overlay level when the window cycles
        // through hidden, so re-assert it on every show.
        #[cfg(target_os = "macos")]
        if let Err(err) = macos::configure_overlay(&window) {
            warn!(target: "window", "failed to re-assert overlay behavior: {err}");
        }

        window.show()?;
        window.set_focus()?;
        Ok(())
    }

    fn hide(&self) -> AppResult<()> {
        if let Some(window) = self.existing() {
            window.hide()?;
        }
        Ok(())
    }

    fn push(&self, event: &AppEvent) {
        match self.existing() {
            Some(_) => emit_event_to(&self.app, WINDOW_LABEL, event),
            None => {
                debug!(target: "window", "dropping {} event: window is gone", event.name());
            }
        }
    }

    fn set_opacity(&self, opacity: f64) {
        if let Some(window) = self.existing() {
            apply_opacity(&window, opacity);
        }
    }
}

#[cfg(target_os = "macos")]
fn apply_opacity(window: &WebviewWindow, opacity: f64) {
    if let Err(err) = macos::set_alpha(window, opacity) {
        warn!(target: "window", "failed to apply window opacity: {err}");
    }
}

#[cfg(not(target_os = "macos"))]
fn apply_opacity(_window: &WebviewWindow, opacity: f64) {
    debug!(target: "window", opacity, "window opacity is only applied natively on macOS");
}
