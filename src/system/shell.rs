//! `AppShell` owns the app's two long-lived surfaces, the floating
//! window and the tray icon, and hosts the trigger entry points that
//! the hotkeys and tray menu fan into.

use std::sync::Mutex;

use tauri::tray::TrayIcon;
use tauri::{AppHandle, Manager};
use tauri_plugin_clipboard_manager::ClipboardExt;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::core::orchestrator::{self, TranslationSequencer, WindowPresenter};
use crate::core::translator::OpenAiTranslator;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::settings::SettingsState;
use crate::shared::types::TranslationRequest;
use crate::system::window::TranslatorWindow;

// Grace period for the webview to come up and register its event
// listeners after a lazy (re)creation.
const WINDOW_READY_DELAY: Duration = Duration::from_millis(150);

pub struct AppShell {
    app: AppHandle,
    window: TranslatorWindow,
    tray: Mutex<Option<TrayIcon>>,
    sequencer: TranslationSequencer,
}

impl AppShell {
    pub fn new(app: AppHandle) -> Self {
        let window = TranslatorWindow::new(app.clone());
        Self {
            app,
            window,
            tray: Mutex::new(None),
            sequencer: TranslationSequencer::default(),
        }
    }

    pub fn window(&self) -> &TranslatorWindow {
        &self.window
    }

    pub fn sequencer(&self) -> &TranslationSequencer {
        &self.sequencer
    }

    pub fn adopt_tray(&self, tray: TrayIcon) {
        *self
            .tray
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(tray);
    }

    /// "Translate" trigger: clipboard text goes straight into a
    /// translation; an empty clipboard just raises the dialog.
    pub fn quick_translate(&self) {
        let app = self.app.clone();
        tauri::async_runtime::spawn(async move {
            if let Err(err) = quick_translate_task(app).await {
                warn!(target: "shell", "quick translate failed: {err}");
            }
        });
    }

    /// "Open dialog" trigger: raise the window and focus the input,
    /// nothing else.
    pub fn open_dialog(&self) {
        let app = self.app.clone();
        tauri::async_runtime::spawn(async move {
            if let Err(err) = open_dialog_task(app).await {
                warn!(target: "shell", "open dialog failed: {err}");
            }
        });
    }
}

/// Raise the window, waiting out webview startup when it had to be
/// recreated first.
async fn bring_up_window(shell: &AppShell) -> AppResult<()> {
    let created = shell.window().ensure()?;
    if created {
        sleep(WINDOW_READY_DELAY).await;
    }
    shell.window().show()
}

async fn quick_translate_task(app: AppHandle) -> AppResult<()> {
    let shell = app.state::<AppShell>();

    let text = app.clipboard().read_text().unwrap_or_default();
    let text = text.trim().to_string();

    bring_up_window(&shell).await?;

    if text.is_empty() {
        shell.window().push(&AppEvent::FocusInput);
        return Ok(());
    }

    info!(target: "shell", chars = text.len(), "translating clipboard text");
    let settings = app.state::<SettingsState>().snapshot();
    let request = TranslationRequest::from_settings(text, &settings)?;
    let backend = app.state::<OpenAiTranslator>();

    // Errors are already reported into the window as an event; the
    // trigger itself has no caller to answer.
    let _ = orchestrator::translate_and_report(
        shell.window(),
        backend.inner(),
        shell.sequencer(),
        request,
    )
    .await;

    Ok(())
}

async fn open_dialog_task(app: AppHandle) -> AppResult<()> {
    let shell = app.state::<AppShell>();
    bring_up_window(&shell).await?;
    shell.window().push(&AppEvent::FocusInput);
    Ok(())
}
