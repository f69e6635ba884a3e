mod api;
mod core;
mod shared;
mod system;

use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::Manager;
use tauri_plugin_autostart::{MacosLauncher, ManagerExt};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};
use tracing::{error, info, warn};

use crate::core::orchestrator::WindowPresenter;
use crate::core::translator::OpenAiTranslator;
use crate::shared::settings::{AppSettings, SettingsState};
use crate::system::shell::AppShell;

const TRAY_TOOLTIP: &str = "Tray Translate";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // A second launch just raises the existing dialog.
            if let Some(shell) = app.try_state::<AppShell>() {
                shell.open_dialog();
            }
        }))
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_autostart::init(
            MacosLauncher::LaunchAgent,
            None,
        ))
        .setup(|app| {
            // Menu-bar app: no dock icon, no space switching on focus.
            #[cfg(target_os = "macos")]
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);

            let settings =
                tauri::async_runtime::block_on(AppSettings::load()).unwrap_or_else(|err| {
                    warn!(target: "setup", "failed to load settings, using defaults: {err}");
                    AppSettings::default()
                });
            sync_autostart(app.handle(), &settings);
            app.manage(SettingsState::new(settings));
            app.manage(OpenAiTranslator::new()?);

            let shell = AppShell::new(app.handle().clone());
            // Create the window up front so the first hotkey press finds
            // a webview that is already listening.
            if let Err(err) = shell.window().ensure() {
                warn!(target: "setup", "could not pre-create translator window: {err}");
            }
            app.manage(shell);

            build_tray(app)?;
            register_shortcuts(app);

            info!(target: "setup", "tray-translate initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            api::commands::get_settings,
            api::commands::set_model,
            api::commands::set_target_language,
            api::commands::set_translation_mode,
            api::commands::set_opacity,
            api::commands::set_startup_enabled,
            api::commands::get_startup_enabled,
            api::commands::set_voice_settings,
            api::commands::manual_translate,
            api::commands::hide_window,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|err| {
            error!(target: "setup", "failed to start application: {err}");
            std::process::exit(1);
        });
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// The persisted flag drives the registered login item, so a settings
/// file copied between machines converges on first launch.
fn sync_autostart(app: &tauri::AppHandle, settings: &AppSettings) {
    let autolaunch = app.autolaunch();
    let result = if settings.startup_enabled {
        autolaunch.enable()
    } else {
        autolaunch.disable()
    };
    if let Err(err) = result {
        warn!(target: "setup", "could not sync login item: {err}");
    }
}

fn build_tray(app: &tauri::App) -> tauri::Result<()> {
    let dialog_item = MenuItem::with_id(app, "show-dialog", "Show Dialog", true, None::<&str>)?;
    let translate_item = MenuItem::with_id(
        app,
        "quick-translate",
        "Translate Clipboard",
        true,
        None::<&str>,
    )?;
    let separator = PredefinedMenuItem::separator(app)?;
    let quit_item = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
    let menu = Menu::with_items(
        app,
        &[&dialog_item, &translate_item, &separator, &quit_item],
    )?;

    let mut builder = TrayIconBuilder::new()
        .menu(&menu)
        .tooltip(TRAY_TOOLTIP)
        .on_menu_event(|app, event| match event.id().as_ref() {
            "show-dialog" => {
                if let Some(shell) = app.try_state::<AppShell>() {
                    shell.open_dialog();
                }
            }
            "quick-translate" => {
                if let Some(shell) = app.try_state::<AppShell>() {
                    shell.quick_translate();
                }
            }
            "quit" => app.exit(0),
            _ => {}
        });
    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }
    let tray = builder.build(app)?;

    if let Some(shell) = app.try_state::<AppShell>() {
        shell.adopt_tray(tray);
    }
    Ok(())
}

fn register_shortcuts(app: &tauri::App) {
    // Cmd+Shift+T opens a new terminal tab, hence Alt instead of Shift.
    let (translate, fallback, quit) = if cfg!(target_os = "macos") {
        ("Cmd+Alt+T", "Cmd+Alt+X", "Cmd+Shift+Q")
    } else {
        ("Ctrl+Alt+T", "Ctrl+Alt+X", "Ctrl+Shift+Q")
    };

    if !register_translate_shortcut(app, translate) && !register_translate_shortcut(app, fallback) {
        warn!(target: "hotkeys", "no translate shortcut registered; use the tray menu instead");
    }

    match quit.parse::<Shortcut>() {
        Ok(shortcut) => {
            let registered = app
                .global_shortcut()
                .on_shortcut(shortcut, |app, _shortcut, event| {
                    if event.state == ShortcutState::Pressed {
                        app.exit(0);
                    }
                });
            match registered {
                Ok(()) => info!(target: "hotkeys", "registered quit shortcut {quit}"),
                Err(err) => warn!(target: "hotkeys", "could not register {quit}: {err}"),
            }
        }
        Err(err) => warn!(target: "hotkeys", "invalid quit shortcut {quit}: {err}"),
    }
}

fn register_translate_shortcut(app: &tauri::App, chord: &str) -> bool {
    let shortcut: Shortcut = match chord.parse() {
        Ok(shortcut) => shortcut,
        Err(err) => {
            warn!(target: "hotkeys", "invalid translate shortcut {chord}: {err}");
            return false;
        }
    };

    let registered = app
        .global_shortcut()
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                if let Some(shell) = app.try_state::<AppShell>() {
                    shell.quick_translate();
                }
            }
        });
    match registered {
        Ok(()) => {
            info!(target: "hotkeys", "registered translate shortcut {chord}");
            true
        }
        Err(err) => {
            warn!(target: "hotkeys", "could not register translate shortcut {chord}: {err}");
            false
        }
    }
}
