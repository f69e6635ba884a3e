//! macOS panel behavior for the floating translator window.
//!
//! Tauri covers always-on-top, but a window that must appear over
//! fullscreen spaces needs NSStatusWindowLevel and the
//! CanJoinAllSpaces + FullScreenAuxiliary collection behavior, and
//! window opacity is only reachable through NSWindow's alphaValue.
//! All AppKit calls are dispatched to the main thread.

use cocoa::appkit::NSWindowCollectionBehavior;
use cocoa::base::id;
use objc::{msg_send, sel, sel_impl};
use tauri::WebviewWindow;

// NSStatusWindowLevel = 25, the menu-bar level that stays above
// fullscreen apps.
const STATUS_WINDOW_LEVEL: i64 = 25;

const CAN_JOIN_ALL_SPACES: u64 = 1 << 0;
const FULLSCREEN_AUXILIARY: u64 = 1 << 7;

/// Raise the window level and collection behavior so the panel shows on
/// every space, including over fullscreen apps. Safe to call repeatedly;
/// AppKit resets these on some transitions, so `show()` re-applies them.
pub fn configure_overlay(window: &WebviewWindow) -> Result<(), String> {
    with_ns_window(window, |ns_window| unsafe {
        let _: () = msg_send![ns_window, setLevel: STATUS_WINDOW_LEVEL];

        let behavior = NSWindowCollectionBehavior::from_bits_truncate(
            CAN_JOIN_ALL_SPACES | FULLSCREEN_AUXILIARY,
        );
        let _: () = msg_send![ns_window, setCollectionBehavior: behavior];
    })
}

/// Apply the preferred window opacity via NSWindow alphaValue.
pub fn set_alpha(window: &WebviewWindow, alpha: f64) -> Result<(), String> {
    with_ns_window(window, move |ns_window| unsafe {
        let _: () = msg_send![ns_window, setAlphaValue: alpha];
    })
}

fn with_ns_window<F>(window: &WebviewWindow, operation: F) -> Result<(), String>
where
    F: FnOnce(id) + Send + 'static,
{
    // The raw pointer is not Send; carry it across threads as usize
    // and rebuild it on the main thread.
    let ns_window = window
        .ns_window()
        .map_err(|e| format!("window handle unavailable: {e}"))? as usize;

    window
        .run_on_main_thread(move || operation(ns_window as id))
        .map_err(|e| format!("failed to reach main thread: {e}"))
}
