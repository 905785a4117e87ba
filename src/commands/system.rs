//! System integration
//!
//! Tray icon, tray menu and the global hotkey. Each entry point ends in
//! [`open_list_window`] or an application exit.

use crate::commands::windows::open_list_window;
use crate::TOGGLE_HOTKEY;
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::Manager;

const MENU_OPEN: &str = "open";
const MENU_QUIT: &str = "quit";

/// Opens the list window off the event-loop thread and logs any failure.
pub fn request_list_window(app_handle: &tauri::AppHandle) {
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(e) = open_list_window(&app_handle) {
            tracing::error!(category = "WINDOW", error = ?e, "Failed to open list window");
        }
    });
}

/// Builds the tray menu: open the list, quit.
pub fn build_tray_menu(app: &tauri::AppHandle) -> Result<Menu<tauri::Wry>, tauri::Error> {
    let open_item = MenuItem::with_id(
        app,
        MENU_OPEN,
        format!("Open QuickCred ({})", TOGGLE_HOTKEY),
        true,
        None::<&str>,
    )?;
    let separator = PredefinedMenuItem::separator(app)?;
    let quit_item = MenuItem::with_id(app, MENU_QUIT, "Quit", true, None::<&str>)?;

    Menu::with_items(app, &[&open_item, &separator, &quit_item])
}

/// Creates the system tray icon. Left click opens the list window.
pub fn create_tray(app: &tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    let menu = build_tray_menu(app.handle())?;
    let icon = app
        .default_window_icon()
        .ok_or("Failed to get default window icon")?
        .clone();

    TrayIconBuilder::with_id("main")
        .icon(icon)
        .tooltip("QuickCred")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match event.id().as_ref() {
            MENU_OPEN => request_list_window(app),
            MENU_QUIT => {
                tracing::info!(category = "SYSTEM", "Quit selected from tray");
                app.exit(0);
            }
            other => tracing::debug!(category = "SYSTEM", id = %other, "Unhandled tray menu event"),
        })
        .on_tray_icon_event(|tray, event| {
            // Only handle the Down state to prevent double-triggering
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Down,
                ..
            } = event
            {
                request_list_window(tray.app_handle());
            }
        })
        .build(app)?;

    Ok(())
}

/// Registers the global hotkey that opens (or refreshes) the list window.
///
/// Failure is logged, not fatal: the tray still works without the hotkey.
#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub fn register_hotkey(app: &tauri::App) {
    use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

    let shortcut_manager = app.handle().global_shortcut();

    // Try to unregister first in case it was registered by a previous instance
    let _ = shortcut_manager.unregister(TOGGLE_HOTKEY);

    let result = shortcut_manager.on_shortcut(TOGGLE_HOTKEY, |app_handle, _shortcut, event| {
        // Only trigger on key press, not on release
        if event.state != ShortcutState::Pressed {
            return;
        }
        tracing::debug!(category = "SYSTEM", hotkey = TOGGLE_HOTKEY, "Global hotkey pressed");
        request_list_window(app_handle);
    });

    match result {
        Ok(()) => tracing::info!(category = "SYSTEM", hotkey = TOGGLE_HOTKEY, "Global hotkey registered"),
        Err(e) => tracing::warn!(
            category = "SYSTEM",
            hotkey = TOGGLE_HOTKEY,
            error = %e,
            "Failed to register global hotkey; it may be in use by another application"
        ),
    }
}
