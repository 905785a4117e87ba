//! Window management commands
//!
//! QuickCred has exactly one list window. It is built lazily on the first
//! open request; later requests re-show, focus and refresh the same window.
//! Closing it only hides it, so the handle in [`AppContext`] stays valid
//! until the process exits.

use crate::errors::AppError;
use crate::state::AppContext;
use crate::LIST_WINDOW_LABEL;
use tauri::{Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

/// Event telling the list window to re-enumerate its rows
pub const CREDENTIALS_CHANGED_EVENT: &str = "credentials-changed";

/// Event telling the list window to drop its editor dialog
pub const EDITOR_CLOSED_EVENT: &str = "editor-closed";

/// Opens the list window, or re-shows, focuses and refreshes it.
pub fn open_list_window(app_handle: &tauri::AppHandle) -> Result<(), AppError> {
    let context = app_handle.state::<AppContext>();
    let mut slot = context.list_window();

    if let Some(window) = slot.as_ref() {
        tracing::debug!(category = "WINDOW", "Re-showing existing list window");
        reveal(window)?;
        window
            .emit(CREDENTIALS_CHANGED_EVENT, ())
            .map_err(|e| window_error("refresh list window", e))?;
        return Ok(());
    }

    tracing::info!(category = "WINDOW", "Creating list window");
    let window = build_list_window(app_handle)?;
    reveal(&window)?;
    *slot = Some(window);
    Ok(())
}

fn build_list_window(app_handle: &tauri::AppHandle) -> Result<WebviewWindow, AppError> {
    let window = WebviewWindowBuilder::new(
        app_handle,
        LIST_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title("QuickCred")
    .inner_size(560.0, 480.0)
    .min_inner_size(420.0, 320.0)
    .resizable(true)
    .visible(false)
    .build()
    .map_err(|e| window_error("create list window", e))?;

    window
        .center()
        .map_err(|e| window_error("center list window", e))?;

    // Keep the window alive: hide instead of destroying it, and drop any open editor
    let app_for_close = app_handle.clone();
    window.on_window_event(move |event| {
        if let tauri::WindowEvent::CloseRequested { api, .. } = event {
            api.prevent_close();
            let editor_was_open = app_for_close.state::<AppContext>().dismiss_editor();
            if let Some(window) = app_for_close.get_webview_window(LIST_WINDOW_LABEL) {
                if editor_was_open {
                    if let Err(e) = window.emit(EDITOR_CLOSED_EVENT, ()) {
                        tracing::warn!(category = "WINDOW", error = %e, "Failed to notify list window of editor close");
                    }
                }
                if let Err(e) = window.hide() {
                    tracing::warn!(category = "WINDOW", error = %e, "Failed to hide list window");
                }
            }
            tracing::debug!(category = "WINDOW", "List window hidden");
        }
    });

    Ok(window)
}

fn reveal(window: &WebviewWindow) -> Result<(), AppError> {
    window
        .unminimize()
        .map_err(|e| window_error("unminimize list window", e))?;
    window
        .show()
        .map_err(|e| window_error("show list window", e))?;
    window
        .set_focus()
        .map_err(|e| window_error("focus list window", e))?;
    Ok(())
}

fn window_error(operation: &str, source: tauri::Error) -> AppError {
    AppError::WindowOperationError {
        operation: operation.to_string(),
        source,
    }
}

/// Shows (or refreshes) the list window.
#[tauri::command]
pub async fn show_list_window(app_handle: tauri::AppHandle) -> Result<(), AppError> {
    open_list_window(&app_handle)
}

/// Hides the list window, discarding any open editor.
#[tauri::command]
pub async fn hide_list_window(app_handle: tauri::AppHandle) -> Result<(), AppError> {
    let context = app_handle.state::<AppContext>();
    let editor_was_open = context.dismiss_editor();
    if let Some(window) = context.list_window().as_ref() {
        if editor_was_open {
            window
                .emit(EDITOR_CLOSED_EVENT, ())
                .map_err(|e| window_error("notify list window", e))?;
        }
        window
            .hide()
            .map_err(|e| window_error("hide list window", e))?;
    }
    Ok(())
}

/// Tauri command to exit the application gracefully.
#[tauri::command]
pub async fn quit_app(app_handle: tauri::AppHandle) {
    tracing::info!(category = "SYSTEM", "Exiting on user request");
    app_handle.exit(0);
}
