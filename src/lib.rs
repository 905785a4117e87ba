//! # QuickCred Backend Library
//!
//! QuickCred keeps named username/password pairs in Windows Credential
//! Manager under a `QuickCred_` prefix and puts a small list/edit window on
//! top, reachable from a global hotkey.
//!
//! ## Architecture
//!
//! - **adapters**: the `CredentialManager` seam and its Windows implementation
//! - **core**: naming convention, the credential vault, editor state
//! - **errors**: unified error handling with AppError
//! - **infra**: logging and application paths
//! - **state**: the process-wide application context
//! - **commands**: thin Tauri command layer exposed to the frontend
//!
//! ## Programmatic access
//!
//! Other Rust code reads and writes the same entries through
//! [`CredentialVault::get`] and [`CredentialVault::set`]:
//!
//! ```no_run
//! use quickcred_lib::{CredentialRecord, CredentialVault, NativeCredentialManager};
//!
//! let vault = CredentialVault::new(NativeCredentialManager::new());
//! vault.set("mail", &CredentialRecord {
//!     username: "alice".into(),
//!     password: "hunter22".into(),
//! })?;
//! assert_eq!(vault.get("mail").map(|r| r.username), Some("alice".to_string()));
//! # Ok::<(), quickcred_lib::AppError>(())
//! ```
mod adapters;
mod commands;
mod core;
mod errors;
mod infra;
mod state;

// Re-export commonly used types
pub use crate::core::*;
pub use adapters::{CredentialManager, NativeCredentialManager, StoredSecret};
pub use errors::AppError;
pub use state::AppContext;

#[cfg(target_os = "windows")]
pub use adapters::WindowsCredentialManager;

// ## Security Considerations
//
// - Passwords are stored by Windows Credential Manager (encrypted by the OS)
// - Passwords are never logged (only their length) and never sent in list rows
// - Entries are namespaced with the QuickCred_ prefix

/// Label of the single list window
pub const LIST_WINDOW_LABEL: &str = "credentials";

/// Global hotkey that opens or refreshes the list window
pub const TOGGLE_HOTKEY: &str = "Ctrl+Shift+K";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(e) = infra::init_tracing() {
        eprintln!("[QuickCred] {}", e);
    }

    let builder = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // A second launch opens the existing list window instead
            tracing::info!(category = "SYSTEM", "Second instance launched, opening list window");
            commands::system::request_list_window(app);
        }))
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_clipboard_manager::init());

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    let builder = builder.plugin(tauri_plugin_global_shortcut::Builder::new().build());

    builder
        .manage(AppContext::native())
        .setup(|app| {
            tracing::info!(category = "SYSTEM", "Tauri application setup started");

            commands::system::create_tray(app)?;

            #[cfg(not(any(target_os = "android", target_os = "ios")))]
            commands::system::register_hotkey(app);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Window management (from commands::windows)
            commands::windows::show_list_window,
            commands::windows::hide_list_window,
            commands::windows::quit_app,
            // Credentials (from commands::credentials)
            commands::list_credentials,
            commands::open_editor,
            commands::toggle_password_visibility,
            commands::close_editor,
            commands::save_editor,
            commands::delete_credential,
            commands::copy_password,
            commands::get_credential,
            commands::set_credential,
        ])
        // Keep running in the tray when the list window is hidden
        .build(tauri::generate_context!())
        .map(|app| {
            app.run(|_app_handle, event| {
                if let tauri::RunEvent::ExitRequested { api, code, .. } = event {
                    if code.is_none() {
                        api.prevent_exit();
                    }
                }
            })
        })
        .map_err(|e| tracing::error!(category = "SYSTEM", error = ?e, "Error while running tauri application"))
        .ok();
}
