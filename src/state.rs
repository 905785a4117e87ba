//! Application context
//!
//! One instance lives in Tauri's managed state for the life of the process.
//! It owns the vault, the editor session and the handle to the single list
//! window. All mutable presentation state sits behind mutexes, so command
//! handlers running on the async runtime still mutate it one at a time.

use crate::adapters::{CredentialManager, NativeCredentialManager};
use crate::core::{CredentialVault, EditorSession};
use std::sync::{Mutex, MutexGuard};
use tauri::WebviewWindow;

pub struct AppContext<M: CredentialManager = NativeCredentialManager> {
    pub vault: CredentialVault<M>,
    editor: Mutex<EditorSession>,
    /// Created on first open, hidden (never destroyed) on close
    list_window: Mutex<Option<WebviewWindow>>,
}

impl AppContext<NativeCredentialManager> {
    pub fn native() -> Self {
        Self::new(NativeCredentialManager::new())
    }
}

impl<M: CredentialManager> AppContext<M> {
    pub fn new(manager: M) -> Self {
        Self {
            vault: CredentialVault::new(manager),
            editor: Mutex::new(EditorSession::new()),
            list_window: Mutex::new(None),
        }
    }

    /// Locks the editor session, recovering from a poisoned lock
    pub fn editor(&self) -> MutexGuard<'_, EditorSession> {
        self.editor.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Closes the editor if one is open; returns whether it was open
    pub fn dismiss_editor(&self) -> bool {
        let mut editor = self.editor();
        let was_open = editor.is_open();
        editor.close();
        was_open
    }

    /// Locks the list window slot, recovering from a poisoned lock
    pub fn list_window(&self) -> MutexGuard<'_, Option<WebviewWindow>> {
        self.list_window.lock().unwrap_or_else(|e| e.into_inner())
    }
}
