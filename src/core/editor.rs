//! Credential editor state
//!
//! The editor dialog is a small state machine:
//!
//! ```text
//! Closed --open_create/open_edit--> Open
//! Open   --save ok / close-------->  Closed
//! Open   --save rejected---------->  Open   (error returned, nothing written)
//! ```
//!
//! The frontend only renders an [`EditorView`] and sends back an
//! [`EditorDraft`]; validation and the rename sequence happen here.

use crate::adapters::CredentialManager;
use crate::core::naming::{add_prefix, remove_prefix, same_target};
use crate::core::vault::CredentialVault;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditorState {
    Closed,
    Open {
        /// Name the editor was opened with; `None` when creating
        original_name: Option<String>,
        password_visible: bool,
    },
}

/// What the frontend needs to render the editor
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub original_name: Option<String>,
    pub name: String,
    pub username: String,
    pub password: String,
    pub password_visible: bool,
}

impl std::fmt::Debug for EditorView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorView")
            .field("original_name", &self.original_name)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password_visible", &self.password_visible)
            .finish_non_exhaustive()
    }
}

/// Field values submitted by the editor's Save button
#[derive(Clone, Deserialize)]
pub struct EditorDraft {
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub password: String,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Name the credential was saved under
    pub name: String,
    /// Previous name when the save was a rename
    pub renamed_from: Option<String>,
    /// Old entry that could not be removed after a rename
    pub leftover: Option<String>,
}

/// Editor state for the single editor dialog
#[derive(Debug)]
pub struct EditorSession {
    state: EditorState,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            state: EditorState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open { .. })
    }

    /// Name being edited, `None` when closed or creating
    pub fn original_name(&self) -> Option<&str> {
        match &self.state {
            EditorState::Open { original_name, .. } => original_name.as_deref(),
            EditorState::Closed => None,
        }
    }

    /// Opens the editor with empty fields, replacing any open editor
    pub fn open_create(&mut self) -> EditorView {
        tracing::debug!(category = "EDITOR", "Opening editor for a new credential");
        self.state = EditorState::Open {
            original_name: None,
            password_visible: false,
        };
        EditorView {
            original_name: None,
            name: String::new(),
            username: String::new(),
            password: String::new(),
            password_visible: false,
        }
    }

    /// Opens the editor pre-filled from the store.
    ///
    /// Fails with `CredentialNotFound` if `name` is gone; the editor state
    /// is left untouched in that case.
    pub fn open_edit<M: CredentialManager>(
        &mut self,
        vault: &CredentialVault<M>,
        name: &str,
    ) -> Result<EditorView, AppError> {
        let credential = vault
            .read(name)?
            .ok_or_else(|| AppError::CredentialNotFound {
                name: name.to_string(),
            })?;

        tracing::debug!(category = "EDITOR", name = %credential.name, "Opening editor for existing credential");
        self.state = EditorState::Open {
            original_name: Some(credential.name.clone()),
            password_visible: false,
        };
        Ok(EditorView {
            original_name: Some(credential.name.clone()),
            name: credential.name,
            username: credential.username,
            password: credential.password,
            password_visible: false,
        })
    }

    /// Flips password masking. Display only; nothing is written.
    pub fn toggle_password_visibility(&mut self) -> Result<bool, AppError> {
        match &mut self.state {
            EditorState::Open { password_visible, .. } => {
                *password_visible = !*password_visible;
                Ok(*password_visible)
            }
            EditorState::Closed => Err(AppError::EditorClosed),
        }
    }

    /// Dismisses the editor without touching the store
    pub fn close(&mut self) {
        if self.is_open() {
            tracing::debug!(category = "EDITOR", "Editor dismissed");
        }
        self.state = EditorState::Closed;
    }

    /// Validates and persists the draft.
    ///
    /// Name (after trimming) and password must be non-empty; username may
    /// be empty. A changed name writes the new entry first and only then
    /// removes the old one, so a failed write never loses the original.
    /// The editor closes on success and stays open on any error.
    pub fn save<M: CredentialManager>(
        &mut self,
        vault: &CredentialVault<M>,
        draft: &EditorDraft,
    ) -> Result<SaveOutcome, AppError> {
        let original_name = match &self.state {
            EditorState::Open { original_name, .. } => original_name.clone(),
            EditorState::Closed => return Err(AppError::EditorClosed),
        };

        let name = draft.name.trim();
        validate(name, &draft.password).inspect_err(|e| {
            tracing::warn!(category = "EDITOR", error = %e, "Rejected editor save")
        })?;

        let renamed_from = original_name.filter(|old| add_prefix(old) != add_prefix(name));

        let leftover = match &renamed_from {
            // Same store entry under a different spelling: writing first and
            // deleting second would remove the entry just written.
            Some(old) if same_target(old, name) => {
                vault.delete(old)?;
                vault.write(name, &draft.username, &draft.password)?;
                None
            }
            Some(old) => {
                vault.write(name, &draft.username, &draft.password)?;
                match vault.delete(old) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(
                            category = "EDITOR",
                            old = %old,
                            new = %name,
                            error = ?e,
                            "Renamed credential saved but old entry could not be removed"
                        );
                        Some(old.clone())
                    }
                }
            }
            None => {
                vault.write(name, &draft.username, &draft.password)?;
                None
            }
        };

        tracing::info!(category = "EDITOR", name = %name, renamed = renamed_from.is_some(), "Credential saved");
        self.state = EditorState::Closed;
        Ok(SaveOutcome {
            name: name.to_string(),
            renamed_from,
            leftover,
        })
    }
}

fn validate(name: &str, password: &str) -> Result<(), AppError> {
    // A bare prefix would store an entry with an empty display name
    if remove_prefix(&add_prefix(name)).is_empty() {
        return Err(AppError::ValidationFailed { field: "name" });
    }
    if password.is_empty() {
        return Err(AppError::ValidationFailed { field: "password" });
    }
    Ok(())
}
