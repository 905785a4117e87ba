//! Credential management commands
//!
//! Thin command layer over [`CredentialVault`](crate::core::CredentialVault)
//! and [`EditorSession`](crate::core::EditorSession). Failures that the user
//! must acknowledge are shown in a blocking native dialog before the error
//! is returned to the frontend.

use crate::core::{CredentialRecord, CredentialRow, EditorDraft, EditorView, SaveOutcome};
use crate::errors::AppError;
use crate::state::AppContext;
use tauri::State;
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

/// Shows a blocking error dialog for errors the user has to acknowledge
fn notify_error(app_handle: &tauri::AppHandle, error: &AppError) {
    tracing::error!(category = error.category(), code = error.code(), error = ?error, "Command failed");
    if !error.is_blocking() {
        return;
    }

    let mut message = error.user_message();
    if let Some(remediation) = error.remediation() {
        message.push_str("\n\n");
        message.push_str(&remediation);
    }

    let kind = match error {
        AppError::ValidationFailed { .. } => MessageDialogKind::Warning,
        _ => MessageDialogKind::Error,
    };

    let _ = app_handle
        .dialog()
        .message(message)
        .title("QuickCred")
        .kind(kind)
        .blocking_show();
}

/// Returns the rows for the list window, re-enumerating the store
#[tauri::command]
pub async fn list_credentials(
    context: State<'_, AppContext>,
) -> Result<Vec<CredentialRow>, AppError> {
    context.vault.rows()
}

/// Opens the editor, empty for `None` or pre-filled from the store for `Some(name)`
#[tauri::command]
pub async fn open_editor(
    context: State<'_, AppContext>,
    name: Option<String>,
) -> Result<EditorView, AppError> {
    let mut editor = context.editor();
    match name {
        Some(name) => editor.open_edit(&context.vault, &name),
        None => Ok(editor.open_create()),
    }
}

/// Flips password masking in the open editor; returns the new visibility
#[tauri::command]
pub async fn toggle_password_visibility(
    context: State<'_, AppContext>,
) -> Result<bool, AppError> {
    context.editor().toggle_password_visibility()
}

/// Dismisses the editor without saving
#[tauri::command]
pub async fn close_editor(context: State<'_, AppContext>) -> Result<(), AppError> {
    context.editor().close();
    Ok(())
}

/// Saves the editor draft.
///
/// On validation or store failure a blocking dialog is shown and the
/// editor stays open. The list is refreshed separately by the caller, so
/// an `Ok` always means the editor has closed.
#[tauri::command]
pub async fn save_editor(
    app_handle: tauri::AppHandle,
    context: State<'_, AppContext>,
    draft: EditorDraft,
) -> Result<SaveOutcome, AppError> {
    let result = context.editor().save(&context.vault, &draft);

    let outcome = result.inspect_err(|e| notify_error(&app_handle, e))?;
    if let Some(leftover) = &outcome.leftover {
        let _ = app_handle
            .dialog()
            .message(format!(
                "'{}' was saved, but the old entry '{}' could not be removed. Delete it from the list.",
                outcome.name, leftover
            ))
            .title("QuickCred")
            .kind(MessageDialogKind::Warning)
            .blocking_show();
    }

    Ok(outcome)
}

/// Deletes a credential after a blocking yes/no confirmation.
///
/// Returns the refreshed rows; declining leaves the store untouched.
#[tauri::command]
pub async fn delete_credential(
    app_handle: tauri::AppHandle,
    context: State<'_, AppContext>,
    name: String,
) -> Result<Vec<CredentialRow>, AppError> {
    let confirmed = app_handle
        .dialog()
        .message(format!("Delete the credential '{}'?", name))
        .title("Confirm Delete")
        .kind(MessageDialogKind::Warning)
        .buttons(MessageDialogButtons::OkCancelCustom(
            "Yes".to_string(),
            "No".to_string(),
        ))
        .blocking_show();

    if !confirmed {
        tracing::debug!(category = "CREDENTIALS", name = %name, "Delete cancelled");
        return context.vault.rows();
    }

    context
        .vault
        .delete(&name)
        .inspect_err(|e| notify_error(&app_handle, e))?;

    // A deleted entry must not stay open in the editor
    let mut editor = context.editor();
    if editor.original_name() == Some(name.as_str()) {
        editor.close();
    }
    drop(editor);

    context.vault.rows()
}

/// Copies a credential's password to the clipboard without displaying it
#[tauri::command]
pub async fn copy_password(
    app_handle: tauri::AppHandle,
    context: State<'_, AppContext>,
    name: String,
) -> Result<(), AppError> {
    let credential = context
        .vault
        .read(&name)
        .and_then(|found| {
            found.ok_or_else(|| AppError::CredentialNotFound { name: name.clone() })
        })
        .inspect_err(|e| notify_error(&app_handle, e))?;

    app_handle
        .clipboard()
        .write_text(credential.password)
        .map_err(|e| AppError::ClipboardError {
            source: Some(e.into()),
        })
        .inspect_err(|e| notify_error(&app_handle, e))?;

    tracing::info!(category = "CREDENTIALS", name = %name, "Password copied to clipboard");
    Ok(())
}

/// Programmatic lookup; missing names yield `None` rather than an error
#[tauri::command]
pub async fn get_credential(
    context: State<'_, AppContext>,
    name: String,
) -> Result<Option<CredentialRecord>, AppError> {
    Ok(context.vault.get(&name))
}

/// Programmatic create-or-overwrite
#[tauri::command]
pub async fn set_credential(
    context: State<'_, AppContext>,
    name: String,
    record: CredentialRecord,
) -> Result<(), AppError> {
    context.vault.set(&name, &record)
}
