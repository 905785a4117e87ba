//! Error types for QuickCred
//!
//! This module defines a unified error type for the whole application,
//! providing structured error handling with context and user-friendly messages.

use thiserror::Error;

/// Main error type for QuickCred
///
/// Adapter, vault, editor and command layers all return this type so the
/// frontend receives one consistent error shape.
///
/// # Architecture Notes
/// - Uses thiserror for automatic Display and Error trait implementations
/// - Each variant includes contextual information for debugging
/// - #[source] attribute enables error chain traversal
/// - Serialized to the frontend as `{message, code, category, remediation}`
#[derive(Debug, Error)]
pub enum AppError {
    /// Credential Manager cannot be reached at all (no logon session,
    /// unsupported platform, service stopped)
    #[error("Credential store unavailable: {operation}")]
    StoreUnavailable {
        operation: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The store rejected a write
    #[error("Failed to write credential '{target}'")]
    WriteFailed {
        target: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The store rejected a delete, including deletes of missing entries
    #[error("Failed to delete credential '{target}'")]
    DeleteFailed {
        target: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// An entry exists but its username or secret blob cannot be decoded
    #[error("Credential '{target}' is unreadable")]
    CorruptCredential {
        target: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A credential that the caller required to exist is absent.
    /// Plain lookups return `Ok(None)` instead of this.
    #[error("Credential not found: {name}")]
    CredentialNotFound {
        name: String,
    },

    /// A required editor field was empty. Raised before any store call.
    #[error("Validation failed: {field} cannot be empty")]
    ValidationFailed {
        field: &'static str,
    },

    /// An editor action arrived while no editor is open
    #[error("Editor is not open")]
    EditorClosed,

    /// Clipboard write failed
    #[error("Clipboard operation failed")]
    ClipboardError {
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Tauri window operation failed
    #[error("Window operation failed: {operation}")]
    WindowOperationError {
        operation: String,
        #[source]
        source: tauri::Error,
    },
}

impl AppError {
    /// Returns an error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            AppError::WriteFailed { .. } => "WRITE_FAILED",
            AppError::DeleteFailed { .. } => "DELETE_FAILED",
            AppError::CorruptCredential { .. } => "CRED_CORRUPT",
            AppError::CredentialNotFound { .. } => "CRED_NOT_FOUND",
            AppError::ValidationFailed { .. } => "VALIDATION_FAILED",
            AppError::EditorClosed => "EDITOR_CLOSED",
            AppError::ClipboardError { .. } => "CLIPBOARD",
            AppError::WindowOperationError { .. } => "WINDOW_OP",
        }
    }

    /// Returns a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            AppError::StoreUnavailable { .. } => {
                "Windows Credential Manager is not available.".to_string()
            }
            AppError::WriteFailed { target, .. } => {
                format!("Could not save credential '{}'.", crate::core::remove_prefix(target))
            }
            AppError::DeleteFailed { target, .. } => {
                format!("Could not delete credential '{}'.", crate::core::remove_prefix(target))
            }
            AppError::CorruptCredential { target, .. } => {
                format!("Credential '{}' could not be read.", crate::core::remove_prefix(target))
            }
            AppError::CredentialNotFound { name } => {
                format!("No credential named '{}' exists.", crate::core::remove_prefix(name))
            }
            AppError::ValidationFailed { field } => {
                format!("The {} cannot be empty.", field)
            }
            AppError::EditorClosed => "The editor is no longer open.".to_string(),
            AppError::ClipboardError { .. } => {
                "Could not copy the password to the clipboard.".to_string()
            }
            AppError::WindowOperationError { operation, .. } => {
                format!("Window operation failed: {}", operation)
            }
        }
    }

    /// Returns optional remediation steps for the error
    pub fn remediation(&self) -> Option<String> {
        match self {
            AppError::StoreUnavailable { .. } => Some(
                "Make sure you are logged on interactively and the Credential Manager service is running."
                    .to_string(),
            ),
            AppError::WriteFailed { .. } => Some(
                "Check that the name contains no unusual characters and try again.".to_string(),
            ),
            AppError::DeleteFailed { .. } => {
                Some("Refresh the list; the credential may already be gone.".to_string())
            }
            AppError::CorruptCredential { .. } => Some(
                "It was probably written by another program. Delete it and create it again.".to_string(),
            ),
            AppError::CredentialNotFound { .. } => Some("Refresh the list.".to_string()),
            _ => None,
        }
    }

    /// Returns the category for error logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable { .. }
            | AppError::WriteFailed { .. }
            | AppError::DeleteFailed { .. }
            | AppError::CorruptCredential { .. }
            | AppError::CredentialNotFound { .. } => "CREDENTIALS",

            AppError::ValidationFailed { .. } | AppError::EditorClosed => "EDITOR",

            AppError::ClipboardError { .. } => "CLIPBOARD",

            AppError::WindowOperationError { .. } => "WINDOW",
        }
    }

    /// Whether the frontend should surface this error in a blocking dialog
    pub fn is_blocking(&self) -> bool {
        !matches!(self, AppError::CredentialNotFound { .. })
    }
}

// Implement Serialize for sending errors to frontend
impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AppError", 4)?;
        state.serialize_field("message", &self.user_message())?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("remediation", &self.remediation())?;
        state.end()
    }
}

// Convert AppError to String for callers that only want the message
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.user_message()
    }
}

impl From<tauri::Error> for AppError {
    fn from(err: tauri::Error) -> Self {
        AppError::WindowOperationError {
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = AppError::ValidationFailed { field: "password" };
        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert_eq!(err.category(), "EDITOR");
        assert_eq!(err.user_message(), "The password cannot be empty.");
    }

    #[test]
    fn test_user_message_strips_prefix() {
        let err = AppError::WriteFailed {
            target: "QuickCred_mail".to_string(),
            source: None,
        };
        assert_eq!(err.user_message(), "Could not save credential 'mail'.");
        assert!(err.to_string().contains("QuickCred_mail"));
    }

    #[test]
    fn test_not_found_is_not_blocking() {
        let err = AppError::CredentialNotFound {
            name: "mail".to_string(),
        };
        assert!(!err.is_blocking());
        assert!(AppError::ValidationFailed { field: "name" }.is_blocking());
    }

    #[test]
    fn test_serialize_shape() {
        let err = AppError::DeleteFailed {
            target: "QuickCred_vpn".to_string(),
            source: Some(anyhow::anyhow!("Element not found")),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "DELETE_FAILED");
        assert_eq!(json["category"], "CREDENTIALS");
        assert_eq!(json["message"], "Could not delete credential 'vpn'.");
        assert!(json["remediation"].is_string());
    }

    #[test]
    fn test_source_chain_is_kept() {
        use std::error::Error as _;
        let err = AppError::StoreUnavailable {
            operation: "enumerate".to_string(),
            source: Some(anyhow::anyhow!("no logon session")),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_corrupt_credential_message() {
        let err = AppError::CorruptCredential {
            target: "QuickCred_mail".to_string(),
            source: None,
        };
        assert_eq!(err.code(), "CRED_CORRUPT");
        assert_eq!(err.category(), "CREDENTIALS");
        assert_eq!(err.user_message(), "Credential 'mail' could not be read.");
        assert!(err.is_blocking());
    }
}
