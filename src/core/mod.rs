//! Core module - domain types and business logic

pub mod editor;
pub mod naming;
pub mod types;
pub mod vault;

pub use editor::{EditorDraft, EditorSession, EditorView, SaveOutcome};
pub use naming::{add_prefix, remove_prefix, CREDENTIAL_PREFIX};
pub use types::*;
pub use vault::CredentialVault;
