//! Platform adapters
//!
//! The [`CredentialManager`] trait is the seam between QuickCred and the
//! operating system's secret store. All unsafe Windows API calls live in
//! [`windows`]; everything above this module is platform-agnostic.

use crate::errors::AppError;
use chrono::{DateTime, Utc};

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(test)]
pub mod memory;

#[cfg(target_os = "windows")]
pub use self::windows::WindowsCredentialManager;

/// Credential Manager backend used by the running application.
#[cfg(target_os = "windows")]
pub type NativeCredentialManager = WindowsCredentialManager;

/// Credential Manager backend used by the running application.
#[cfg(not(target_os = "windows"))]
pub type NativeCredentialManager = UnavailableCredentialManager;

/// One generic credential as returned by the platform store
#[derive(Clone, PartialEq, Eq)]
pub struct StoredSecret {
    pub username: String,
    pub password: String,
    pub last_written: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for StoredSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSecret")
            .field("username", &self.username)
            .field("password", &"***")
            .field("last_written", &self.last_written)
            .finish()
    }
}

/// Trait for credential storage operations
///
/// Targets passed here are full store names (already prefixed).
/// Implementations must be synchronous and must release any native buffer
/// before returning.
pub trait CredentialManager: Send + Sync {
    /// Creates or overwrites a generic credential
    fn save(&self, target: &str, username: &str, password: &str) -> Result<(), AppError>;

    /// Reads a generic credential
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - If the target exists
    /// * `Ok(None)` - If the target doesn't exist
    /// * `Err(AppError::CorruptCredential)` - If the entry exists but cannot be decoded
    /// * `Err(AppError)` - If the store could not be queried
    fn read(&self, target: &str) -> Result<Option<StoredSecret>, AppError>;

    /// Deletes a generic credential. Missing targets are an error.
    fn delete(&self, target: &str) -> Result<(), AppError>;

    /// Lists all target names matching `prefix*`, in store order
    fn list_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError>;
}

/// Backend for hosts without Windows Credential Manager.
///
/// Every operation fails with [`AppError::StoreUnavailable`]; there is no
/// fallback storage.
#[cfg(not(target_os = "windows"))]
#[derive(Debug, Default)]
pub struct UnavailableCredentialManager;

#[cfg(not(target_os = "windows"))]
impl UnavailableCredentialManager {
    pub fn new() -> Self {
        UnavailableCredentialManager
    }

    fn unavailable(operation: &str) -> AppError {
        AppError::StoreUnavailable {
            operation: format!("{} (Windows Credential Manager is only available on Windows)", operation),
            source: None,
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl CredentialManager for UnavailableCredentialManager {
    fn save(&self, _target: &str, _username: &str, _password: &str) -> Result<(), AppError> {
        Err(Self::unavailable("save"))
    }

    fn read(&self, _target: &str) -> Result<Option<StoredSecret>, AppError> {
        Err(Self::unavailable("read"))
    }

    fn delete(&self, _target: &str) -> Result<(), AppError> {
        Err(Self::unavailable("delete"))
    }

    fn list_with_prefix(&self, _prefix: &str) -> Result<Vec<String>, AppError> {
        Err(Self::unavailable("enumerate"))
    }
}

/// 100ns intervals between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_EPOCH_TICKS: u64 = 116_444_736_000_000_000;

/// Converts a Windows FILETIME tick count to UTC.
///
/// Zero (never written) and pre-1970 values map to `None`.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub fn filetime_ticks_to_utc(ticks: u64) -> Option<DateTime<Utc>> {
    let unix_ticks = ticks.checked_sub(FILETIME_UNIX_EPOCH_TICKS)?;
    let secs = (unix_ticks / 10_000_000) as i64;
    let nanos = ((unix_ticks % 10_000_000) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Decodes a generic credential's secret blob as UTF-16LE.
///
/// Trailing NULs are dropped so blobs written with a terminator still
/// decode. An odd byte count or unpaired surrogate is an error.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub fn decode_password_blob(bytes: &[u8]) -> Result<String, anyhow::Error> {
    if bytes.len() % 2 != 0 {
        anyhow::bail!("secret blob has odd length {}", bytes.len());
    }

    let wide: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    Ok(String::from_utf16(&wide)?.trim_end_matches('\0').to_string())
}
