//! Windows Credential Manager adapter
//!
//! Provides a safe Rust interface to the Windows Credential Manager API.
//! This module isolates all unsafe Windows API calls behind the
//! [`CredentialManager`] trait.

use crate::adapters::{decode_password_blob, filetime_ticks_to_utc, CredentialManager, StoredSecret};
use crate::errors::AppError;
use std::ffi::{c_void, OsStr};
use std::os::windows::ffi::OsStrExt;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::FILETIME;
use windows::Win32::Security::Credentials::{
    CredDeleteW, CredEnumerateW, CredFree, CredReadW, CredWriteW, CREDENTIALW,
    CRED_ENUMERATE_FLAGS, CRED_FLAGS, CRED_PERSIST_ENTERPRISE, CRED_TYPE_GENERIC,
};

/// HRESULT_FROM_WIN32(ERROR_NOT_FOUND)
const HRESULT_NOT_FOUND: i32 = 0x80070490u32 as i32;

/// Owns a buffer allocated by `CredReadW`/`CredEnumerateW` and frees it on drop.
///
/// Everything borrowed out of the buffer must be copied into owned Rust
/// values before the guard goes out of scope.
struct CredBuffer(*const c_void);

impl Drop for CredBuffer {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from a successful Cred* call and is freed exactly once
            unsafe { CredFree(self.0) };
        }
    }
}

/// Encodes a string as a null-terminated UTF-16 buffer
fn to_wide(value: &str) -> Vec<u16> {
    OsStr::new(value)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

fn filetime_to_ticks(ft: &FILETIME) -> u64 {
    ((ft.dwHighDateTime as u64) << 32) | ft.dwLowDateTime as u64
}

/// Windows implementation of CredentialManager
///
/// Uses CredWrite/CredRead/CredDelete/CredEnumerate with generic credentials.
/// Writes use enterprise persistence so entries roam with the user profile.
pub struct WindowsCredentialManager;

impl WindowsCredentialManager {
    /// Creates a new Windows credential manager instance
    pub fn new() -> Self {
        WindowsCredentialManager
    }

    /// Copies one native credential into owned Rust values.
    ///
    /// # Safety
    /// `cred` must point into a live buffer returned by `CredReadW`/`CredEnumerateW`.
    unsafe fn decode(target: &str, cred: &CREDENTIALW) -> Result<StoredSecret, AppError> {
        let corrupt = |e: anyhow::Error| AppError::CorruptCredential {
            target: target.to_string(),
            source: Some(e),
        };

        let username = if !cred.UserName.is_null() {
            PWSTR::from_raw(cred.UserName.0)
                .to_string()
                .map_err(|e| corrupt(e.into()))?
        } else {
            String::new()
        };

        let password = if cred.CredentialBlob.is_null() || cred.CredentialBlobSize == 0 {
            String::new()
        } else {
            let password_bytes = std::slice::from_raw_parts(
                cred.CredentialBlob,
                cred.CredentialBlobSize as usize,
            );
            decode_password_blob(password_bytes).map_err(corrupt)?
        };

        Ok(StoredSecret {
            username,
            password,
            last_written: filetime_ticks_to_utc(filetime_to_ticks(&cred.LastWritten)),
        })
    }
}

impl Default for WindowsCredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialManager for WindowsCredentialManager {
    fn save(&self, target: &str, username: &str, password: &str) -> Result<(), AppError> {
        let target_name = to_wide(target);
        let username_wide = to_wide(username);
        // The secret blob carries no terminator
        let password_wide: Vec<u16> = password.encode_utf16().collect();

        let cred = CREDENTIALW {
            Flags: CRED_FLAGS(0),
            Type: CRED_TYPE_GENERIC,
            TargetName: PWSTR(target_name.as_ptr() as *mut u16),
            Comment: PWSTR::null(),
            LastWritten: FILETIME::default(),
            CredentialBlobSize: (password_wide.len() * 2) as u32, // Size in bytes
            CredentialBlob: password_wide.as_ptr() as *mut u8,
            Persist: CRED_PERSIST_ENTERPRISE,
            AttributeCount: 0,
            Attributes: std::ptr::null_mut(),
            TargetAlias: PWSTR::null(),
            UserName: PWSTR(username_wide.as_ptr() as *mut u16),
        };

        // SAFETY: every pointer in `cred` borrows a Vec that outlives the call
        unsafe { CredWriteW(&cred, 0) }.map_err(|e| AppError::WriteFailed {
            target: target.to_string(),
            source: Some(e.into()),
        })
    }

    fn read(&self, target: &str) -> Result<Option<StoredSecret>, AppError> {
        let target_name = to_wide(target);
        let mut pcred: *mut CREDENTIALW = std::ptr::null_mut();

        // SAFETY: target_name is null-terminated and outlives the call
        let result = unsafe {
            CredReadW(
                PCWSTR::from_raw(target_name.as_ptr()),
                CRED_TYPE_GENERIC,
                0,
                &mut pcred,
            )
        };

        match result {
            Ok(()) => {
                let _buffer = CredBuffer(pcred as *const c_void);
                // SAFETY: pcred is valid until _buffer drops at the end of this arm
                let secret = unsafe { Self::decode(target, &*pcred) }?;
                Ok(Some(secret))
            }
            Err(e) if e.code().0 == HRESULT_NOT_FOUND => Ok(None),
            Err(e) => Err(AppError::StoreUnavailable {
                operation: format!("read credential '{}'", target),
                source: Some(e.into()),
            }),
        }
    }

    fn delete(&self, target: &str) -> Result<(), AppError> {
        let target_name = to_wide(target);

        // SAFETY: target_name is null-terminated and outlives the call
        unsafe {
            CredDeleteW(
                PCWSTR::from_raw(target_name.as_ptr()),
                CRED_TYPE_GENERIC,
                0,
            )
        }
        .map_err(|e| AppError::DeleteFailed {
            target: target.to_string(),
            source: Some(e.into()),
        })
    }

    fn list_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        let filter = to_wide(&format!("{}*", prefix));
        let mut count = 0u32;
        let mut pcredentials: *mut *mut CREDENTIALW = std::ptr::null_mut();

        // SAFETY: filter is null-terminated and outlives the call
        let result = unsafe {
            CredEnumerateW(
                PCWSTR::from_raw(filter.as_ptr()),
                CRED_ENUMERATE_FLAGS(0),
                &mut count,
                &mut pcredentials,
            )
        };

        match result {
            Ok(()) => {
                // Freed when this arm ends, after every name has been copied out
                let _buffer = CredBuffer(pcredentials as *const c_void);

                // SAFETY: CredEnumerateW returned `count` valid credential pointers
                let credentials = unsafe { std::slice::from_raw_parts(pcredentials, count as usize) };

                let mut results = Vec::with_capacity(credentials.len());
                for cred_ptr in credentials {
                    // SAFETY: each entry points into the live enumeration buffer
                    let cred = unsafe { &**cred_ptr };
                    if cred.Type != CRED_TYPE_GENERIC || cred.TargetName.is_null() {
                        continue;
                    }
                    match unsafe { PWSTR::from_raw(cred.TargetName.0).to_string() } {
                        Ok(target_name) => results.push(target_name),
                        Err(e) => tracing::warn!(
                            category = "CREDENTIALS",
                            error = %e,
                            "Skipping credential with undecodable target name"
                        ),
                    }
                }

                Ok(results)
            }
            // No credentials match the filter
            Err(e) if e.code().0 == HRESULT_NOT_FOUND => Ok(Vec::new()),
            Err(e) => Err(AppError::StoreUnavailable {
                operation: format!("enumerate credentials matching '{}*'", prefix),
                source: Some(e.into()),
            }),
        }
    }
}
