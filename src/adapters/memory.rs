//! In-memory CredentialManager for unit tests
//!
//! Mirrors Credential Manager semantics closely enough for the vault and
//! editor. Targets compare case-insensitively, including non-ASCII letters.
//! Enumeration uses `prefix*` globbing and deleting a missing target fails.

use crate::adapters::{CredentialManager, StoredSecret};
use crate::errors::AppError;
use chrono::Utc;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    /// Insertion order doubles as store order
    entries: Vec<(String, StoredSecret)>,
    fail_writes: bool,
    fail_deletes: bool,
    unavailable: bool,
    /// Targets whose reads fail as undecodable
    corrupt: Vec<String>,
    writes: usize,
    deletes: usize,
}

#[derive(Default)]
pub struct MemoryCredentialManager {
    inner: Mutex<Inner>,
}

impl MemoryCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save` fail
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Makes every subsequent `delete` fail
    pub fn fail_deletes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_deletes = fail;
    }

    /// Makes every operation fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }

    /// Makes reads of `target` fail as if its blob could not be decoded
    pub fn corrupt(&self, target: &str) {
        self.inner.lock().unwrap().corrupt.push(target.to_string());
    }

    /// Number of successful writes plus deletes
    pub fn mutation_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.writes + inner.deletes
    }

    /// Inserts an entry bypassing the prefix convention, e.g. a foreign credential
    pub fn insert_raw(&self, target: &str, username: &str, password: &str) {
        self.save(target, username, password).unwrap();
    }

    pub fn targets(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.entries.iter().map(|(t, _)| t.clone()).collect()
    }

    fn unavailable(operation: &str) -> AppError {
        AppError::StoreUnavailable {
            operation: operation.to_string(),
            source: None,
        }
    }
}

fn same_target(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl CredentialManager for MemoryCredentialManager {
    fn save(&self, target: &str, username: &str, password: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.unavailable {
            return Err(Self::unavailable("save"));
        }
        if inner.fail_writes || target.is_empty() {
            return Err(AppError::WriteFailed {
                target: target.to_string(),
                source: Some(anyhow::anyhow!("simulated write failure")),
            });
        }

        let secret = StoredSecret {
            username: username.to_string(),
            password: password.to_string(),
            last_written: Some(Utc::now()),
        };
        match inner.entries.iter_mut().find(|(t, _)| same_target(t, target)) {
            Some(entry) => entry.1 = secret,
            None => inner.entries.push((target.to_string(), secret)),
        }
        inner.writes += 1;
        Ok(())
    }

    fn read(&self, target: &str) -> Result<Option<StoredSecret>, AppError> {
        let inner = self.inner.lock().unwrap();
        if inner.unavailable {
            return Err(Self::unavailable("read"));
        }
        if inner.corrupt.iter().any(|t| same_target(t, target)) {
            return Err(AppError::CorruptCredential {
                target: target.to_string(),
                source: Some(anyhow::anyhow!("secret blob has odd length 3")),
            });
        }
        Ok(inner
            .entries
            .iter()
            .find(|(t, _)| same_target(t, target))
            .map(|(_, s)| s.clone()))
    }

    fn delete(&self, target: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.unavailable {
            return Err(Self::unavailable("delete"));
        }
        let position = inner.entries.iter().position(|(t, _)| same_target(t, target));
        match position {
            Some(index) if !inner.fail_deletes => {
                inner.entries.remove(index);
                inner.deletes += 1;
                Ok(())
            }
            _ => Err(AppError::DeleteFailed {
                target: target.to_string(),
                source: Some(anyhow::anyhow!("Element not found")),
            }),
        }
    }

    fn list_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        let inner = self.inner.lock().unwrap();
        if inner.unavailable {
            return Err(Self::unavailable("enumerate"));
        }
        let prefix = prefix.to_lowercase();
        Ok(inner
            .entries
            .iter()
            .filter(|(t, _)| t.to_lowercase().starts_with(&prefix))
            .map(|(t, _)| t.clone())
            .collect())
    }
}
