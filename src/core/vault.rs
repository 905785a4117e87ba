//! Namespaced credential access
//!
//! [`CredentialVault`] is the credential store adapter the rest of the
//! application talks to. It applies the QuickCred prefix, turns native
//! results into [`Credential`] values and logs every store operation.
//! It holds no state besides the backend, so every result is a fresh read.

use crate::adapters::{CredentialManager, StoredSecret};
use crate::core::naming::{add_prefix, remove_prefix, CREDENTIAL_PREFIX};
use crate::core::types::{Credential, CredentialRecord, CredentialRow};
use crate::errors::AppError;

pub struct CredentialVault<M: CredentialManager> {
    manager: M,
}

impl<M: CredentialManager> CredentialVault<M> {
    pub fn new(manager: M) -> Self {
        Self { manager }
    }

    /// The underlying platform backend
    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Creates or overwrites `name` with a full username/password pair.
    pub fn write(&self, name: &str, username: &str, password: &str) -> Result<(), AppError> {
        let target = add_prefix(name);
        tracing::info!(
            category = "CREDENTIALS",
            target = %target,
            username = %username,
            password_len = password.chars().count(),
            "Writing credential"
        );

        self.manager
            .save(&target, username, password)
            .inspect_err(|e| {
                tracing::error!(category = "CREDENTIALS", target = %target, error = ?e, "Write failed")
            })
    }

    /// Looks up `name`. A missing entry is `Ok(None)`, never an error.
    pub fn read(&self, name: &str) -> Result<Option<Credential>, AppError> {
        self.read_target(&add_prefix(name))
    }

    /// Removes `name`. Removing a name that does not exist is `DeleteFailed`.
    pub fn delete(&self, name: &str) -> Result<(), AppError> {
        let target = add_prefix(name);
        tracing::info!(category = "CREDENTIALS", target = %target, "Deleting credential");

        self.manager.delete(&target).inspect_err(|e| {
            tracing::error!(category = "CREDENTIALS", target = %target, error = ?e, "Delete failed")
        })
    }

    /// Lists every credential whose target matches `filter_prefix*`
    /// (the QuickCred prefix when `None`), reading each one in full.
    ///
    /// Entries deleted between the listing and the follow-up read, and
    /// entries that cannot be decoded, are skipped. Order is whatever the store returns.
    pub fn enumerate(&self, filter_prefix: Option<&str>) -> Result<Vec<Credential>, AppError> {
        let filter = filter_prefix.unwrap_or(CREDENTIAL_PREFIX);
        let targets = self.manager.list_with_prefix(filter).inspect_err(|e| {
            tracing::error!(category = "CREDENTIALS", filter = %filter, error = ?e, "Enumeration failed")
        })?;

        let mut credentials = Vec::with_capacity(targets.len());
        for target in &targets {
            match self.read_target(target) {
                Ok(Some(credential)) => credentials.push(credential),
                Ok(None) => tracing::debug!(
                    category = "CREDENTIALS",
                    target = %target,
                    "Credential vanished during enumeration"
                ),
                Err(AppError::CorruptCredential { .. }) => tracing::warn!(
                    category = "CREDENTIALS",
                    target = %target,
                    "Skipping undecodable credential"
                ),
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            category = "CREDENTIALS",
            filter = %filter,
            count = credentials.len(),
            "Enumerated credentials"
        );
        Ok(credentials)
    }

    /// Rows for the list window: all QuickCred credentials, passwords dropped.
    pub fn rows(&self) -> Result<Vec<CredentialRow>, AppError> {
        Ok(self
            .enumerate(None)?
            .iter()
            .map(Credential::to_row)
            .collect())
    }

    /// Programmatic lookup. Missing names and store failures both yield `None`.
    pub fn get(&self, name: &str) -> Option<CredentialRecord> {
        match self.read(name) {
            Ok(found) => found.map(|credential| credential.to_record()),
            Err(e) => {
                tracing::warn!(category = "CREDENTIALS", name = %name, error = ?e, "Lookup failed, treating as absent");
                None
            }
        }
    }

    /// Programmatic create-or-overwrite of a full record.
    pub fn set(&self, name: &str, record: &CredentialRecord) -> Result<(), AppError> {
        self.write(name, &record.username, &record.password)
    }

    fn read_target(&self, target: &str) -> Result<Option<Credential>, AppError> {
        let found = self.manager.read(target).inspect_err(|e| {
            tracing::error!(category = "CREDENTIALS", target = %target, error = ?e, "Read failed")
        })?;

        Ok(found.map(|StoredSecret { username, password, last_written }| {
            tracing::debug!(
                category = "CREDENTIALS",
                target = %target,
                password_len = password.chars().count(),
                "Read credential"
            );
            Credential {
                name: remove_prefix(target),
                username,
                password,
                last_written,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryCredentialManager;

    fn vault() -> CredentialVault<MemoryCredentialManager> {
        CredentialVault::new(MemoryCredentialManager::new())
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let vault = vault();
        vault.write("alice", "u1", "p1").unwrap();

        let credential = vault.read("alice").unwrap().unwrap();
        assert_eq!(credential.name, "alice");
        assert_eq!(credential.username, "u1");
        assert_eq!(credential.password, "p1");
        assert!(credential.last_written.is_some());
    }

    #[test]
    fn test_write_stores_prefixed_target() {
        let vault = vault();
        vault.write("alice", "u1", "p1").unwrap();
        assert_eq!(vault.manager().targets(), vec!["QuickCred_alice".to_string()]);
    }

    #[test]
    fn test_already_prefixed_name_is_not_double_prefixed() {
        let vault = vault();
        vault.write("QuickCred_alice", "u1", "p1").unwrap();
        assert!(vault.read("alice").unwrap().is_some());
        assert_eq!(vault.manager().targets(), vec!["QuickCred_alice".to_string()]);
    }

    #[test]
    fn test_read_missing_is_none() {
        assert!(vault().read("never-created").unwrap().is_none());
    }

    #[test]
    fn test_read_empty_username() {
        let vault = vault();
        vault.write("pin", "", "1234").unwrap();
        let credential = vault.read("pin").unwrap().unwrap();
        assert_eq!(credential.username, "");
        assert_eq!(credential.password, "1234");
    }

    #[test]
    fn test_write_overwrites() {
        let vault = vault();
        vault.write("mail", "old", "old-pass").unwrap();
        vault.write("mail", "new", "new-pass").unwrap();

        let credential = vault.read("mail").unwrap().unwrap();
        assert_eq!(credential.username, "new");
        assert_eq!(credential.password, "new-pass");
        assert_eq!(vault.manager().targets().len(), 1);
    }

    #[test]
    fn test_delete_then_read_is_none() {
        let vault = vault();
        vault.write("bob", "u", "p").unwrap();
        vault.delete("bob").unwrap();
        assert!(vault.read("bob").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_fails() {
        let result = vault().delete("ghost");
        assert!(matches!(result, Err(AppError::DeleteFailed { target, .. }) if target == "QuickCred_ghost"));
    }

    #[test]
    fn test_write_failure_surfaces() {
        let vault = vault();
        vault.manager().fail_writes(true);
        assert!(matches!(
            vault.write("mail", "u", "p"),
            Err(AppError::WriteFailed { .. })
        ));
    }

    #[test]
    fn test_enumerate_default_returns_only_prefixed_entries() {
        let vault = vault();
        vault.write("alice", "u-alice", "p1").unwrap();
        vault.write("bob", "u-bob", "p2").unwrap();
        vault.manager().insert_raw("TERMSRV/server01", "admin", "x");
        vault.manager().insert_raw("OtherApp_alice", "other", "y");

        let credentials = vault.enumerate(None).unwrap();
        let mut pairs: Vec<(String, String)> = credentials
            .into_iter()
            .map(|c| (c.name, c.username))
            .collect();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("alice".to_string(), "u-alice".to_string()),
                ("bob".to_string(), "u-bob".to_string()),
            ]
        );
    }

    #[test]
    fn test_enumerate_with_custom_filter() {
        let vault = vault();
        vault.write("work-mail", "w", "p").unwrap();
        vault.write("work-vpn", "v", "p").unwrap();
        vault.write("home-nas", "h", "p").unwrap();

        let credentials = vault.enumerate(Some("QuickCred_work-")).unwrap();
        let names: Vec<String> = credentials.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["work-mail".to_string(), "work-vpn".to_string()]);
    }

    #[test]
    fn test_enumerate_foreign_filter_keeps_full_target() {
        let vault = vault();
        vault.manager().insert_raw("TERMSRV/server01", "admin", "x");

        let credentials = vault.enumerate(Some("TERMSRV/")).unwrap();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].name, "TERMSRV/server01");
        assert_eq!(credentials[0].username, "admin");
    }

    #[test]
    fn test_enumerate_empty_store() {
        assert!(vault().enumerate(None).unwrap().is_empty());
    }

    #[test]
    fn test_enumerate_unavailable_store_is_error() {
        let vault = vault();
        vault.manager().set_unavailable(true);
        assert!(matches!(
            vault.enumerate(None),
            Err(AppError::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn test_enumerate_skips_undecodable_entry() {
        let vault = vault();
        vault.write("mail", "alice", "pw").unwrap();
        vault.write("vpn", "bob", "pw").unwrap();
        vault.manager().corrupt("QuickCred_mail");

        let names: Vec<String> = vault
            .enumerate(None)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["vpn".to_string()]);
        assert!(matches!(
            vault.read("mail"),
            Err(AppError::CorruptCredential { .. })
        ));
    }

    #[test]
    fn test_rows_never_carry_passwords() {
        let vault = vault();
        vault.write("mail", "alice", "secret-value").unwrap();

        let rows = vault.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "mail");
        assert_eq!(rows[0].username, "alice");
        let json = serde_json::to_string(&rows).unwrap();
        assert!(!json.contains("secret-value"));
    }

    #[test]
    fn test_get_and_set() {
        let vault = vault();
        assert!(vault.get("api").is_none());

        let record = CredentialRecord {
            username: "svc".to_string(),
            password: "token".to_string(),
        };
        vault.set("api", &record).unwrap();
        assert_eq!(vault.get("api"), Some(record));
    }

    #[test]
    fn test_set_is_full_overwrite() {
        let vault = vault();
        vault.write("api", "svc", "token").unwrap();
        vault
            .set(
                "api",
                &CredentialRecord {
                    username: String::new(),
                    password: "token2".to_string(),
                },
            )
            .unwrap();

        let record = vault.get("api").unwrap();
        assert_eq!(record.username, "");
        assert_eq!(record.password, "token2");
    }

    #[test]
    fn test_get_on_unavailable_store_is_none() {
        let vault = vault();
        vault.write("api", "svc", "token").unwrap();
        vault.manager().set_unavailable(true);
        assert!(vault.get("api").is_none());
    }
}
