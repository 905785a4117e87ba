//! Core domain types for QuickCred

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A credential as read back from the store.
///
/// `name` is always the unprefixed logical name. Values of this type are
/// transient read results; nothing in the application caches them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub name: String,
    /// Empty when the store entry has no username
    pub username: String,
    pub password: String,
    /// Last-modified time reported by the store, if any
    pub last_written: Option<DateTime<Utc>>,
}

impl Credential {
    /// Projects the credential to a list row, dropping the password
    pub fn to_row(&self) -> CredentialRow {
        CredentialRow {
            name: self.name.clone(),
            username: self.username.clone(),
            last_written: self.last_written,
        }
    }

    /// Projects the credential to the record used by the programmatic API
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SECURITY: Never reveal the password content
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &format_args!("*** {} chars ***", self.password.chars().count()))
            .field("last_written", &self.last_written)
            .finish()
    }
}

/// Username/password pair used by `get`/`set` callers
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One row of the credential list. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRow {
    pub name: String,
    pub username: String,
    /// RFC 3339 timestamp of the last write, when the store reports one
    pub last_written: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Credential {
        Credential {
            name: "mail".to_string(),
            username: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
            last_written: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_debug_masks_password() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("8 chars"));
        assert!(rendered.contains("alice@example.com"));
    }

    #[test]
    fn test_record_debug_masks_password() {
        let rendered = format!("{:?}", sample().to_record());
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn test_row_serialization_has_no_password() {
        let json = serde_json::to_value(sample().to_row()).unwrap();
        assert_eq!(json["name"], "mail");
        assert_eq!(json["username"], "alice@example.com");
        assert_eq!(json["last_written"], "2024-03-01T12:00:00Z");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_record_deserialization() {
        let record: CredentialRecord =
            serde_json::from_str(r#"{"username":"DOMAIN\\bob","password":"p"}"#).unwrap();
        assert_eq!(record.username, "DOMAIN\\bob");
        assert_eq!(record.password, "p");
    }
}
