//! Target-name namespacing
//!
//! Every credential QuickCred manages lives under a fixed prefix in
//! Credential Manager, so its entries never collide with unrelated
//! generic credentials written by other software.

/// Prefix prepended to every managed target name.
pub const CREDENTIAL_PREFIX: &str = "QuickCred_";

/// Prepends [`CREDENTIAL_PREFIX`] unless `name` already carries it.
pub fn add_prefix(name: &str) -> String {
    if name.starts_with(CREDENTIAL_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", CREDENTIAL_PREFIX, name)
    }
}

/// Strips one leading [`CREDENTIAL_PREFIX`], or returns `name` unchanged.
pub fn remove_prefix(name: &str) -> String {
    name.strip_prefix(CREDENTIAL_PREFIX)
        .unwrap_or(name)
        .to_string()
}

/// True when `a` and `b` address the same store entry.
///
/// Both names are prefixed first, then compared ignoring case (Unicode
/// aware), matching how Credential Manager resolves target names.
pub fn same_target(a: &str, b: &str) -> bool {
    add_prefix(a).to_lowercase() == add_prefix(b).to_lowercase()
}
