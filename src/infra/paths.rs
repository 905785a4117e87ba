//! Path utilities for QuickCred
//!
//! QuickCred keeps no data files of its own; the only thing written to disk
//! is the log. Credentials live exclusively in Windows Credential Manager.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "QuickCred";

/// Gets the QuickCred application data directory.
///
/// # Returns
/// * `%APPDATA%\QuickCred`, or `.\QuickCred` when APPDATA is not set
///
/// # Side Effects
/// - Creates the directory if it doesn't exist
pub fn get_quick_cred_dir() -> Result<PathBuf, String> {
    let base = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    app_dir_in(&base)
}

/// Gets the log directory, `%APPDATA%\QuickCred\logs`.
///
/// # Side Effects
/// - Creates the directory and its parents if they don't exist
pub fn get_logs_dir() -> Result<PathBuf, String> {
    logs_dir_in(&get_quick_cred_dir()?)
}

fn app_dir_in(base: &Path) -> Result<PathBuf, String> {
    let dir = base.join(APP_DIR_NAME);
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create QuickCred directory {:?}: {}", dir, e))?;
    Ok(dir)
}

fn logs_dir_in(app_dir: &Path) -> Result<PathBuf, String> {
    let dir = app_dir.join("logs");
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create logs directory {:?}: {}", dir, e))?;
    Ok(dir)
}
