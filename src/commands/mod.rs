//! Tauri command layer
//!
//! Thin command wrappers that expose functionality to the frontend.
//! Commands delegate work to core/adapters/infra modules.

pub mod credentials;
pub mod system;
pub mod windows;

// Re-export commands for easier registration
pub use credentials::*;
