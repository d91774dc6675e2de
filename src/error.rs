//! Error types for browser detection and registry operations
//!
//! This module defines the error types used throughout the chromtune library.
//! Most per-browser and per-field failures are deliberately surfaced as
//! boolean or optional results at the operation boundary (see the module
//! docs on [`crate::reconcile`]); [`Error`] covers the few conditions that
//! genuinely stop an operation.

/// Errors that can occur during registry access and reconciliation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A registry open/read/write failed in a way that cannot be reduced
    /// to a per-field boolean
    #[error("Registry error at {path}: {message}")]
    Registry { path: String, message: String },

    /// The live Windows registry backend was requested on a non-Windows host
    #[error("The Windows registry is only available on Windows hosts")]
    UnsupportedPlatform,
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use chromtune::{MemoryRegistry, RegistryStore, Result};
///
/// fn write_flag(registry: &MemoryRegistry) -> Result<()> {
///     registry.write_dword(r"SOFTWARE\Example", "flag", 1)?;
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
