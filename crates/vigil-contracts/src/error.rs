//! Error types for the VIGIL engine.
//!
//! Clinical rule evaluation itself never fails: lookups that find nothing
//! return `Option`/empty collections, and "no applicable rule" means "no
//! alert". The only fallible operations are loading knowledge-base
//! configuration and talking to the acknowledgment store.

use thiserror::Error;

/// The unified error type for the VIGIL crates.
#[derive(Debug, Error)]
pub enum VigilError {
    /// The knowledge-base configuration is missing, unreadable, or malformed.
    #[error("knowledge configuration error: {reason}")]
    ConfigError { reason: String },

    /// The acknowledgment store could not be read or written.
    #[error("acknowledgment store error: {reason}")]
    StoreError { reason: String },
}

/// Convenience alias used throughout the VIGIL crates.
pub type VigilResult<T> = Result<T, VigilError>;
