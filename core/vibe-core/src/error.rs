//! Error types for vibe-core operations.
//!
//! The classification path itself is pure arithmetic and never fails; errors
//! only arise at the loading edges (config files, recorded event logs).

use std::path::PathBuf;

/// All errors that can occur in vibe-core operations.
#[derive(Debug, thiserror::Error)]
pub enum VibeError {
    #[error("Config file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using VibeError.
pub type Result<T> = std::result::Result<T, VibeError>;
