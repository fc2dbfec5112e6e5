//! Error types for preset persistence.

use thiserror::Error;

/// Result type for filter operations that touch storage.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while persisting filter presets.
///
/// Filter evaluation itself is infallible; only the storage seam can fail.
#[derive(Debug, Error)]
pub enum FilterError {
    /// IO error in a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored presets could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The key-value store rejected an operation.
    #[error("Storage error for key {key}: {message}")]
    Storage { key: String, message: String },

    /// No preset with the given id exists.
    #[error("No filter preset with id {id}")]
    PresetNotFound { id: String },
}

impl FilterError {
    /// Create a storage error.
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a preset-not-found error.
    pub fn preset_not_found(id: impl Into<String>) -> Self {
        Self::PresetNotFound { id: id.into() }
    }
}
