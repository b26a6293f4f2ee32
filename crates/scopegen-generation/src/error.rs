//! Error types for snippet generation

use thiserror::Error;

/// Errors that can occur during snippet generation
///
/// Per-request conditions (template misses, backend failures, invalid
/// generated code) are not errors; they surface as fields of
/// [`crate::models::GeneratedResult`]. This enum covers the boundaries
/// that are allowed to propagate: corpus loading and response parsing.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// IO error while reading the corpus
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus manifest exists but could not be decoded
    #[error("Malformed corpus manifest {path}: {message}")]
    Manifest {
        /// Path of the manifest file
        path: String,
        /// Decoder error message
        message: String,
    },

    /// No extraction strategy recovered code from a backend response
    #[error("Failed to extract code from response: {0}")]
    ResponseParseFailed(String),
}
