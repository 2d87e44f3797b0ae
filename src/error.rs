//! Error types for the `contract-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The query or document text was empty (or whitespace only).
    ///
    /// Raised before any embedder or store call is made.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A collection name that is not one of the recognized collections
    /// (`contracts`, `laws`, `segments`).
    #[error("unknown collection: '{0}'")]
    UnknownCollection(String),

    /// An error occurred during embedding generation.
    #[error("embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Template registration failed after some segment records were already
    /// stored. No rollback is performed; the caller sees how far ingestion
    /// got and can retry the whole registration.
    #[error(
        "template '{template_id}' left inconsistent: {stored_segments} segment(s) stored, {message}"
    )]
    Inconsistent {
        /// The template whose registration failed.
        template_id: String,
        /// How many segment records were upserted before the failure.
        stored_segments: usize,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
