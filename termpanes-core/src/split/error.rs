//! Error types for layout persistence
//!
//! Layout operations themselves have no fatal error conditions — stale
//! or malformed input degrades to a silent no-op, and correctness is
//! restored by the next reconcile or normalize pass. Only the
//! persistence adapter surfaces errors, and the store catches and logs
//! them rather than propagating.

/// Errors that can occur while persisting or restoring layout state.
#[derive(Debug, thiserror::Error)]
pub enum LayoutPersistError {
    /// I/O error reading or writing the storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error producing the persisted blob.
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Deserialization error parsing a persisted blob.
    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),

    /// Persisted blob was written by an incompatible format version.
    #[error("incompatible layout format version: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version this build understands.
        expected: u32,
        /// Version found in the blob.
        actual: u32,
    },
}
