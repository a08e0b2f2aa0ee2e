//! Error types for the retouch editing engine.
//!
//! Errors are organized by layer: editing errors surface to the caller with
//! the failing operation's name, file errors carry the offending path, and
//! config errors distinguish read/parse/validation failures.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for retouch operations.
#[derive(Error, Debug)]
pub enum RetouchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Editing errors (load, apply, state validation)
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Image file load/save errors
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors reported by the editing surface.
///
/// The quiet no-op conditions (nothing to undo, nothing to redo) are not
/// errors; those surface as `false`/`None` from the respective calls.
#[derive(Error, Debug)]
pub enum EditError {
    /// An empty or malformed buffer was handed to load/update
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An edit was attempted before any image was loaded
    #[error("No image loaded")]
    NoImageLoaded,

    /// An operation failed mid-apply; state and history are unchanged
    #[error("Operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },
}

/// Errors raised by individual operations in the catalog.
///
/// Converted to [`EditError::OperationFailed`] at the editor boundary;
/// they never propagate past it.
#[derive(Error, Debug)]
pub enum OperationError {
    /// The input buffer is unusable (empty, dimension mismatch)
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A recognized option carried an unusable value
    #[error("Invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },
}

/// Image file load/save errors.
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File exceeds the configured size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    TooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed the configured limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    DimensionsTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image encoding/saving failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Convenience type alias for retouch results.
pub type Result<T> = std::result::Result<T, RetouchError>;

/// Convenience type alias for editing results.
pub type EditResult<T> = std::result::Result<T, EditError>;

/// Convenience type alias for operation results.
pub type OpResult<T> = std::result::Result<T, OperationError>;
