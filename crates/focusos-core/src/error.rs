//! Core error types for focusos-core.
//!
//! One thiserror enum per concern, folded into [`CoreError`] for callers
//! that don't care which layer failed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusos-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Data store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Transactional mail errors
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the key/value local storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open local storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Local storage is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Errors from the reducer-backed data store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No item with the given id in the collection
    #[error("{collection} item not found: {id}")]
    NotFound { collection: &'static str, id: String },

    /// Input rejected before dispatch
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Persisting a collection failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Collection could not be encoded
    #[error("Failed to encode {collection}: {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Authentication and profile errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No signed-in session
    #[error("Not signed in")]
    NotSignedIn,

    /// Profile lookup or update without a stored user
    #[error("User not found")]
    UserNotFound,

    /// Credentials rejected
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Backing storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Stored session/profile blob could not be decoded
    #[error("Corrupt auth record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Transactional email errors.
#[derive(Error, Debug)]
pub enum MailError {
    /// Provider answered with a non-success status
    #[error("Mail provider error (HTTP {status}): {body}")]
    Provider { status: u16, body: String },

    /// Request could not be sent or the response not read
    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed address or link
    #[error("Invalid mail input: {0}")]
    Invalid(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required field empty after trimming
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    /// Value outside the accepted range
    #[error("'{field}' out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg)
                if inner.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
