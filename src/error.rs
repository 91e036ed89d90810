//! Store errors; `InitError` for `Store::open`, `RuntimeError` for everything after.

//---------------------------------------------------------------------------------------------------- InitError
/// Errors that can occur when opening or cloning a store.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    /// An I/O error occurred while opening the store file.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not a valid store.
    #[error("store file is not a valid database")]
    Invalid,

    /// The store file was created by an incompatible version of the backend.
    #[error("store file version mismatch")]
    InvalidVersion,

    /// The store file exists but is corrupt.
    #[error("store file is corrupt")]
    Corrupt,

    /// A clone failed while copying records into the new store.
    ///
    /// The open itself succeeded; the record copy did not.
    #[error("failed to copy records into the clone: {0}")]
    Copy(#[from] RuntimeError),

    /// An unknown backend error.
    #[error("unknown store error: {0}")]
    Unknown(Box<dyn std::error::Error + Send + Sync>),
}

//---------------------------------------------------------------------------------------------------- RuntimeError
/// Errors that can occur on an opened store.
///
/// [`RuntimeError::KeyNotFound`] is a positioning/lookup outcome, not a
/// failure; it is never logged as an error and callers are expected to
/// handle it locally. Every other variant is a real failure.
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    /// The requested key (or exact key/value pair) does not exist.
    #[error("key/value pair was not found")]
    KeyNotFound,

    /// An empty key was supplied where a key is required.
    ///
    /// Empty datums are legal as values only.
    #[error("key must not be empty")]
    EmptyKey,

    /// A write operation was attempted on a store opened without
    /// [`StoreMode::WRITE`](crate::config::StoreMode::WRITE).
    #[error("store was opened read-only")]
    ReadOnly,

    /// The store handle has already been closed.
    #[error("store is closed")]
    Closed,

    /// The backend engine reported an I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend returned bytes this layer could not decode.
    #[error("store data is corrupt")]
    Corrupt,
}
