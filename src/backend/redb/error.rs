//! Conversion from `redb`'s errors -> `tristore::{InitError, RuntimeError}`.

//---------------------------------------------------------------------------------------------------- Import
use crate::error::{InitError, RuntimeError};

//---------------------------------------------------------------------------------------------------- InitError
impl From<redb::DatabaseError> for InitError {
    fn from(error: redb::DatabaseError) -> Self {
        use redb::DatabaseError as E;

        match error {
            E::Storage(s) => storage_to_init(s),
            E::UpgradeRequired(_) => Self::InvalidVersion,
            other => Self::Unknown(Box::new(other)),
        }
    }
}

impl From<redb::TransactionError> for InitError {
    fn from(error: redb::TransactionError) -> Self {
        match error {
            redb::TransactionError::Storage(s) => storage_to_init(s),
            other => Self::Unknown(Box::new(other)),
        }
    }
}

impl From<redb::TableError> for InitError {
    fn from(error: redb::TableError) -> Self {
        match error {
            // A store file without our table is not a store.
            redb::TableError::TableDoesNotExist(_) => Self::Invalid,
            redb::TableError::Storage(s) => storage_to_init(s),
            other => Self::Unknown(Box::new(other)),
        }
    }
}

impl From<redb::CommitError> for InitError {
    fn from(error: redb::CommitError) -> Self {
        match error {
            redb::CommitError::Storage(s) => storage_to_init(s),
            other => Self::Unknown(Box::new(other)),
        }
    }
}

fn storage_to_init(error: redb::StorageError) -> InitError {
    use redb::StorageError as E;

    match error {
        E::Io(io) => InitError::Io(io),
        E::Corrupted(_) => InitError::Corrupt,
        other => InitError::Unknown(Box::new(other)),
    }
}

//---------------------------------------------------------------------------------------------------- RuntimeError
impl From<redb::StorageError> for RuntimeError {
    fn from(error: redb::StorageError) -> Self {
        use redb::StorageError as E;

        match error {
            E::Io(io) => Self::Io(io),
            E::Corrupted(_) => Self::Corrupt,
            // Lock poisoning, oversized values, previous I/O failures:
            // all surface as I/O to the caller, with the engine's
            // message preserved.
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}

impl From<redb::TransactionError> for RuntimeError {
    fn from(error: redb::TransactionError) -> Self {
        match error {
            redb::TransactionError::Storage(s) => s.into(),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}

impl From<redb::TableError> for RuntimeError {
    fn from(error: redb::TableError) -> Self {
        match error {
            // `Store::open` guarantees the table exists, so a missing
            // table afterwards means the file changed under us.
            redb::TableError::TableDoesNotExist(_) => Self::Corrupt,
            redb::TableError::Storage(s) => s.into(),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}

impl From<redb::CommitError> for RuntimeError {
    fn from(error: redb::CommitError) -> Self {
        match error {
            redb::CommitError::Storage(s) => s.into(),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}
