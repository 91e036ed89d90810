//! Abstracted multimap store; `trait Store`.

//---------------------------------------------------------------------------------------------------- Import
use std::path::Path;

use crate::{
    config::Config,
    cursor::Cursor,
    error::{InitError, RuntimeError},
};

//---------------------------------------------------------------------------------------------------- Store
/// An ordered byte-keyed multimap backed by an embedded database.
///
/// Essentially, the functions that can be called on
/// [`ConcreteStore`](crate::ConcreteStore).
///
/// # Multimap contract
/// - Keys are ordered by byte length first, then byte content; there is
///   no collation.
/// - A key may map to any number of values, and the exact same
///   `(key, value)` pair may be stored more than once - every [`Store::put`]
///   adds a record, and [`Store::values_count`] counts records, not
///   distinct keys.
/// - Records sharing a key are contiguous in cursor order. The order
///   *among* them is unspecified and must not be relied on.
///
/// # Concurrency
/// A store is single-writer. Cursors read a snapshot taken when they are
/// created; callers sharing a store across threads provide their own
/// exclusion.
pub trait Store: Sized {
    /// The cursor type produced by [`Store::cursor`].
    type Cursor: Cursor;

    /// Open (and maybe create) a store.
    ///
    /// The on-disk file is `<identifier>.db`; see [`Config`].
    ///
    /// # Errors
    /// Fails if the backend cannot open the file, if the file is not a
    /// valid store, or if the file is missing and
    /// [`StoreMode::CREATE`](crate::config::StoreMode::CREATE) is not set.
    /// No partial state is left behind on failure.
    fn open(config: Config) -> Result<Self, InitError>;

    /// Return the [`Config`] this store was opened with.
    fn config(&self) -> &Config;

    /// The resolved store data file path.
    fn path(&self) -> &Path;

    /// `true` until [`Store::close`] is called.
    fn is_open(&self) -> bool;

    /// Close the store, releasing the backend handle.
    ///
    /// Close is idempotent: closing an already-closed store returns `Ok`.
    /// Every other operation on a closed store returns
    /// [`RuntimeError::Closed`]. Dropping a store closes it.
    ///
    /// # Errors
    /// A failed final flush is reported, but the handle is released
    /// regardless.
    fn close(&mut self) -> Result<(), RuntimeError>;

    /// Copy this store's entire contents into a fresh store at
    /// `new_identifier`.
    ///
    /// The new store is opened with the same [`StoreMode`](crate::config::StoreMode)
    /// and [`SyncMode`](crate::config::SyncMode) as this one, then every
    /// record is copied through a fresh cursor. The multiset of
    /// `(key, value)` pairs in the clone equals the source's, duplicates
    /// included.
    ///
    /// # Errors
    /// The first failed copy aborts the clone.
    fn clone_to(&self, new_identifier: &Path) -> Result<Self, InitError>;

    /// Total number of records, duplicates counted.
    ///
    /// # Errors
    /// Backend failures only; an empty store returns `Ok(0)`.
    fn values_count(&self) -> Result<u64, RuntimeError>;

    /// Insert a `(key, value)` record.
    ///
    /// Duplicate keys - and duplicate exact pairs - are allowed; nothing
    /// is ever overwritten. Putting the same pair twice leaves two
    /// records.
    ///
    /// # Errors
    /// [`RuntimeError::EmptyKey`] for an empty key,
    /// [`RuntimeError::ReadOnly`] on a reader handle.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), RuntimeError>;

    /// Does a record with this key (and, if given, this exact value) exist?
    ///
    /// With `value` as `None`, any record with `key` matches. With
    /// `Some(value)`, only a byte-equal `(key, value)` record matches.
    ///
    /// # Errors
    /// Backend failures only; "not found" is `Ok(false)`.
    fn exists(&self, key: &[u8], value: Option<&[u8]>) -> Result<bool, RuntimeError>;

    /// Remove every record with this key, duplicates included.
    ///
    /// Deleting a key with no records is `Ok`; callers wanting to
    /// distinguish that case pre-check with [`Store::exists`].
    ///
    /// # Errors
    /// [`RuntimeError::EmptyKey`], [`RuntimeError::ReadOnly`], or backend
    /// failures.
    fn delete_key(&self, key: &[u8]) -> Result<(), RuntimeError>;

    /// Remove at most one record matching `(key, value)` exactly.
    ///
    /// Byte-length and byte-content must both match. If the same pair was
    /// stored N times, N-1 records remain afterwards.
    ///
    /// # Errors
    /// [`RuntimeError::KeyNotFound`] if no exact match exists - this is
    /// distinguishable from I/O failure and is not logged as an error.
    fn delete_key_value(&self, key: &[u8], value: &[u8]) -> Result<(), RuntimeError>;

    /// Durably flush all writes to stable storage.
    ///
    /// # Errors
    /// Backend failures.
    fn sync(&self) -> Result<(), RuntimeError>;

    /// Create a cursor over a read snapshot of this store.
    ///
    /// Multiple live cursors over the same store are allowed. A cursor
    /// does not observe writes made after its creation.
    ///
    /// # Errors
    /// Backend failures, or [`RuntimeError::Closed`].
    fn cursor(&self) -> Result<Self::Cursor, RuntimeError>;
}
