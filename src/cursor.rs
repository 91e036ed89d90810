//! Store iteration; `trait Cursor`.

//---------------------------------------------------------------------------------------------------- Import
use crate::{datum::Datum, error::RuntimeError};

//---------------------------------------------------------------------------------------------------- Cursor
/// A stateful position over a read snapshot of a [`Store`](crate::Store).
///
/// Each positioning operation returns `Ok(true)` when it lands on a
/// record and `Ok(false)` when there is nothing (further) to return -
/// "no record" is an outcome, not an error. After a successful
/// positioning, [`Cursor::current`] borrows the record's key and value;
/// the cursor owns those bytes and releases them on the next advance, so
/// callers copy out anything they want to keep. The borrow checker
/// enforces this.
///
/// The advance operations come in three flavors mirroring the three ways
/// a multimap is walked:
/// - [`Cursor::next_record`] visits *every* record in ascending order
///   (full-scan / copy workloads);
/// - [`Cursor::next_key`] visits each *distinct key* once, in ascending
///   byte-length-then-content order;
/// - [`Cursor::next_value_of_current_key`] visits each *distinct value*
///   of the current key once.
///
/// The flavors are not meant to be mixed within one walk: once
/// [`Cursor::next_value_of_current_key`] returns `false` the underlying
/// position has moved past the key's records.
pub trait Cursor {
    /// Position at the lowest record.
    ///
    /// Returns `Ok(false)` if the store is empty.
    ///
    /// # Errors
    /// Backend read failures.
    fn seek_first(&mut self) -> Result<bool, RuntimeError>;

    /// Position at the first record whose key is byte-equal to `key`.
    ///
    /// Returns `Ok(false)` if no record with this key exists.
    ///
    /// # Errors
    /// [`RuntimeError::EmptyKey`] or backend read failures.
    fn seek_key(&mut self, key: &[u8]) -> Result<bool, RuntimeError>;

    /// Position at the first record with this key whose value differs
    /// from `value`.
    ///
    /// This is the value-filtered seek: records matching `(key, value)`
    /// exactly are skipped. Returns `Ok(false)` when the key has no
    /// record with a different value.
    ///
    /// # Errors
    /// [`RuntimeError::EmptyKey`] or backend read failures.
    fn seek_key_after_value(&mut self, key: &[u8], value: &[u8]) -> Result<bool, RuntimeError>;

    /// Advance to the next record, whatever its key.
    ///
    /// Visits duplicates individually. A cursor that was never positioned
    /// starts at the first record.
    ///
    /// # Errors
    /// Backend read failures.
    fn next_record(&mut self) -> Result<bool, RuntimeError>;

    /// Advance to the next record whose key differs from the current one.
    ///
    /// Repeated calls after [`Cursor::seek_first`] enumerate the distinct
    /// keys in ascending order, each exactly once. A cursor that was never
    /// positioned starts at the first record.
    ///
    /// # Errors
    /// Backend read failures.
    fn next_key(&mut self) -> Result<bool, RuntimeError>;

    /// Advance to the next record bearing the current key but a value
    /// different from the current one.
    ///
    /// Repeated calls after [`Cursor::seek_key`] enumerate the distinct
    /// values of that key, each exactly once. Returns `Ok(false)` once
    /// the key's records are exhausted, or if the cursor holds no current
    /// record.
    ///
    /// # Errors
    /// Backend read failures.
    fn next_value_of_current_key(&mut self) -> Result<bool, RuntimeError>;

    /// The record the cursor currently rests on, if any.
    ///
    /// The datums are owned by the cursor and replaced on the next
    /// advance.
    fn current(&self) -> Option<(&Datum, &Datum)>;
}
