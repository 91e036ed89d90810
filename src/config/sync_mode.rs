//! Disk synchronization modes.

//---------------------------------------------------------------------------------------------------- Import
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//---------------------------------------------------------------------------------------------------- SyncMode
/// When writes are flushed to disk.
///
/// Regardless of mode, [`Store::sync`](crate::Store::sync) always forces a
/// full durable flush.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncMode {
    /// Every write is flushed to disk before returning.
    ///
    /// The slowest, but never loses an acknowledged write.
    #[default]
    Safe,

    /// Writes are handed to the OS and flushed at its discretion.
    ///
    /// A crash can lose recent writes but never corrupts the store.
    Async,

    /// No flushing at all until [`Store::sync`](crate::Store::sync) or close.
    ///
    /// Fastest; a crash can lose everything since the last flush.
    Fast,
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    // use super::*;
}
