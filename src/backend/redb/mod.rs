//! `redb` store backend.
//!
//! `redb` is an ordered B-tree engine with unique keys, so this backend
//! stores each logical `(key, value)` pair as one *record key* in a
//! single table (see `encoding`); the table's value column is unused.
//! That layout provides the three properties the multimap contract needs
//! and plain `redb` tables do not: length-then-content key order,
//! duplicate `(key, value)` pairs as distinct records, and contiguous
//! per-key record ranges.

mod cursor;
mod encoding;
mod error;
mod store;
mod types;

pub use cursor::ConcreteCursor;
pub use store::ConcreteStore;
