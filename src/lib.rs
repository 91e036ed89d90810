//! Embedded triple store over an ordered duplicate-key database.
//!
//! # Purpose
//! `tristore` is the storage and query-bridge core of a semantic-graph
//! library, in three layers:
//!
//! 1. **Store** - [`Store`] is an ordered byte-keyed multimap with a
//!    cursor protocol ([`Cursor`]), implemented over an embedded engine
//!    selected by feature flag ([`ConcreteStore`]). Keys order by byte
//!    length then byte content; duplicate keys and duplicate exact pairs
//!    are first-class.
//! 2. **Model** - [`model::Model`] persists statements into three index
//!    stores and answers indexed pattern lookups with a
//!    [`model::StatementStream`].
//! 3. **Query bridge** - [`query`] holds the extension points a query
//!    engine consumes: a triples source serving candidate statements
//!    from a model, the term/literal converters, and adapters over the
//!    engine's result handle.
//!
//! # Backends
//! | Feature flag | Backend |
//! |--------------|---------|
//! | `redb` (default) | [`redb`](https://docs.rs/redb) |
//!
//! # Concurrency
//! Single-process, single-writer. Operations never suspend; blocking
//! happens only inside the engine's synchronous I/O. Callers sharing a
//! store or model across threads provide their own exclusion.
//!
//! # Example
//! ```rust
//! use tristore::{Config, Cursor, Store, ConcreteStore};
//!
//! let tempdir = tempfile::tempdir().unwrap();
//! let store = ConcreteStore::open(Config::new(tempdir.path().join("facts"))).unwrap();
//!
//! store.put(b"colour", b"red").unwrap();
//! store.put(b"colour", b"yellow").unwrap();
//! store.put(b"colour", b"red").unwrap();
//! assert_eq!(store.values_count().unwrap(), 3);
//!
//! // Distinct values of one key.
//! let mut cursor = store.cursor().unwrap();
//! assert!(cursor.seek_key(b"colour").unwrap());
//! let mut values = vec![cursor.current().unwrap().1.to_vec()];
//! while cursor.next_value_of_current_key().unwrap() {
//!     values.push(cursor.current().unwrap().1.to_vec());
//! }
//! assert_eq!(values.len(), 2);
//! ```

//---------------------------------------------------------------------------------------------------- Lints
#![forbid(unsafe_code)]
#![deny(clippy::expect_used, clippy::panic, clippy::unwrap_used)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::panic, clippy::unwrap_used))]

//---------------------------------------------------------------------------------------------------- Public API
mod backend;
pub use backend::{ConcreteCursor, ConcreteStore};

pub mod config;
pub use config::Config;

pub mod constants;

mod cursor;
pub use cursor::Cursor;

mod datum;
pub use datum::Datum;

mod error;
pub use error::{InitError, RuntimeError};

pub mod model;

pub mod query;

mod statement;
pub use statement::{Pattern, Statement};

mod store;
pub use store::Store;

mod term;
pub use term::{Term, Uri};

//---------------------------------------------------------------------------------------------------- Private
#[cfg(test)]
mod tests;
