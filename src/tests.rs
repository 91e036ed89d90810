//! Utilities for `tristore` testing.
//!
//! These fn's are only:
//! - enabled on #[cfg(test)]
//! - only used internally

//---------------------------------------------------------------------------------------------------- Import
use crate::{config::Config, model::Model, store::Store, ConcreteStore};

//---------------------------------------------------------------------------------------------------- fn
/// Create a store in a temporary directory.
/// The directory is automatically removed after the `TempDir` is dropped.
pub(crate) fn tmp_store() -> (ConcreteStore, tempfile::TempDir) {
    let tempdir = tempfile::tempdir().unwrap();
    let config = Config::new(tempdir.path().join("store"));
    let store = ConcreteStore::open(config).unwrap();

    (store, tempdir)
}

/// Create a model in a temporary directory.
pub(crate) fn tmp_model() -> (Model, tempfile::TempDir) {
    let tempdir = tempfile::tempdir().unwrap();
    let model = Model::open(tempdir.path(), "test").unwrap();

    (model, tempdir)
}
