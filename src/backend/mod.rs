//! Store backends.

cfg_if::cfg_if! {
    if #[cfg(feature = "redb")] {
        mod redb;
        pub use self::redb::{ConcreteCursor, ConcreteStore};
    } else {
        compile_error!("`tristore` requires a store backend; enable the `redb` feature");
    }
}
