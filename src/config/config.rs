//! Store [`Config`].

//---------------------------------------------------------------------------------------------------- Import
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::{StoreMode, SyncMode},
    constants::STORE_FILE_SUFFIX,
};

//---------------------------------------------------------------------------------------------------- Config
/// Store configuration.
///
/// This is the struct passed to [`Store::open`](crate::Store::open) that
/// determines where the store lives and how it behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    //------------------------ Store PATHs
    // These are private since the resolved data
    // file is derived from the identifier.
    /// The store identifier, i.e. the file path without the suffix.
    pub(crate) identifier: PathBuf,
    /// The actual store data file: `<identifier>.db`.
    pub(crate) store_file: PathBuf,

    /// Open-mode flags.
    pub mode: StoreMode,

    /// Disk synchronization mode.
    pub sync_mode: SyncMode,
}

impl Config {
    /// Resolve [`Config::store_file`] from the user-provided identifier.
    ///
    /// The data file path is just the identifier with
    /// [`STORE_FILE_SUFFIX`] appended.
    fn return_store_file(identifier: &Path) -> PathBuf {
        let mut file = identifier.to_path_buf().into_os_string();
        file.push(STORE_FILE_SUFFIX);
        PathBuf::from(file)
    }

    /// Create a new writable [`Config`] with default settings.
    ///
    /// The store is opened with [`StoreMode::WRITE`] | [`StoreMode::CREATE`]
    /// and [`SyncMode::Safe`].
    pub fn new(identifier: impl Into<PathBuf>) -> Self {
        let identifier = identifier.into();
        let store_file = Self::return_store_file(&identifier);
        Self {
            identifier,
            store_file,
            mode: StoreMode::WRITE | StoreMode::CREATE,
            sync_mode: SyncMode::default(),
        }
    }

    /// Create a read-only [`Config`].
    ///
    /// Opening fails if the store file does not already exist.
    pub fn read_only(identifier: impl Into<PathBuf>) -> Self {
        Self {
            mode: StoreMode::READ_ONLY,
            ..Self::new(identifier)
        }
    }

    /// Replace the open-mode flags.
    #[must_use]
    pub fn with_mode(mut self, mode: StoreMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the synchronization mode.
    #[must_use]
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    /// Return the store identifier this config was created with.
    pub fn identifier(&self) -> &Path {
        &self.identifier
    }

    /// Return the absolute [`Path`] to the store data file.
    ///
    /// This is the identifier with [`STORE_FILE_SUFFIX`] appended.
    pub fn store_file(&self) -> &Path {
        &self.store_file
    }
}
