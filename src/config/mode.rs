//! Store open-mode flags.

//---------------------------------------------------------------------------------------------------- StoreMode
bitflags::bitflags! {
    /// How a store is opened.
    ///
    /// - [`StoreMode::WRITE`] opens the backend as a writer; without it the
    ///   handle is a reader and every mutating operation returns
    ///   [`RuntimeError::ReadOnly`](crate::RuntimeError::ReadOnly).
    /// - [`StoreMode::CREATE`] creates the store file if it does not exist.
    ///
    /// [`Store::clone_to`](crate::Store::clone_to) re-uses the source's
    /// flags verbatim.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StoreMode: u8 {
        /// The store accepts writes.
        const WRITE  = 0b0000_0001;
        /// The store file is created if missing.
        const CREATE = 0b0000_0010;
    }
}

impl StoreMode {
    /// A read-only mode with no flags set.
    pub const READ_ONLY: Self = Self::empty();

    /// Does this mode accept writes?
    pub const fn is_writable(self) -> bool {
        self.contains(Self::WRITE)
    }

    /// Does this mode create a missing store file?
    pub const fn is_create(self) -> bool {
        self.contains(Self::CREATE)
    }
}
