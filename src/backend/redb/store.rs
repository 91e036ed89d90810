//! Implementation of `trait Store` for `redb`.

//---------------------------------------------------------------------------------------------------- Import
use std::path::Path;

use redb::{ReadableTable, ReadableTableMetadata};
use tracing::{debug, error};

use crate::{
    backend::redb::{
        cursor::ConcreteCursor,
        encoding::{self, PrefixRange},
        types::RECORDS,
    },
    config::{Config, SyncMode},
    cursor::Cursor,
    error::{InitError, RuntimeError},
    store::Store,
};

//---------------------------------------------------------------------------------------------------- ConcreteStore
/// A strongly typed, concrete store, backed by `redb`.
pub struct ConcreteStore {
    /// The actual database handle; `None` after [`Store::close`].
    db: Option<redb::Database>,

    /// The configuration we were opened with (and in current use).
    config: Config,

    /// A cached, redb version of [`SyncMode`]. `redb` sets durability
    /// _per_ transaction, so this is applied on every write.
    durability: redb::Durability,
}

impl Drop for ConcreteStore {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            debug!(target: "tristore::store", %err, "store close on drop failed");
        }
    }
}

//---------------------------------------------------------------------------------------------------- Store Impl
impl Store for ConcreteStore {
    type Cursor = ConcreteCursor;

    #[cold]
    #[inline(never)] // called once per store.
    fn open(config: Config) -> Result<Self, InitError> {
        match Self::try_open(&config) {
            Ok(db) => {
                let durability = match config.sync_mode {
                    SyncMode::Safe => redb::Durability::Immediate,
                    SyncMode::Async => redb::Durability::Eventual,
                    SyncMode::Fast => redb::Durability::None,
                };

                Ok(Self {
                    db: Some(db),
                    config,
                    durability,
                })
            }
            // Nothing to roll back: the handle never escaped `try_open`.
            Err(err) => {
                error!(
                    target: "tristore::store",
                    path = %config.store_file().display(),
                    %err,
                    "failed to open store",
                );
                Err(err)
            }
        }
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn path(&self) -> &Path {
        self.config.store_file()
    }

    fn is_open(&self) -> bool {
        self.db.is_some()
    }

    fn close(&mut self) -> Result<(), RuntimeError> {
        let Some(db) = self.db.take() else {
            return Ok(());
        };

        // The handle is released whether or not the final flush works.
        let mut result = Ok(());
        if self.config.mode.is_writable() {
            if let Err(err) = sync_db(&db) {
                result = Err(fail("close", err));
            }
        }
        drop(db);
        result
    }

    fn clone_to(&self, new_identifier: &Path) -> Result<Self, InitError> {
        let config = Config::new(new_identifier)
            .with_mode(self.config.mode)
            .with_sync_mode(self.config.sync_mode);
        let new_store = Self::open(config)?;

        // Copy every record, duplicates included, through a fresh cursor.
        let mut cursor = self.cursor()?;
        let mut more = cursor.seek_first()?;
        while more {
            if let Some((key, value)) = cursor.current() {
                new_store.put(key, value)?;
            }
            more = cursor.next_record()?;
        }

        Ok(new_store)
    }

    fn values_count(&self) -> Result<u64, RuntimeError> {
        let db = self.db()?;
        let tx = db.begin_read()?;
        let table = tx.open_table(RECORDS)?;
        Ok(table.len()?)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), RuntimeError> {
        let db = self.db()?;
        self.ensure_writable()?;
        ensure_key(key)?;
        self.put_inner(db, key, value).map_err(|err| fail("put", err))
    }

    fn exists(&self, key: &[u8], value: Option<&[u8]>) -> Result<bool, RuntimeError> {
        let db = self.db()?;
        ensure_key(key)?;

        let prefix = match value {
            Some(value) => encoding::pair_prefix(key, value),
            None => encoding::key_prefix(key),
        };
        let range = PrefixRange::of(prefix);

        let tx = db.begin_read()?;
        let table = tx.open_table(RECORDS)?;
        match table.range::<&[u8]>(range.bounds())?.next() {
            None => Ok(false),
            Some(entry) => {
                entry?;
                Ok(true)
            }
        }
    }

    fn delete_key(&self, key: &[u8]) -> Result<(), RuntimeError> {
        let db = self.db()?;
        self.ensure_writable()?;
        ensure_key(key)?;
        self.delete_key_inner(db, key)
            .map_err(|err| fail("delete_key", err))
    }

    fn delete_key_value(&self, key: &[u8], value: &[u8]) -> Result<(), RuntimeError> {
        let db = self.db()?;
        self.ensure_writable()?;
        ensure_key(key)?;
        self.delete_key_value_inner(db, key, value)
            .map_err(|err| fail("delete_key_value", err))
    }

    fn sync(&self) -> Result<(), RuntimeError> {
        let db = self.db()?;
        debug!(target: "tristore::store", path = %self.path().display(), "sync");
        sync_db(db).map_err(|err| fail("sync", err))
    }

    fn cursor(&self) -> Result<ConcreteCursor, RuntimeError> {
        let db = self.db()?;
        ConcreteCursor::new(db).map_err(|err| fail("cursor", err))
    }
}

//---------------------------------------------------------------------------------------------------- Internal
impl ConcreteStore {
    #[cold]
    #[inline(never)] // called once per store.
    fn try_open(config: &Config) -> Result<redb::Database, InitError> {
        let db = if config.mode.is_create() {
            if let Some(parent) = config.store_file().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(config.store_file())?;

            redb::Builder::new().create_file(file)?
        } else {
            redb::Builder::new().open(config.store_file())?
        };

        // `redb` creates tables on open if not already created.
        if config.mode.is_writable() || config.mode.is_create() {
            let tx = db.begin_write()?;
            tx.open_table(RECORDS)?;
            tx.commit()?;
        } else {
            // A reader can only verify the table is there; a store file
            // without it is not one of ours.
            let tx = db.begin_read()?;
            tx.open_table(RECORDS)?;
        }

        Ok(db)
    }

    /// Return the open database handle, or [`RuntimeError::Closed`].
    fn db(&self) -> Result<&redb::Database, RuntimeError> {
        self.db.as_ref().ok_or(RuntimeError::Closed)
    }

    fn ensure_writable(&self) -> Result<(), RuntimeError> {
        if self.config.mode.is_writable() {
            Ok(())
        } else {
            error!(target: "tristore::store", "write operation on read-only store");
            Err(RuntimeError::ReadOnly)
        }
    }

    fn put_inner(&self, db: &redb::Database, key: &[u8], value: &[u8]) -> Result<(), RuntimeError> {
        let mut tx = db.begin_write()?;
        tx.set_durability(self.durability);
        {
            let mut table = tx.open_table(RECORDS)?;

            // The next free sequence number for this exact pair: one past
            // the highest stored, so a re-inserted pair lands on a fresh
            // record instead of overwriting.
            let range = PrefixRange::of(encoding::pair_prefix(key, value));
            let seq = match table.range::<&[u8]>(range.bounds())?.next_back() {
                None => 0,
                Some(entry) => {
                    let (guard, _) = entry?;
                    let (_, _, seq) = encoding::decode(guard.value())?;
                    seq + 1
                }
            };

            table.insert(encoding::record(key, value, seq).as_slice(), ())?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_key_inner(&self, db: &redb::Database, key: &[u8]) -> Result<(), RuntimeError> {
        let mut tx = db.begin_write()?;
        tx.set_durability(self.durability);
        {
            let mut table = tx.open_table(RECORDS)?;

            let mut doomed = Vec::new();
            {
                let range = PrefixRange::of(encoding::key_prefix(key));
                for entry in table.range::<&[u8]>(range.bounds())? {
                    let (guard, _) = entry?;
                    doomed.push(guard.value().to_vec());
                }
            }

            // Deleting a key with no records is not an error.
            for raw in doomed {
                table.remove(raw.as_slice())?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_key_value_inner(
        &self,
        db: &redb::Database,
        key: &[u8],
        value: &[u8],
    ) -> Result<(), RuntimeError> {
        let mut tx = db.begin_write()?;
        tx.set_durability(self.durability);

        let victim = {
            let table = tx.open_table(RECORDS)?;
            let range = PrefixRange::of(encoding::pair_prefix(key, value));
            let next = table.range::<&[u8]>(range.bounds())?.next();
            match next {
                None => None,
                Some(entry) => {
                    let (guard, _) = entry?;
                    Some(guard.value().to_vec())
                }
            }
        };

        // At most one record goes; identical duplicates survive.
        match victim {
            Some(raw) => {
                {
                    let mut table = tx.open_table(RECORDS)?;
                    table.remove(raw.as_slice())?;
                }
                tx.commit()?;
                Ok(())
            }
            None => {
                tx.abort()?;
                Err(RuntimeError::KeyNotFound)
            }
        }
    }
}

fn ensure_key(key: &[u8]) -> Result<(), RuntimeError> {
    if key.is_empty() {
        error!(target: "tristore::store", "empty key is not allowed");
        Err(RuntimeError::EmptyKey)
    } else {
        Ok(())
    }
}

/// Force a durable flush. `redb` ties syncs to write transactions, so:
/// open one, raise its durability, commit it empty.
fn sync_db(db: &redb::Database) -> Result<(), RuntimeError> {
    let mut tx = db.begin_write()?;
    tx.set_durability(redb::Durability::Paranoid);
    tx.commit()?;
    Ok(())
}

/// Log a failed operation and pass the error through.
///
/// [`RuntimeError::KeyNotFound`] is an outcome, not a failure, and is
/// never logged.
fn fail(op: &'static str, err: RuntimeError) -> RuntimeError {
    if !matches!(err, RuntimeError::KeyNotFound) {
        error!(target: "tristore::store", %err, "{} failed", op);
    }
    err
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    // The backend is tested through the `Store` trait in
    // `crate::backend::tests`.
}
