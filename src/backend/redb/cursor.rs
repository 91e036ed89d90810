//! Implementation of `trait Cursor` for `redb`.

//---------------------------------------------------------------------------------------------------- Import
use std::ops::Bound;

use tracing::error;

use crate::{
    backend::redb::{
        encoding,
        types::{RecordsRange, RecordsTableRo, RECORDS},
    },
    cursor::Cursor,
    datum::Datum,
    error::RuntimeError,
};

//---------------------------------------------------------------------------------------------------- ConcreteCursor
/// A cursor over a read snapshot of a [`ConcreteStore`](super::ConcreteStore).
///
/// The snapshot is taken at creation; later writes are not observed.
pub struct ConcreteCursor {
    /// Live scan position; `None` until the first seek.
    iter: Option<RecordsRange>,

    /// The last returned pair, owned here and replaced on every advance.
    last_key: Option<Datum>,
    last_value: Option<Datum>,

    table: RecordsTableRo,
    _tx: redb::ReadTransaction,
}

impl ConcreteCursor {
    pub(super) fn new(db: &redb::Database) -> Result<Self, RuntimeError> {
        let tx = db.begin_read()?;
        let table = tx.open_table(RECORDS)?;
        Ok(Self {
            iter: None,
            last_key: None,
            last_value: None,
            table,
            _tx: tx,
        })
    }

    /// Start a scan at the first record key >= `prefix`, unbounded above
    /// so walks can continue into later keys.
    fn start_at(&mut self, prefix: &[u8]) -> Result<(), RuntimeError> {
        self.iter = Some(
            self.table
                .range::<&[u8]>((Bound::Included(prefix), Bound::Unbounded))?,
        );
        self.last_key = None;
        self.last_value = None;
        Ok(())
    }

    /// Pull the next raw record off the scan and decode it.
    fn read_step(&mut self) -> Result<Option<(Datum, Datum)>, RuntimeError> {
        let Some(iter) = self.iter.as_mut() else {
            return Ok(None);
        };

        match iter.next() {
            None => Ok(None),
            Some(entry) => {
                let (guard, _) = entry.map_err(|e| {
                    let err = RuntimeError::from(e);
                    error!(target: "tristore::store", %err, "cursor read failed");
                    err
                })?;
                let (key, value, _seq) = encoding::decode(guard.value())?;
                Ok(Some((Datum::from(key), Datum::from(value))))
            }
        }
    }

    /// Retain a freshly read pair, releasing the previous one.
    fn remember(&mut self, key: Datum, value: Datum) {
        self.last_key = Some(key);
        self.last_value = Some(value);
    }
}

//---------------------------------------------------------------------------------------------------- Cursor Impl
impl Cursor for ConcreteCursor {
    fn seek_first(&mut self) -> Result<bool, RuntimeError> {
        self.start_at(&[])?;
        match self.read_step()? {
            Some((key, value)) => {
                self.remember(key, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn seek_key(&mut self, key: &[u8]) -> Result<bool, RuntimeError> {
        ensure_key(key)?;
        self.start_at(&encoding::key_prefix(key))?;
        match self.read_step()? {
            Some((found_key, value)) if found_key.as_bytes() == key => {
                self.remember(found_key, value);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn seek_key_after_value(&mut self, key: &[u8], value: &[u8]) -> Result<bool, RuntimeError> {
        ensure_key(key)?;
        self.start_at(&encoding::key_prefix(key))?;
        loop {
            let Some((found_key, found_value)) = self.read_step()? else {
                return Ok(false);
            };
            if found_key.as_bytes() != key {
                return Ok(false);
            }
            if found_value.as_bytes() != value {
                self.remember(found_key, found_value);
                return Ok(true);
            }
        }
    }

    fn next_record(&mut self) -> Result<bool, RuntimeError> {
        if self.iter.is_none() {
            return self.seek_first();
        }
        match self.read_step()? {
            Some((key, value)) => {
                self.remember(key, value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn next_key(&mut self) -> Result<bool, RuntimeError> {
        if self.iter.is_none() {
            return self.seek_first();
        }
        loop {
            let Some((key, value)) = self.read_step()? else {
                return Ok(false);
            };
            let differs = self
                .last_key
                .as_ref()
                .is_none_or(|last| last.as_bytes() != key.as_bytes());
            if differs {
                self.remember(key, value);
                return Ok(true);
            }
        }
    }

    fn next_value_of_current_key(&mut self) -> Result<bool, RuntimeError> {
        let Some(current_key) = self.last_key.clone() else {
            return Ok(false);
        };
        let current_value = self.last_value.clone();

        loop {
            let Some((key, value)) = self.read_step()? else {
                return Ok(false);
            };
            if key.as_bytes() != current_key.as_bytes() {
                // The key's records are exhausted.
                return Ok(false);
            }
            let differs = current_value
                .as_ref()
                .is_none_or(|last| last.as_bytes() != value.as_bytes());
            if differs {
                self.remember(key, value);
                return Ok(true);
            }
        }
    }

    fn current(&self) -> Option<(&Datum, &Datum)> {
        self.last_key.as_ref().zip(self.last_value.as_ref())
    }
}

fn ensure_key(key: &[u8]) -> Result<(), RuntimeError> {
    if key.is_empty() {
        error!(target: "tristore::store", "cursor seek with an empty key");
        Err(RuntimeError::EmptyKey)
    } else {
        Ok(())
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    // The cursor is tested through the `Cursor` trait in
    // `crate::backend::tests`.
}
