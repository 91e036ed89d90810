//! The statement model; `Model` and `StatementStream`.
//!
//! A [`Model`] persists statements into three index stores, each an
//! ordered multimap keyed by two encoded terms with the third as the
//! value:
//!
//! | store  | key                  | value     |
//! |--------|----------------------|-----------|
//! | `sp2o` | subject, predicate   | object    |
//! | `po2s` | predicate, object    | subject   |
//! | `so2p` | subject, object      | predicate |
//!
//! [`Model::find_statements`] picks whichever index covers the bound
//! slots of a pattern and falls back to a filtered full scan of `sp2o`
//! when none does.

pub(crate) mod encode;

//---------------------------------------------------------------------------------------------------- Import
use std::path::Path;

use tracing::debug;

use crate::{
    backend::{ConcreteCursor, ConcreteStore},
    config::{Config, StoreMode, SyncMode},
    cursor::Cursor,
    error::{InitError, RuntimeError},
    statement::{Pattern, Statement},
    store::Store,
    term::Term,
};

//---------------------------------------------------------------------------------------------------- Model
/// A graph model persisting statements into index stores.
pub struct Model {
    /// (subject, predicate) -> object
    sp2o: ConcreteStore,
    /// (predicate, object) -> subject
    po2s: ConcreteStore,
    /// (subject, object) -> predicate
    so2p: ConcreteStore,
}

impl Model {
    /// Open (and maybe create) a model under `directory`.
    ///
    /// Three store files are created: `<name>-sp2o.db`, `<name>-po2s.db`
    /// and `<name>-so2p.db`, writable with default sync.
    ///
    /// # Errors
    /// Any index store failing to open fails the model.
    pub fn open(directory: &Path, name: &str) -> Result<Self, InitError> {
        Self::open_with(
            directory,
            name,
            StoreMode::WRITE | StoreMode::CREATE,
            SyncMode::default(),
        )
    }

    /// [`Model::open`] with explicit mode flags and sync mode.
    ///
    /// # Errors
    /// Any index store failing to open fails the model.
    pub fn open_with(
        directory: &Path,
        name: &str,
        mode: StoreMode,
        sync_mode: SyncMode,
    ) -> Result<Self, InitError> {
        let open = |index: &str| {
            let config = Config::new(directory.join(format!("{name}-{index}")))
                .with_mode(mode)
                .with_sync_mode(sync_mode);
            ConcreteStore::open(config)
        };

        Ok(Self {
            sp2o: open("sp2o")?,
            po2s: open("po2s")?,
            so2p: open("so2p")?,
        })
    }

    /// Add a statement to every index.
    ///
    /// Adding the same statement twice stores it twice; [`Model::size`]
    /// counts records, while enumeration collapses duplicates.
    ///
    /// # Errors
    /// The first failed index write aborts the add.
    pub fn add_statement(&self, statement: &Statement) -> Result<(), RuntimeError> {
        let Statement {
            subject: s,
            predicate: p,
            object: o,
        } = statement;

        self.sp2o
            .put(&encode::encode_pair(s, p), &encode::encode_one(o))?;
        self.po2s
            .put(&encode::encode_pair(p, o), &encode::encode_one(s))?;
        self.so2p
            .put(&encode::encode_pair(s, o), &encode::encode_one(p))?;
        Ok(())
    }

    /// Remove one record of this statement from every index.
    ///
    /// # Errors
    /// [`RuntimeError::KeyNotFound`] if the model does not contain the
    /// statement.
    pub fn remove_statement(&self, statement: &Statement) -> Result<(), RuntimeError> {
        let Statement {
            subject: s,
            predicate: p,
            object: o,
        } = statement;

        self.sp2o
            .delete_key_value(&encode::encode_pair(s, p), &encode::encode_one(o))?;
        self.po2s
            .delete_key_value(&encode::encode_pair(p, o), &encode::encode_one(s))?;
        self.so2p
            .delete_key_value(&encode::encode_pair(s, o), &encode::encode_one(p))?;
        Ok(())
    }

    /// Does the model contain this statement (under structural term
    /// equality)?
    ///
    /// # Errors
    /// Store failures only; "no" is `Ok(false)`.
    pub fn contains_statement(&self, statement: &Statement) -> Result<bool, RuntimeError> {
        let key = encode::encode_pair(&statement.subject, &statement.predicate);
        let value = encode::encode_one(&statement.object);
        self.sp2o.exists(&key, Some(&value))
    }

    /// Number of statement records, duplicates counted.
    ///
    /// # Errors
    /// Store failures.
    pub fn size(&self) -> Result<u64, RuntimeError> {
        self.sp2o.values_count()
    }

    /// Find all statements matching `pattern` (`None` slots are
    /// wildcards).
    ///
    /// The stream holds its own read snapshot and is positioned on its
    /// first statement, if any.
    ///
    /// # Errors
    /// Store failures while opening or priming the stream.
    pub fn find_statements(&self, pattern: &Pattern) -> Result<StatementStream, RuntimeError> {
        let inner = match (&pattern.subject, &pattern.predicate, &pattern.object) {
            // Fully ground: containment decides a 0/1-statement stream.
            (Some(s), Some(p), Some(o)) => {
                let statement = Statement::new(s.clone(), p.clone(), o.clone());
                let found = self.contains_statement(&statement)?;
                Inner::Single(found.then_some(statement))
            }
            (Some(s), Some(p), None) => Inner::values(
                self.sp2o.cursor()?,
                encode::encode_pair(s, p),
                s.clone(),
                p.clone(),
                DecodedSlot::Object,
            ),
            (None, Some(p), Some(o)) => Inner::values(
                self.po2s.cursor()?,
                encode::encode_pair(p, o),
                p.clone(),
                o.clone(),
                DecodedSlot::Subject,
            ),
            (Some(s), None, Some(o)) => Inner::values(
                self.so2p.cursor()?,
                encode::encode_pair(s, o),
                s.clone(),
                o.clone(),
                DecodedSlot::Predicate,
            ),
            // One or zero bound slots: filtered full scan.
            _ => {
                debug!(target: "tristore::store", "pattern covered by no index, full scan");
                Inner::Scan {
                    cursor: self.sp2o.cursor()?,
                    pattern: pattern.clone(),
                    started: false,
                }
            }
        };

        StatementStream::new(inner)
    }

    /// Durably flush every index store.
    ///
    /// # Errors
    /// The first failed flush is returned.
    pub fn sync(&self) -> Result<(), RuntimeError> {
        self.sp2o.sync()?;
        self.po2s.sync()?;
        self.so2p.sync()?;
        Ok(())
    }

    /// Close every index store. Idempotent, like [`Store::close`].
    ///
    /// # Errors
    /// The first failed close is returned; all stores are closed
    /// regardless.
    pub fn close(&mut self) -> Result<(), RuntimeError> {
        let results = [
            self.sp2o.close(),
            self.po2s.close(),
            self.so2p.close(),
        ];
        results.into_iter().collect()
    }
}

//---------------------------------------------------------------------------------------------------- StatementStream
/// Which statement slot an index record's value decodes into.
enum DecodedSlot {
    Subject,
    Predicate,
    Object,
}

enum Inner {
    /// A fully-ground lookup: at most one statement.
    Single(Option<Statement>),

    /// Distinct values of one index key.
    Values {
        cursor: ConcreteCursor,
        key: Vec<u8>,
        fixed: (Term, Term),
        slot: DecodedSlot,
        started: bool,
    },

    /// Filtered walk over every `sp2o` record.
    Scan {
        cursor: ConcreteCursor,
        pattern: Pattern,
        started: bool,
    },
}

impl Inner {
    fn values(
        cursor: ConcreteCursor,
        key: Vec<u8>,
        fixed_a: Term,
        fixed_b: Term,
        slot: DecodedSlot,
    ) -> Self {
        Self::Values {
            cursor,
            key,
            fixed: (fixed_a, fixed_b),
            slot,
            started: false,
        }
    }
}

/// A stream of statements out of a [`Model`].
///
/// The stream owns a read snapshot of the index it walks; statements
/// added after [`Model::find_statements`] are not observed. The current
/// statement stays readable until the next [`StatementStream::advance`].
pub struct StatementStream {
    inner: Inner,
    current: Option<Statement>,
}

impl StatementStream {
    /// Build and position on the first statement.
    fn new(inner: Inner) -> Result<Self, RuntimeError> {
        let mut stream = Self {
            inner,
            current: None,
        };
        stream.advance()?;
        Ok(stream)
    }

    /// The statement under the stream, if any.
    pub fn current(&self) -> Option<&Statement> {
        self.current.as_ref()
    }

    /// `true` once the stream is exhausted.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Move to the next statement; `Ok(false)` at the end.
    ///
    /// # Errors
    /// Store read failures or corrupt index records; the current
    /// statement is cleared either way.
    pub fn advance(&mut self) -> Result<bool, RuntimeError> {
        self.current = None;
        self.current = self.step()?;
        Ok(self.current.is_some())
    }

    fn step(&mut self) -> Result<Option<Statement>, RuntimeError> {
        match &mut self.inner {
            Inner::Single(statement) => Ok(statement.take()),

            Inner::Values {
                cursor,
                key,
                fixed,
                slot,
                started,
            } => {
                let found = if *started {
                    cursor.next_value_of_current_key()?
                } else {
                    *started = true;
                    cursor.seek_key(key)?
                };
                if !found {
                    return Ok(None);
                }

                let Some((_, value)) = cursor.current() else {
                    return Ok(None);
                };
                let decoded = encode::decode_one(value)?;
                let (a, b) = (fixed.0.clone(), fixed.1.clone());
                Ok(Some(match slot {
                    DecodedSlot::Object => Statement::new(a, b, decoded),
                    DecodedSlot::Subject => Statement::new(decoded, a, b),
                    DecodedSlot::Predicate => Statement::new(a, decoded, b),
                }))
            }

            Inner::Scan {
                cursor,
                pattern,
                started,
            } => loop {
                let found = if *started {
                    cursor.next_record()?
                } else {
                    *started = true;
                    cursor.seek_first()?
                };
                if !found {
                    return Ok(None);
                }

                let Some((key, value)) = cursor.current() else {
                    return Ok(None);
                };
                let (subject, predicate) = encode::decode_pair(key)?;
                let object = encode::decode_one(value)?;
                let statement = Statement::new(subject, predicate, object);
                if pattern.matches(&statement) {
                    return Ok(Some(statement));
                }
            },
        }
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tests::tmp_model;

    fn st(s: &str, p: &str, o: Term) -> Statement {
        Statement::new(Term::resource(s), Term::resource(p), o)
    }

    fn fixture() -> (Model, tempfile::TempDir) {
        let (model, tempdir) = tmp_model();
        model
            .add_statement(&st("http://s", "http://p", Term::literal("o")))
            .unwrap();
        model
            .add_statement(&st("http://s", "http://p", Term::literal("o2")))
            .unwrap();
        model
            .add_statement(&st("http://s", "http://q", Term::resource("http://s")))
            .unwrap();
        model
            .add_statement(&st("http://x", "http://p", Term::literal("o")))
            .unwrap();
        (model, tempdir)
    }

    fn collect(mut stream: StatementStream) -> Vec<Statement> {
        let mut out = Vec::new();
        while let Some(statement) = stream.current() {
            out.push(statement.clone());
            stream.advance().unwrap();
        }
        assert!(stream.is_end());
        out
    }

    #[test]
    fn contains() {
        let (model, _tempdir) = fixture();

        assert!(model
            .contains_statement(&st("http://s", "http://p", Term::literal("o")))
            .unwrap());
        assert!(!model
            .contains_statement(&st("http://s", "http://p", Term::literal("o3")))
            .unwrap());
        // A resource object is not a literal object.
        assert!(!model
            .contains_statement(&st("http://s", "http://p", Term::resource("o")))
            .unwrap());
    }

    #[test]
    fn size_counts_records() {
        let (model, _tempdir) = fixture();
        assert_eq!(model.size().unwrap(), 4);

        model
            .add_statement(&st("http://s", "http://p", Term::literal("o")))
            .unwrap();
        assert_eq!(model.size().unwrap(), 5);
    }

    #[test]
    fn remove() {
        let (model, _tempdir) = fixture();
        let statement = st("http://s", "http://p", Term::literal("o"));

        model.remove_statement(&statement).unwrap();
        assert!(!model.contains_statement(&statement).unwrap());
        assert_eq!(model.size().unwrap(), 3);

        assert!(matches!(
            model.remove_statement(&statement),
            Err(RuntimeError::KeyNotFound)
        ));
    }

    #[test]
    fn find_by_subject_predicate() {
        let (model, _tempdir) = fixture();

        let pattern = Pattern::new(
            Some(Term::resource("http://s")),
            Some(Term::resource("http://p")),
            None,
        );
        let mut objects: Vec<Term> = collect(model.find_statements(&pattern).unwrap())
            .into_iter()
            .map(|st| st.object)
            .collect();
        objects.sort();

        assert_eq!(objects, [Term::literal("o"), Term::literal("o2")]);
    }

    #[test]
    fn find_by_predicate_object() {
        let (model, _tempdir) = fixture();

        let pattern = Pattern::new(
            None,
            Some(Term::resource("http://p")),
            Some(Term::literal("o")),
        );
        let mut subjects: Vec<Term> = collect(model.find_statements(&pattern).unwrap())
            .into_iter()
            .map(|st| st.subject)
            .collect();
        subjects.sort();

        assert_eq!(
            subjects,
            [Term::resource("http://s"), Term::resource("http://x")]
        );
    }

    #[test]
    fn find_by_subject_object() {
        let (model, _tempdir) = fixture();

        let pattern = Pattern::new(
            Some(Term::resource("http://s")),
            None,
            Some(Term::resource("http://s")),
        );
        let statements = collect(model.find_statements(&pattern).unwrap());

        assert_eq!(
            statements,
            [st("http://s", "http://q", Term::resource("http://s"))]
        );
    }

    #[test]
    fn find_ground() {
        let (model, _tempdir) = fixture();

        let hit = st("http://s", "http://p", Term::literal("o"));
        let pattern = Pattern::new(
            Some(hit.subject.clone()),
            Some(hit.predicate.clone()),
            Some(hit.object.clone()),
        );
        assert_eq!(collect(model.find_statements(&pattern).unwrap()), [hit]);

        let pattern = Pattern::new(
            Some(Term::resource("http://s")),
            Some(Term::resource("http://p")),
            Some(Term::literal("nope")),
        );
        let stream = model.find_statements(&pattern).unwrap();
        assert!(stream.is_end());
        assert!(collect(stream).is_empty());
    }

    #[test]
    fn find_scan() {
        let (model, _tempdir) = fixture();

        // Everything.
        let all = collect(model.find_statements(&Pattern::default()).unwrap());
        assert_eq!(all.len(), 4);

        // Subject only: residual filter over the scan.
        let pattern = Pattern::new(Some(Term::resource("http://s")), None, None);
        let for_s = collect(model.find_statements(&pattern).unwrap());
        assert_eq!(for_s.len(), 3);
        assert!(for_s.iter().all(|st| st.subject == Term::resource("http://s")));

        // Object only.
        let pattern = Pattern::new(None, None, Some(Term::literal("o")));
        let for_o = collect(model.find_statements(&pattern).unwrap());
        assert_eq!(for_o.len(), 2);
    }

    /// A duplicated statement is stored twice but enumerates once on an
    /// index walk (distinct values of one key).
    #[test]
    fn duplicate_statements_collapse_on_index_walk() {
        let (model, _tempdir) = tmp_model();
        let statement = st("http://s", "http://p", Term::literal("o"));
        model.add_statement(&statement).unwrap();
        model.add_statement(&statement).unwrap();
        assert_eq!(model.size().unwrap(), 2);

        let pattern = Pattern::new(
            Some(statement.subject.clone()),
            Some(statement.predicate.clone()),
            None,
        );
        assert_eq!(collect(model.find_statements(&pattern).unwrap()), [statement]);
    }

    /// Streams read the snapshot taken at `find_statements` time.
    #[test]
    fn stream_snapshot() {
        let (model, _tempdir) = fixture();

        let stream = model.find_statements(&Pattern::default()).unwrap();
        model
            .add_statement(&st("http://new", "http://p", Term::literal("late")))
            .unwrap();

        assert_eq!(collect(stream).len(), 4);
    }

    #[test]
    fn close_is_idempotent() {
        let (mut model, _tempdir) = tmp_model();
        model.close().unwrap();
        model.close().unwrap();
        assert!(matches!(model.size(), Err(RuntimeError::Closed)));
    }
}
