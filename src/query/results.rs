//! Adapters over a query engine's result handle.
//!
//! The engine produces one of three result shapes - variable-binding
//! rows, a single boolean, or a stream of constructed triples - plus a
//! serializer. [`QueryResults`] wraps the engine handle and hands the
//! caller terms and statements instead of engine values.

//---------------------------------------------------------------------------------------------------- Import
use std::io;

use tracing::error;

use crate::{
    constants::{RDF_SYNTAX_NS, XML_LITERAL_DATATYPE},
    query::{convert::literal_to_term, literal::Literal, QueryError},
    statement::Statement,
    term::{Term, Uri},
};

//---------------------------------------------------------------------------------------------------- EngineResults
/// The shape of a result set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResultsKind {
    /// Variable-binding rows (SELECT-style).
    Bindings,
    /// A single boolean (ASK-style).
    Boolean,
    /// A stream of triples (CONSTRUCT/DESCRIBE-style).
    Graph,
}

/// An identifier as a query engine emits it inside constructed triples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineId {
    /// An anonymous (blank) node.
    Anonymous(String),
    /// A resource URI.
    Resource(Uri),
    /// A literal with optional language and datatype.
    Literal {
        lexical: String,
        language: Option<String>,
        datatype: Option<Uri>,
    },
    /// An XML literal.
    XmlLiteral {
        lexical: String,
        language: Option<String>,
    },
    /// An ordinal (`rdf:_N`) identifier.
    Ordinal(u32),
}

/// A triple as a query engine emits it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineTriple {
    pub subject: EngineId,
    pub predicate: EngineId,
    pub object: EngineId,
}

/// The result handle a query engine exposes.
///
/// This is the contract consumed from the engine; the engine owns
/// iteration state and serialization.
pub trait EngineResults {
    /// The shape of this result set.
    fn kind(&self) -> ResultsKind;

    /// Number of binding rows returned so far.
    fn count(&self) -> usize;

    /// `true` once the rows are exhausted.
    fn finished(&self) -> bool;

    /// Advance to the next binding row; `false` at the end.
    fn next(&mut self) -> bool;

    /// Number of bound variables per row.
    fn bindings_count(&self) -> usize;

    /// The name of binding `offset`.
    fn binding_name(&self, offset: usize) -> Option<&str>;

    /// The current row's value for binding `offset`.
    fn binding_value(&self, offset: usize) -> Option<Literal>;

    /// The current row's value for the named binding.
    fn binding_value_by_name(&self, name: &str) -> Option<Literal>;

    /// The boolean result, for [`ResultsKind::Boolean`] sets.
    fn boolean(&self) -> Option<bool>;

    /// Pull the next constructed triple, for [`ResultsKind::Graph`] sets.
    fn next_triple(&mut self) -> Option<EngineTriple>;

    /// Serialize the result set to `sink` under `format_uri`.
    ///
    /// # Errors
    /// Engine serialization failures surface as [`io::Error`].
    fn write(
        &mut self,
        sink: &mut dyn io::Write,
        format_uri: &Uri,
        base_uri: Option<&Uri>,
    ) -> io::Result<()>;
}

//---------------------------------------------------------------------------------------------------- QueryResults
/// Caller-facing view of an engine result handle.
pub struct QueryResults<R: EngineResults> {
    inner: R,
}

impl<R: EngineResults> QueryResults<R> {
    /// Wrap an engine result handle.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The shape of this result set.
    pub fn kind(&self) -> ResultsKind {
        self.inner.kind()
    }

    /// `true` for binding rows.
    pub fn is_bindings(&self) -> bool {
        self.inner.kind() == ResultsKind::Bindings
    }

    /// `true` for a boolean result.
    pub fn is_boolean(&self) -> bool {
        self.inner.kind() == ResultsKind::Boolean
    }

    /// `true` for a triple stream.
    pub fn is_graph(&self) -> bool {
        self.inner.kind() == ResultsKind::Graph
    }

    /// Number of rows returned so far.
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Advance to the next row; `false` at the end.
    pub fn next(&mut self) -> bool {
        self.inner.next()
    }

    /// `true` once the rows are exhausted.
    pub fn finished(&self) -> bool {
        self.inner.finished()
    }

    /// The binding names, in column order.
    pub fn binding_names(&self) -> Vec<String> {
        (0..self.inner.bindings_count())
            .filter_map(|i| self.inner.binding_name(i))
            .map(str::to_owned)
            .collect()
    }

    /// The current row's values as terms, in column order.
    ///
    /// Unbound columns are `None`. The caller owns every term.
    pub fn binding_values(&self) -> Vec<Option<Term>> {
        (0..self.inner.bindings_count())
            .map(|i| self.binding_value(i))
            .collect()
    }

    /// The current row's value for column `offset`, as a term.
    pub fn binding_value(&self, offset: usize) -> Option<Term> {
        self.inner
            .binding_value(offset)
            .map(|literal| literal_to_term(&literal))
    }

    /// The current row's value for the named column, as a term.
    pub fn binding_value_by_name(&self, name: &str) -> Option<Term> {
        self.inner
            .binding_value_by_name(name)
            .map(|literal| literal_to_term(&literal))
    }

    /// The boolean result, for ASK-style queries.
    pub fn boolean(&self) -> Option<bool> {
        self.inner.boolean()
    }

    /// Serialize the result set to `sink` under `format_uri`.
    ///
    /// # Errors
    /// Engine serialization failures.
    pub fn write_to(
        &mut self,
        sink: &mut dyn io::Write,
        format_uri: &Uri,
        base_uri: Option<&Uri>,
    ) -> io::Result<()> {
        self.inner.write(sink, format_uri, base_uri)
    }

    /// Serialize the result set into a byte buffer.
    ///
    /// # Errors
    /// Engine serialization failures.
    pub fn to_bytes(&mut self, format_uri: &Uri, base_uri: Option<&Uri>) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.inner.write(&mut buffer, format_uri, base_uri)?;
        Ok(buffer)
    }

    /// Turn a graph result into a statement stream, positioned on its
    /// first statement.
    ///
    /// # Errors
    /// An undecodable first triple; the stream is not returned.
    pub fn into_statement_stream(self) -> Result<ResultStatementStream<R>, QueryError> {
        let mut stream = ResultStatementStream {
            results: self.inner,
            statement: None,
            finished: false,
        };
        stream.advance()?;
        Ok(stream)
    }
}

//---------------------------------------------------------------------------------------------------- ResultStatementStream
/// Statements out of a graph-shaped result set.
///
/// The current statement is replaced on each advance and cleared on
/// every failure path.
pub struct ResultStatementStream<R: EngineResults> {
    results: R,
    statement: Option<Statement>,
    finished: bool,
}

impl<R: EngineResults> ResultStatementStream<R> {
    /// The statement under the stream, if any.
    pub fn current(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    /// `true` once the triples are exhausted.
    pub const fn is_end(&self) -> bool {
        self.statement.is_none()
    }

    /// Pull the next triple; `Ok(false)` at the end.
    ///
    /// # Errors
    /// An engine triple that does not map to a statement; the current
    /// statement is cleared before the error is returned.
    pub fn advance(&mut self) -> Result<bool, QueryError> {
        // Cleared up front: no failure path may leave a stale statement.
        self.statement = None;

        if self.finished {
            return Ok(false);
        }

        let Some(triple) = self.results.next_triple() else {
            self.finished = true;
            return Ok(false);
        };

        self.statement = Some(statement_from_triple(&triple)?);
        Ok(true)
    }
}

//---------------------------------------------------------------------------------------------------- Identifier mapping
/// Map an engine triple to a statement, kind by kind.
fn statement_from_triple(triple: &EngineTriple) -> Result<Statement, QueryError> {
    let subject = match &triple.subject {
        EngineId::Anonymous(id) => Term::blank(id.clone()),
        EngineId::Resource(uri) => Term::Resource(uri.clone()),
        other => return Err(unexpected("subject", other)),
    };

    let predicate = match &triple.predicate {
        EngineId::Resource(uri) => Term::Resource(uri.clone()),
        EngineId::Ordinal(n) => Term::resource(format!("{RDF_SYNTAX_NS}_{n}")),
        other => return Err(unexpected("predicate", other)),
    };

    let object = match &triple.object {
        EngineId::Anonymous(id) => Term::blank(id.clone()),
        EngineId::Resource(uri) => Term::Resource(uri.clone()),
        EngineId::Literal {
            lexical,
            language,
            datatype,
        } => Term::typed_literal(lexical.clone(), language.clone(), datatype.clone()),
        EngineId::XmlLiteral { lexical, language } => Term::typed_literal(
            lexical.clone(),
            language.clone(),
            Some(Uri::new(XML_LITERAL_DATATYPE)),
        ),
        other @ EngineId::Ordinal(_) => return Err(unexpected("object", other)),
    };

    Ok(Statement::new(subject, predicate, object))
}

#[cold]
fn unexpected(position: &'static str, id: &EngineId) -> QueryError {
    error!(target: "tristore::query", ?id, "identifier kind not usable as statement {}", position);
    QueryError::UnexpectedIdentifier(position)
}
