//! Query-engine bridge.
//!
//! The query engine itself (parser, planner, executor) is an external
//! collaborator; this module provides the two surfaces it touches:
//!
//! - the *triples source* ([`triples`]) the engine pulls candidate
//!   statements from while executing a query, and
//! - the *result adapter* ([`results`]) that turns the engine's result
//!   handle back into terms and statements for the caller.
//!
//! [`convert`] carries values across the boundary: every conversion
//! allocates fresh, independently owned output in both directions.

pub mod convert;
pub mod literal;
pub mod results;
pub mod triples;

pub use literal::{Literal, PatternTerm, SharedVariable, TriplePattern, Variable};
pub use results::{
    EngineId, EngineResults, EngineTriple, QueryResults, ResultStatementStream, ResultsKind,
};
pub use triples::{new_triples_source, TripleParts, TriplesMatch, TriplesSource};

//---------------------------------------------------------------------------------------------------- Import
use crate::{error::RuntimeError, term::Uri};

//---------------------------------------------------------------------------------------------------- Query
/// A prepared query, as far as this layer needs to know it.
///
/// The engine owns parsing and execution; this descriptor carries the
/// query text and what the engine reports about it, notably any
/// explicitly named data sources (FROM-style clauses), which the triples
/// source refuses.
#[derive(Clone, Debug, Default)]
pub struct Query {
    query_string: String,
    base_uri: Option<Uri>,
    data_sources: Vec<Uri>,
}

impl Query {
    /// Describe a query from its text.
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            base_uri: None,
            data_sources: Vec::new(),
        }
    }

    /// Attach a base URI.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: Uri) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// Record an explicitly named data source.
    #[must_use]
    pub fn with_data_source(mut self, source: Uri) -> Self {
        self.data_sources.push(source);
        self
    }

    /// The query text.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// The base URI, if any.
    pub fn base_uri(&self) -> Option<&Uri> {
        self.base_uri.as_ref()
    }

    /// Explicitly named data sources, in declaration order.
    pub fn data_sources(&self) -> &[Uri] {
        &self.data_sources
    }
}

//---------------------------------------------------------------------------------------------------- QueryError
/// Errors from the query bridge.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// The query names an explicit data source; only the default model
    /// is supported.
    #[error("queries with an explicit data source are not supported")]
    ExplicitSourceUnsupported,

    /// The triple pattern carries an origin/context slot; named graphs
    /// are not supported.
    #[error("named graphs are not supported")]
    NamedGraphsUnsupported,

    /// A slot that must be ground references a variable with no value.
    #[error("triple slot references an unbound variable")]
    UnboundVariable,

    /// An engine identifier kind appeared in a statement position it
    /// cannot fill (e.g. an ordinal subject).
    #[error("identifier kind not usable as statement {0}")]
    UnexpectedIdentifier(&'static str),

    /// The underlying model/store failed.
    #[error(transparent)]
    Store(#[from] RuntimeError),
}
