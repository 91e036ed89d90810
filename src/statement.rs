//! Statements and statement patterns.

//---------------------------------------------------------------------------------------------------- Import
use std::fmt;

use crate::term::Term;

//---------------------------------------------------------------------------------------------------- Statement
/// A ground triple: subject, predicate, object.
///
/// By RDF convention the subject is a resource or blank node and the
/// predicate a resource; this layer stores whatever terms it is given
/// and leaves enforcement to the producers (parsers, query engines).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    /// Create a statement from three terms.
    pub const fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

//---------------------------------------------------------------------------------------------------- Pattern
/// A triple pattern: each slot is a ground term or a wildcard (`None`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl Pattern {
    /// Create a pattern from three optional terms.
    pub const fn new(subject: Option<Term>, predicate: Option<Term>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Does `statement` satisfy every bound slot of this pattern?
    pub fn matches(&self, statement: &Statement) -> bool {
        fn slot(bound: Option<&Term>, term: &Term) -> bool {
            bound.is_none_or(|bound| bound == term)
        }

        slot(self.subject.as_ref(), &statement.subject)
            && slot(self.predicate.as_ref(), &statement.predicate)
            && slot(self.object.as_ref(), &statement.object)
    }

    /// `true` when every slot is bound.
    pub const fn is_ground(&self) -> bool {
        self.subject.is_some() && self.predicate.is_some() && self.object.is_some()
    }
}
