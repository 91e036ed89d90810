//! Term <-> engine literal conversion.
//!
//! Both directions are total on their inputs and allocate everything
//! new: no output aliases any input, so either side can free its values
//! without consulting the other.

//---------------------------------------------------------------------------------------------------- Import
use crate::{query::literal::Literal, term::Term};

//---------------------------------------------------------------------------------------------------- term -> literal
/// Convert a term into an engine literal.
///
/// Resources become URI literals, literals become string literals
/// carrying their language and datatype, blanks become blank literals.
pub fn term_to_literal(term: &Term) -> Literal {
    match term {
        Term::Resource(uri) => Literal::Uri(uri.clone()),
        Term::Literal {
            lexical,
            language,
            datatype,
        } => Literal::String {
            lexical: lexical.clone(),
            language: language.clone(),
            datatype: datatype.clone(),
        },
        Term::Blank(id) => Literal::Blank(id.clone()),
    }
}

//---------------------------------------------------------------------------------------------------- literal -> term
/// Convert an engine literal into a term.
///
/// The typed kinds (string, integer, floating, boolean) all become
/// literal terms carrying their lexical form; only string literals can
/// carry a language tag.
pub fn literal_to_term(literal: &Literal) -> Term {
    match literal {
        Literal::Uri(uri) => Term::Resource(uri.clone()),
        Literal::Blank(id) => Term::Blank(id.clone()),
        Literal::String {
            lexical,
            language,
            datatype,
        } => Term::Literal {
            lexical: lexical.clone(),
            language: language.clone(),
            datatype: datatype.clone(),
        },
        Literal::Integer { lexical, datatype }
        | Literal::Floating { lexical, datatype }
        | Literal::Boolean { lexical, datatype } => Term::Literal {
            lexical: lexical.clone(),
            language: None,
            datatype: datatype.clone(),
        },
    }
}
