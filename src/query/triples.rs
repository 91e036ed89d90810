//! The triples source the query engine draws candidate statements from.

//---------------------------------------------------------------------------------------------------- Import
use std::rc::Rc;

use tracing::{debug, error};

use crate::{
    model::{Model, StatementStream},
    query::{
        convert::{literal_to_term, term_to_literal},
        literal::{PatternTerm, SharedVariable, TriplePattern},
        Query, QueryError,
    },
    statement::{Pattern, Statement},
    term::Term,
};

//---------------------------------------------------------------------------------------------------- TripleParts
bitflags::bitflags! {
    /// Which slots of a triple pattern a bind targets or produced.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct TripleParts: u8 {
        const SUBJECT   = 0b0001;
        const PREDICATE = 0b0010;
        const OBJECT    = 0b0100;
        const ORIGIN    = 0b1000;
    }
}

//---------------------------------------------------------------------------------------------------- TriplesSource
/// The factory entry point the engine calls once per executing query.
///
/// # Errors
/// [`QueryError::ExplicitSourceUnsupported`] when the query names an
/// explicit data source; the default model is the only supported source.
pub fn new_triples_source<'model>(
    query: &Query,
    model: &'model Model,
) -> Result<TriplesSource<'model>, QueryError> {
    if !query.data_sources().is_empty() {
        error!(
            target: "tristore::query",
            sources = query.data_sources().len(),
            "query names an explicit data source",
        );
        return Err(QueryError::ExplicitSourceUnsupported);
    }

    Ok(TriplesSource { model })
}

/// A triples source bound to one query execution over one model.
pub struct TriplesSource<'model> {
    model: &'model Model,
}

impl TriplesSource<'_> {
    /// Is this ground triple in the model?
    ///
    /// Every slot must be ground: a ground literal, or a variable that
    /// already has a value.
    ///
    /// # Errors
    /// [`QueryError::UnboundVariable`] for a valueless variable slot, or
    /// store failures.
    pub fn triple_present(&self, pattern: &TriplePattern) -> Result<bool, QueryError> {
        let statement = Statement::new(
            ground_term(&pattern.subject)?,
            ground_term(&pattern.predicate)?,
            ground_term(&pattern.object)?,
        );

        Ok(self.model.contains_statement(&statement)?)
    }

    /// Start matching a triple pattern against the model.
    ///
    /// Bound variables and ground literals become bound slots of the
    /// model query; unbound variables become wildcards. The underlying
    /// [`Model::find_statements`] picks the indexed access path.
    ///
    /// # Errors
    /// [`QueryError::NamedGraphsUnsupported`] when the pattern carries
    /// an origin slot, or store failures while opening the stream.
    pub fn new_triples_match(&self, pattern: &TriplePattern) -> Result<TriplesMatch, QueryError> {
        if pattern.origin.is_some() {
            error!(target: "tristore::query", "triple pattern has an origin; named graphs are not supported");
            return Err(QueryError::NamedGraphsUnsupported);
        }

        let (subject, subject_var) = slot_term(&pattern.subject);
        let (predicate, predicate_var) = slot_term(&pattern.predicate);
        let (object, object_var) = slot_term(&pattern.object);

        let query_pattern = Pattern::new(subject, predicate, object);
        debug!(target: "tristore::query", pattern = ?query_pattern, "new triples match");

        let stream = self.model.find_statements(&query_pattern)?;

        Ok(TriplesMatch {
            stream,
            _pattern: query_pattern,
            bindings: [subject_var, predicate_var, object_var, None],
        })
    }
}

/// A slot that must be ground, as a term.
fn ground_term(slot: &PatternTerm) -> Result<Term, QueryError> {
    match slot {
        PatternTerm::Ground(literal) => Ok(literal_to_term(literal)),
        PatternTerm::Variable(var) => match &var.borrow().value {
            Some(term) => Ok(term.clone()),
            None => {
                error!(target: "tristore::query", name = %var.borrow().name, "ground slot holds an unbound variable");
                Err(QueryError::UnboundVariable)
            }
        },
    }
}

/// Resolve one pattern slot into its model-query term (or wildcard) and
/// its binding target (or none).
fn slot_term(slot: &PatternTerm) -> (Option<Term>, Option<SharedVariable>) {
    match slot {
        PatternTerm::Ground(literal) => (Some(literal_to_term(literal)), None),
        PatternTerm::Variable(var) => {
            let value = var.borrow().value.clone();
            (value, Some(Rc::clone(var)))
        }
    }
}

//---------------------------------------------------------------------------------------------------- TriplesMatch
/// One live triple-pattern match.
///
/// Drop order: the stream goes first, then the query pattern, then the
/// match itself.
pub struct TriplesMatch {
    stream: StatementStream,
    /// The model query this match was built from; kept for the life of
    /// the match like the statement it mirrors.
    _pattern: Pattern,
    /// Binding targets for subject, predicate, object, origin. The
    /// origin slot is never populated; named graphs are rejected at
    /// construction.
    bindings: [Option<SharedVariable>; 4],
}

impl TriplesMatch {
    /// Bind the requested `parts` of the current statement into the
    /// pattern's variables, returning the parts actually bound.
    ///
    /// When one variable fills several slots, the statement's slots must
    /// be structurally equal terms; a mismatch returns an empty mask and
    /// the engine advances past this statement. Each variable is bound
    /// at most once per statement.
    ///
    /// # Errors
    /// Currently infallible at this layer; the signature leaves room for
    /// engines that treat binding as fallible.
    pub fn bind_match(&mut self, parts: TripleParts) -> Result<TripleParts, QueryError> {
        let Some(statement) = self.stream.current() else {
            return Ok(TripleParts::empty());
        };

        let mut result = TripleParts::empty();
        let [subject_var, predicate_var, object_var, _origin_var] = &self.bindings;

        if let Some(var) = subject_var {
            if parts.contains(TripleParts::SUBJECT) {
                set_value(var, &statement.subject);
                result |= TripleParts::SUBJECT;
            }
        }

        if let Some(var) = predicate_var {
            if parts.contains(TripleParts::PREDICATE) {
                if same_variable(subject_var, predicate_var) {
                    if statement.subject != statement.predicate {
                        return Ok(TripleParts::empty());
                    }
                    // Already bound through the subject.
                } else {
                    set_value(var, &statement.predicate);
                    result |= TripleParts::PREDICATE;
                }
            }
        }

        if let Some(var) = object_var {
            if parts.contains(TripleParts::OBJECT) {
                let mut bind = true;

                if same_variable(subject_var, object_var) {
                    if statement.subject != statement.object {
                        return Ok(TripleParts::empty());
                    }
                    bind = false;
                }
                // Skip when all three alias: subject already checked it.
                if same_variable(predicate_var, object_var)
                    && !same_variable(subject_var, predicate_var)
                {
                    if statement.predicate != statement.object {
                        return Ok(TripleParts::empty());
                    }
                    bind = false;
                }

                if bind {
                    set_value(var, &statement.object);
                    result |= TripleParts::OBJECT;
                }
            }
        }

        // The origin slot is never reported; named graphs are rejected
        // up front.

        Ok(result)
    }

    /// Advance to the next candidate statement.
    ///
    /// # Errors
    /// Store failures while stepping the stream.
    pub fn next_match(&mut self) -> Result<(), QueryError> {
        self.stream.advance().map_err(QueryError::from)?;
        Ok(())
    }

    /// `true` once the candidate stream is exhausted.
    pub fn is_end(&self) -> bool {
        self.stream.is_end()
    }
}

/// Bind a variable to a statement slot.
///
/// The value crosses the engine boundary: convert the term to an engine
/// literal and back so the variable holds a fresh, independently owned
/// term.
fn set_value(var: &SharedVariable, term: &Term) {
    var.borrow_mut().value = Some(literal_to_term(&term_to_literal(term)));
}

fn same_variable(a: &Option<SharedVariable>, b: &Option<SharedVariable>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        query::literal::{Literal, Variable},
        term::Uri,
        tests::tmp_model,
    };

    fn uri(s: &str) -> Literal {
        Literal::Uri(Uri::new(s))
    }

    fn fixture() -> (Model, tempfile::TempDir) {
        let (model, tempdir) = tmp_model();
        let add = |s: &str, p: &str, o: Term| {
            model
                .add_statement(&Statement::new(
                    Term::resource(s),
                    Term::resource(p),
                    o,
                ))
                .unwrap();
        };
        add("http://s", "http://p", Term::literal("o"));
        add("http://s", "http://p", Term::resource("http://s"));
        add("http://a", "http://p", Term::resource("http://a"));
        add("http://a", "http://p", Term::resource("http://b"));
        (model, tempdir)
    }

    #[test]
    fn explicit_source_is_refused() {
        let (model, _tempdir) = fixture();
        let query = Query::new("SELECT * WHERE { ?s ?p ?o }")
            .with_data_source(Uri::new("http://example.org/data.rdf"));

        assert!(matches!(
            new_triples_source(&query, &model),
            Err(QueryError::ExplicitSourceUnsupported)
        ));

        assert!(new_triples_source(&Query::default(), &model).is_ok());
    }

    #[test]
    fn origin_is_refused() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let pattern = TriplePattern::new(uri("http://s"), uri("http://p"), uri("http://o"))
            .with_origin(Variable::shared("g"));
        assert!(matches!(
            source.new_triples_match(&pattern),
            Err(QueryError::NamedGraphsUnsupported)
        ));
    }

    #[test]
    fn triple_present() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let present = TriplePattern::new(
            uri("http://s"),
            uri("http://p"),
            Literal::String {
                lexical: "o".into(),
                language: None,
                datatype: None,
            },
        );
        assert!(source.triple_present(&present).unwrap());

        let absent = TriplePattern::new(
            uri("http://s"),
            uri("http://p"),
            Literal::String {
                lexical: "o2".into(),
                language: None,
                datatype: None,
            },
        );
        assert!(!source.triple_present(&absent).unwrap());
    }

    #[test]
    fn triple_present_uses_variable_values() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let var = Variable::shared("x");
        let pattern = TriplePattern::new(
            PatternTerm::from(Rc::clone(&var)),
            uri("http://p"),
            Literal::String {
                lexical: "o".into(),
                language: None,
                datatype: None,
            },
        );

        // Unbound: refused.
        assert!(matches!(
            source.triple_present(&pattern),
            Err(QueryError::UnboundVariable)
        ));

        // Bound: its value is the slot.
        var.borrow_mut().value = Some(Term::resource("http://s"));
        assert!(source.triple_present(&pattern).unwrap());
    }

    /// A free-variable object enumerates the key's objects and binds
    /// the variable on each.
    #[test]
    fn match_binds_free_object() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let obj = Variable::shared("o");
        let pattern = TriplePattern::new(
            uri("http://s"),
            uri("http://p"),
            PatternTerm::from(Rc::clone(&obj)),
        );

        let mut found = Vec::new();
        let mut matcher = source.new_triples_match(&pattern).unwrap();
        while !matcher.is_end() {
            let bound = matcher.bind_match(TripleParts::OBJECT).unwrap();
            assert_eq!(bound, TripleParts::OBJECT);
            found.push(obj.borrow().value.clone().unwrap());
            matcher.next_match().unwrap();
        }
        found.sort();

        assert_eq!(
            found,
            [Term::resource("http://s"), Term::literal("o")]
        );
    }

    /// Scenario: pattern `(?x, <p>, ?x)` - only statements whose subject
    /// and object are structurally equal bind; others return an empty
    /// mask and the subject slot is bound once for the pair.
    #[test]
    fn aliased_subject_object() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let x = Variable::shared("x");
        let pattern = TriplePattern::new(
            PatternTerm::from(Rc::clone(&x)),
            uri("http://p"),
            PatternTerm::from(Rc::clone(&x)),
        );

        let mut hits = Vec::new();
        let mut misses = 0;
        let mut matcher = source.new_triples_match(&pattern).unwrap();
        while !matcher.is_end() {
            let bound = matcher
                .bind_match(TripleParts::SUBJECT | TripleParts::OBJECT)
                .unwrap();
            if bound.contains(TripleParts::SUBJECT) {
                // Object is carried by the subject binding, never
                // reported separately.
                assert_eq!(bound, TripleParts::SUBJECT);
                hits.push(x.borrow().value.clone().unwrap());
            } else {
                assert_eq!(bound, TripleParts::empty());
                misses += 1;
            }
            matcher.next_match().unwrap();
        }
        hits.sort();

        assert_eq!(hits, [Term::resource("http://a"), Term::resource("http://s")]);
        assert!(misses > 0);
    }

    /// Pattern `(?x, ?x, ?x)` matches only statements with three equal
    /// slots.
    #[test]
    fn aliased_all_three() {
        let (model, _tempdir) = tmp_model();
        let all_equal = Statement::new(
            Term::resource("http://e"),
            Term::resource("http://e"),
            Term::resource("http://e"),
        );
        model.add_statement(&all_equal).unwrap();
        model
            .add_statement(&Statement::new(
                Term::resource("http://e"),
                Term::resource("http://p"),
                Term::resource("http://e"),
            ))
            .unwrap();

        let source = new_triples_source(&Query::default(), &model).unwrap();
        let x = Variable::shared("x");
        let pattern = TriplePattern::new(
            PatternTerm::from(Rc::clone(&x)),
            PatternTerm::from(Rc::clone(&x)),
            PatternTerm::from(Rc::clone(&x)),
        );

        let mut hits = 0;
        let mut matcher = source.new_triples_match(&pattern).unwrap();
        while !matcher.is_end() {
            let bound = matcher.bind_match(TripleParts::all()).unwrap();
            if !bound.is_empty() {
                assert_eq!(bound, TripleParts::SUBJECT);
                assert_eq!(x.borrow().value, Some(Term::resource("http://e")));
                hits += 1;
            }
            matcher.next_match().unwrap();
        }

        assert_eq!(hits, 1);
    }

    /// Bound variables narrow the model query like ground slots.
    #[test]
    fn bound_variable_narrows() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let s = Variable::shared("s");
        s.borrow_mut().value = Some(Term::resource("http://a"));
        let o = Variable::shared("o");

        let pattern = TriplePattern::new(
            PatternTerm::from(Rc::clone(&s)),
            uri("http://p"),
            PatternTerm::from(Rc::clone(&o)),
        );

        let mut count = 0;
        let mut matcher = source.new_triples_match(&pattern).unwrap();
        while !matcher.is_end() {
            let bound = matcher.bind_match(TripleParts::all()).unwrap();
            assert!(bound.contains(TripleParts::OBJECT));
            count += 1;
            matcher.next_match().unwrap();
        }

        assert_eq!(count, 2);
    }

    /// An exhausted match binds nothing.
    #[test]
    fn bind_after_end_is_empty() {
        let (model, _tempdir) = fixture();
        let source = new_triples_source(&Query::default(), &model).unwrap();

        let pattern = TriplePattern::new(
            uri("http://nobody"),
            uri("http://p"),
            Variable::shared("o"),
        );
        let mut matcher = source.new_triples_match(&pattern).unwrap();
        assert!(matcher.is_end());
        assert_eq!(
            matcher.bind_match(TripleParts::all()).unwrap(),
            TripleParts::empty()
        );
    }
}
