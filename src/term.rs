//! RDF terms; `Uri` and `Term`.

//---------------------------------------------------------------------------------------------------- Import
use std::fmt;

//---------------------------------------------------------------------------------------------------- Uri
/// A URI string.
///
/// No validation or interning happens here; URIs arrive from a parser
/// or a query engine that has already dealt with syntax.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uri(String);

impl Uri {
    /// Create a URI from a string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uri {
    fn from(uri: &str) -> Self {
        Self(uri.to_owned())
    }
}

impl From<String> for Uri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

//---------------------------------------------------------------------------------------------------- Term
/// A polymorphic RDF term.
///
/// Every term independently owns its contents; nothing is shared
/// between terms, statements, or converter calls. Equality is
/// structural.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A resource, identified by URI.
    Resource(Uri),

    /// A literal: lexical form plus optional language tag and datatype.
    Literal {
        /// The lexical form.
        lexical: String,
        /// Optional language tag, e.g. `en-gb`.
        language: Option<String>,
        /// Optional datatype URI.
        datatype: Option<Uri>,
    },

    /// A blank node identifier.
    Blank(String),
}

impl Term {
    /// A resource term.
    pub fn resource(uri: impl Into<Uri>) -> Self {
        Self::Resource(uri.into())
    }

    /// A plain literal with no language or datatype.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// A literal with optional language tag and datatype URI.
    pub fn typed_literal(
        lexical: impl Into<String>,
        language: Option<String>,
        datatype: Option<Uri>,
    ) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            language,
            datatype,
        }
    }

    /// A blank node term.
    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    /// `true` for [`Term::Resource`].
    pub const fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }

    /// `true` for [`Term::Literal`].
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// `true` for [`Term::Blank`].
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

impl fmt::Display for Term {
    /// N-Triples-like rendering; used by logs and error messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(uri) => write!(f, "<{uri}>"),
            Self::Literal {
                lexical,
                language,
                datatype,
            } => {
                write!(f, "\"{lexical}\"")?;
                if let Some(language) = language {
                    write!(f, "@{language}")?;
                }
                if let Some(datatype) = datatype {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
            Self::Blank(id) => write!(f, "_:{id}"),
        }
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn structural_equality() {
        assert_eq!(Term::resource("http://a"), Term::resource("http://a"));
        assert_ne!(Term::resource("http://a"), Term::literal("http://a"));
        assert_ne!(
            Term::literal("x"),
            Term::typed_literal("x", Some("en".into()), None)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Term::resource("http://a").to_string(), "<http://a>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(
            Term::typed_literal("chat", Some("fr".into()), Some("http://t".into())).to_string(),
            "\"chat\"@fr^^<http://t>"
        );
    }
}
