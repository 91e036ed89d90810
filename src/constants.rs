//! General constants used throughout `tristore`.

//---------------------------------------------------------------------------------------------------- Constants
/// The suffix appended to a store identifier to form its on-disk file name.
///
/// Opening a store with the identifier `/tmp/shapes` creates/opens the
/// file `/tmp/shapes.db`.
pub const STORE_FILE_SUFFIX: &str = ".db";

/// The RDF syntax namespace.
///
/// Ordinal predicates (`rdf:_1`, `rdf:_2`, ...) are minted under this
/// namespace when a query engine yields ordinal identifiers.
pub const RDF_SYNTAX_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Datatype URI used to represent XML literals.
pub const XML_LITERAL_DATATYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

cfg_if::cfg_if! {
    if #[cfg(feature = "redb")] {
        /// Static string of the `crate` being used as the store backend.
        pub const STORE_BACKEND: &str = "redb";
    }
}
