//! Trackfilter: a lenient search-query engine for music track metadata.
//!
//! A query such as `artist:queen -rating:<3 (genre:rock OR genre:metal)` is parsed into
//! an immutable boolean tree, then evaluated once per candidate record. The engine is
//! generic over the record type: each record shape supplies a [`FieldRegistry`] naming
//! its columns, their kinds, and how to read them.
//!
//! # Architecture
//! - Field registry (names, kinds, accessors)
//! - Comparators (substring, text, integer, float, plus duration/rating decorators)
//! - Recursive-descent parser that never rejects input
//! - Expression tree evaluation
//! - A hash-keyed cache of the last parsed filter

mod schema;
mod expr;
mod compiler;
mod parser;
mod filter;
mod cache;
mod context;
mod types;
mod comparator;

pub use schema::*;
pub use expr::*;
pub use compiler::*;
pub use parser::*;
pub use filter::*;
pub use cache::*;
pub use context::*;
pub use types::*;
pub use comparator::*;

/// Errors from configuring a registry or populating a [`FilterContext`].
///
/// Parsing and matching never fail.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Duplicate field: {0}")]
    DuplicateField(String),
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("No field takes part in bare-term search")]
    NoSearchableFields,
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;
