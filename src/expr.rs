//! Expression module: the parsed filter tree and its evaluation.
//!
//! Trees are built once by the parser and never mutated. Leaves refer to fields by
//! [`FieldId`], so a tree is evaluated against the registry it was parsed with.

use crate::comparator::Comparator;
use crate::schema::{FieldId, FieldRegistry};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Matches every record.
    True,
    And(Vec<FilterExpr>),
    Or(Vec<FilterExpr>),
    Not(Box<FilterExpr>),
    /// Matches when any of `fields` satisfies the comparator.
    Term { comparator: Comparator, fields: Vec<FieldId> },
    /// Matches when the single named field satisfies the comparator.
    ColumnTerm { comparator: Comparator, field: FieldId },
}

impl FilterExpr {
    pub fn not(inner: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(inner))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, FilterExpr::True)
    }

    /// Evaluate against `record`. `And`/`Or` short-circuit left to right.
    pub fn matches<R>(&self, registry: &FieldRegistry<R>, record: &R) -> bool {
        match self {
            FilterExpr::True => true,
            FilterExpr::And(children) => children.iter().all(|c| c.matches(registry, record)),
            FilterExpr::Or(children) => children.iter().any(|c| c.matches(registry, record)),
            FilterExpr::Not(inner) => !inner.matches(registry, record),
            FilterExpr::Term { comparator, fields } => fields.iter().any(|id| {
                registry
                    .read(*id, record)
                    .is_some_and(|value| comparator.matches(&value))
            }),
            FilterExpr::ColumnTerm { comparator, field } => registry
                .read(*field, record)
                .is_some_and(|value| comparator.matches(&value)),
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            FilterExpr::True | FilterExpr::Term { .. } | FilterExpr::ColumnTerm { .. } => 1,
            FilterExpr::Not(inner) => 1 + inner.node_count(),
            FilterExpr::And(children) | FilterExpr::Or(children) => {
                1 + children.iter().map(FilterExpr::node_count).sum::<usize>()
            }
        }
    }
}
