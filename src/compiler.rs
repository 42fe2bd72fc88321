//! Compiler module: turns one raw search term into a tree node.
//!
//! The parser hands over the term's column, prefix and search text; this module
//! picks the comparator for the column's kind and decides whether the term is
//! scoped to that column or searches every default field.

use crate::comparator::{parse_duration, parse_int, parse_rating, CompareOp, Comparator};
use crate::expr::FilterExpr;
use crate::schema::{FieldRegistry, RatingScale};
use crate::types::FieldKind;

/// One search term as scanned from the input, before comparator selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTerm {
    pub column: Option<String>,
    pub prefix: Option<CompareOp>,
    pub search: String,
}

pub struct TermCompiler<'a, R> {
    registry: &'a FieldRegistry<R>,
}

impl<'a, R> TermCompiler<'a, R> {
    pub fn new(registry: &'a FieldRegistry<R>) -> Self {
        Self { registry }
    }

    pub fn compile(&self, term: RawTerm) -> FilterExpr {
        let RawTerm { column, prefix, search } = term;
        let search = search.to_lowercase();
        if search.is_empty() && prefix != Some(CompareOp::Eq) {
            return FilterExpr::True;
        }

        let field = column.as_deref().and_then(|c| self.registry.resolve_id(c));
        let kind = field.and_then(|id| self.registry.field(id)).map(|f| f.kind());

        let comparator = match kind {
            Some(FieldKind::Rating) => self.rating_comparator(prefix, &search),
            _ if prefix == Some(CompareOp::Ne) => Comparator::text(CompareOp::Ne, search.as_str()),
            Some(kind) if kind.is_numeric() => {
                let operand = if kind == FieldKind::Duration {
                    parse_duration(&search)
                } else {
                    parse_int(&search)
                };
                match prefix {
                    Some(op) if op.is_ordering() => Comparator::integer(op, operand),
                    // Bare numerals match the canonical form, so "0042" finds 42.
                    _ => Comparator::text(CompareOp::Eq, operand.to_string()),
                }
            }
            _ => match prefix {
                Some(op) => Comparator::text(op, search.as_str()),
                None => Comparator::contains(search.as_str()),
            },
        };

        let comparator = if kind == Some(FieldKind::Duration) {
            Comparator::drop_tail(comparator)
        } else {
            comparator
        };

        log::trace!(
            "compiled term {}:{}{:?} -> {:?}",
            column.as_deref().unwrap_or(""),
            prefix.map(|op| op.to_string()).unwrap_or_default(),
            search,
            comparator
        );

        match field {
            Some(field) => FilterExpr::ColumnTerm { comparator, field },
            // An empty registry has nothing to search.
            None if self.registry.default_field_ids().is_empty() => FilterExpr::True,
            None => FilterExpr::Term {
                comparator,
                fields: self.registry.default_field_ids().to_vec(),
            },
        }
    }

    fn rating_comparator(&self, prefix: Option<CompareOp>, search: &str) -> Comparator {
        let op = prefix.unwrap_or(CompareOp::Eq);
        match self.registry.rating_scale() {
            RatingScale::Unit => Comparator::float(op, parse_rating(search)),
            RatingScale::Tenths => {
                let operand = if search.is_empty() {
                    (parse_rating(search) * 10.0).round() as i64
                } else {
                    parse_int(search)
                };
                Comparator::rating_scale(Comparator::integer(op, operand))
            }
        }
    }
}
