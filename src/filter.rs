//! Filter module: a parsed tree bundled with the registry it was parsed against.
//!
//! This module provides the CompiledFilter type, the main evaluation API.

use crate::expr::FilterExpr;
use crate::parser::FilterParser;
use crate::schema::FieldRegistry;
use std::fmt;
use std::sync::Arc;

/// Parse `input` against `registry`. Never fails.
pub fn parse<R>(input: &str, registry: &FieldRegistry<R>) -> FilterExpr {
    FilterParser::parse(input, registry)
}

/// A parsed filter, ready for matching.
pub struct CompiledFilter<R> {
    expr: FilterExpr,
    registry: Arc<FieldRegistry<R>>,
}

impl<R> CompiledFilter<R> {
    /// Parse `input` against a shared registry.
    pub fn new(input: &str, registry: Arc<FieldRegistry<R>>) -> Self {
        let expr = FilterParser::parse(input, &registry);
        Self { expr, registry }
    }

    /// Wrap an already built tree. Its field ids must come from `registry`.
    pub fn from_expr(expr: FilterExpr, registry: Arc<FieldRegistry<R>>) -> Self {
        Self { expr, registry }
    }

    pub fn matches(&self, record: &R) -> bool {
        self.expr.matches(&self.registry, record)
    }

    /// Whether this filter lets every record through.
    pub fn is_match_all(&self) -> bool {
        self.expr.is_true()
    }

    pub fn expr(&self) -> &FilterExpr {
        &self.expr
    }

    pub fn registry(&self) -> &FieldRegistry<R> {
        &self.registry
    }
}

impl<R> Clone for CompiledFilter<R> {
    fn clone(&self) -> Self {
        Self { expr: self.expr.clone(), registry: Arc::clone(&self.registry) }
    }
}

impl<R> fmt::Debug for CompiledFilter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter").field("expr", &self.expr).finish_non_exhaustive()
    }
}
