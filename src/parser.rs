//! Parser module: hand-written recursive descent over a search string.
//!
//! ```text
//! expr      ::= or-group
//! or-group  ::= and-group ('OR' and-group)*
//! and-group ::= sexpr (['AND'] sexpr)*
//! sexpr     ::= sterm | '-' sexpr | '(' or-group ')'
//! sterm     ::= column ':' value | value
//! value     ::= prefix? (quoted | unquoted)
//! prefix    ::= '=' | '!=' | '<>' | '<=' | '>=' | '<' | '>'
//! ```
//!
//! The parser never fails. Malformed fragments compile to [`FilterExpr::True`] or are
//! absorbed by the surrounding group, so a half-typed query still filters.

use crate::comparator::CompareOp;
use crate::compiler::{RawTerm, TermCompiler};
use crate::expr::FilterExpr;
use crate::schema::FieldRegistry;

/// Past this many nested groups/negations, `(` and `-` are skipped instead of recursing.
const MAX_NESTING: usize = 64;

const PREFIXES: [&str; 7] = ["!=", "<>", "<=", ">=", "=", "<", ">"];

pub struct FilterParser<'a, R> {
    input: &'a str,
    pos: usize,
    depth: usize,
    nesting: usize,
    // `(` skipped past MAX_NESTING whose `)` has not been seen yet.
    skipped_parens: usize,
    compiler: TermCompiler<'a, R>,
}

impl<'a, R> FilterParser<'a, R> {
    pub fn new(input: &'a str, registry: &'a FieldRegistry<R>) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            nesting: 0,
            skipped_parens: 0,
            compiler: TermCompiler::new(registry),
        }
    }

    pub fn parse(input: &str, registry: &FieldRegistry<R>) -> FilterExpr {
        let mut parser = FilterParser::new(input, registry);
        let expr = parser.parse_or();
        log::debug!("parsed filter {:?} into {} node(s)", input, expr.node_count());
        expr
    }

    fn parse_or(&mut self) -> FilterExpr {
        let mut alternatives = vec![self.parse_and()];
        while self.consume_keyword("OR") {
            alternatives.push(self.parse_and());
        }
        group(alternatives, FilterExpr::Or)
    }

    fn parse_and(&mut self) -> FilterExpr {
        let mut terms = Vec::new();
        let mut expect_term = true;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(')') if self.skipped_parens > 0 => {
                    self.consume_char();
                    self.skipped_parens -= 1;
                    continue;
                }
                Some(')') if self.depth > 0 => break,
                Some(')') => {
                    // Nothing to close at top level.
                    self.consume_char();
                    continue;
                }
                _ => {}
            }
            if !expect_term {
                if self.at_keyword("OR") {
                    break;
                }
                if self.consume_keyword("AND") {
                    expect_term = true;
                    continue;
                }
            }
            let term = self.parse_sexpr();
            if !term.is_true() {
                terms.push(term);
            }
            expect_term = false;
        }
        group(terms, FilterExpr::And)
    }

    fn parse_sexpr(&mut self) -> FilterExpr {
        self.skip_whitespace();
        match self.peek() {
            None | Some(')') => FilterExpr::True,
            Some('(') => {
                self.consume_char();
                if self.nesting >= MAX_NESTING {
                    self.skipped_parens += 1;
                    return FilterExpr::True;
                }
                self.nesting += 1;
                self.depth += 1;
                let inner = self.parse_or();
                self.depth -= 1;
                self.nesting -= 1;
                self.skip_whitespace();
                if self.peek() == Some(')') {
                    self.consume_char();
                }
                inner
            }
            Some('-') => {
                self.consume_char();
                if self.nesting >= MAX_NESTING {
                    return FilterExpr::True;
                }
                self.nesting += 1;
                let inner = self.parse_sexpr();
                self.nesting -= 1;
                if inner.is_true() {
                    inner
                } else {
                    FilterExpr::not(inner)
                }
            }
            Some(_) => {
                let term = self.parse_term();
                self.compiler.compile(term)
            }
        }
    }

    fn parse_term(&mut self) -> RawTerm {
        let mut term = RawTerm::default();
        let mut buf = String::new();
        let mut in_quotes = false;
        while let Some(c) = self.peek() {
            if in_quotes {
                if c != '"' {
                    buf.push(c);
                } else {
                    in_quotes = false;
                }
                self.consume_char();
                continue;
            }
            match c {
                '"' => {
                    in_quotes = true;
                    self.consume_char();
                }
                ':' if term.column.is_none() => {
                    term.column = Some(buf.to_lowercase());
                    term.prefix = None;
                    buf.clear();
                    self.consume_char();
                }
                c if c.is_whitespace() || matches!(c, '(' | ')' | '-') => break,
                _ => {
                    if buf.is_empty() && term.prefix.is_none() {
                        if let Some(op) = self.parse_prefix() {
                            term.prefix = Some(op);
                            continue;
                        }
                    }
                    buf.push(c);
                    self.consume_char();
                }
            }
        }
        term.search = buf;
        term
    }

    fn parse_prefix(&mut self) -> Option<CompareOp> {
        let rest = &self.input[self.pos..];
        let prefix = PREFIXES.iter().find(|p| rest.starts_with(**p))?;
        self.pos += prefix.len();
        CompareOp::from_prefix(prefix)
    }

    /// `AND`/`OR` are keywords only in upper case and only when followed by
    /// whitespace, `-` or `(`.
    fn at_keyword(&self, keyword: &str) -> bool {
        let rest = &self.input[self.pos..];
        rest.starts_with(keyword)
            && rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || c == '-' || c == '(')
    }

    fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += keyword.len();
            self.skip_whitespace();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.consume_char();
            } else {
                break;
            }
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }
}

fn group(mut parts: Vec<FilterExpr>, make: fn(Vec<FilterExpr>) -> FilterExpr) -> FilterExpr {
    match parts.len() {
        0 => FilterExpr::True,
        1 => parts.remove(0),
        _ => make(parts),
    }
}
