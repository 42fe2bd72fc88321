//! Comparator module: the closed set of value predicates a search term can use.
//!
//! A comparator captures one operand and tests a record's field value against it.
//! All comparisons run on the value's lower-cased text form; numeric comparators
//! reparse that text. Decorators rewrite the text before delegating.

use crate::types::FieldValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Characters dropped from a nanosecond duration to leave whole seconds.
const NANOS_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Maps a search prefix (`=`, `!=`, `<>`, `<`, `<=`, `>`, `>=`) to its operator.
    pub fn from_prefix(prefix: &str) -> Option<CompareOp> {
        match prefix {
            "=" => Some(CompareOp::Eq),
            "!=" | "<>" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge)
    }

    /// Apply to the ordering of `value` relative to the operand.
    /// An unordered pair (NaN) only satisfies `Ne`.
    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            None => matches!(self, CompareOp::Ne),
            Some(o) => match self {
                CompareOp::Eq => o == Ordering::Equal,
                CompareOp::Ne => o != Ordering::Equal,
                CompareOp::Lt => o == Ordering::Less,
                CompareOp::Le => o != Ordering::Greater,
                CompareOp::Gt => o == Ordering::Greater,
                CompareOp::Ge => o != Ordering::Less,
            },
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    /// Case-insensitive substring containment.
    Contains(String),
    /// Ordinal comparison of the text form.
    Text { op: CompareOp, operand: String },
    /// Integer comparison of the reparsed text form.
    Integer { op: CompareOp, operand: i64 },
    /// Float comparison of the reparsed text form.
    Float { op: CompareOp, operand: f64 },
    /// Strips a nanosecond suffix so durations compare in whole seconds.
    DropTail(Box<Comparator>),
    /// Rescales a 0-1 rating to an integer 0-10 before delegating.
    RatingScale(Box<Comparator>),
}

impl Comparator {
    pub fn contains(operand: impl Into<String>) -> Self {
        Comparator::Contains(operand.into().to_lowercase())
    }

    pub fn text(op: CompareOp, operand: impl Into<String>) -> Self {
        Comparator::Text { op, operand: operand.into().to_lowercase() }
    }

    pub fn integer(op: CompareOp, operand: i64) -> Self {
        Comparator::Integer { op, operand }
    }

    pub fn float(op: CompareOp, operand: f64) -> Self {
        Comparator::Float { op, operand }
    }

    pub fn drop_tail(inner: Comparator) -> Self {
        Comparator::DropTail(Box::new(inner))
    }

    pub fn rating_scale(inner: Comparator) -> Self {
        Comparator::RatingScale(Box::new(inner))
    }

    pub fn matches(&self, value: &FieldValue) -> bool {
        self.matches_text(&value.as_text().to_lowercase())
    }

    /// Test an already lower-cased text form.
    pub fn matches_text(&self, element: &str) -> bool {
        match self {
            Comparator::Contains(operand) => element.contains(operand.as_str()),
            Comparator::Text { op, operand } => op.holds(Some(element.cmp(operand.as_str()))),
            Comparator::Integer { op, operand } => op.holds(Some(parse_int(element).cmp(operand))),
            Comparator::Float { op, operand } => op.holds(parse_float(element).partial_cmp(operand)),
            Comparator::DropTail(inner) => {
                let len = element.chars().count();
                if len > NANOS_DIGITS {
                    let cut = element
                        .char_indices()
                        .nth(len - NANOS_DIGITS)
                        .map_or(element.len(), |(i, _)| i);
                    inner.matches_text(&element[..cut])
                } else {
                    inner.matches_text(element)
                }
            }
            Comparator::RatingScale(inner) => {
                let scaled = (parse_float(element) * 10.0).round() as i64;
                inner.matches_text(&scaled.to_string())
            }
        }
    }
}

/// Integer parse of a whole string; anything unparsable reads as 0.
pub fn parse_int(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

/// Float parse of a whole string; anything unparsable reads as 0.0.
pub fn parse_float(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

/// Parses `[[h:]m:]s` into seconds. Malformed input yields 0.
pub fn parse_duration(s: &str) -> i64 {
    let mut seconds: i64 = 0;
    let mut accum: i64 = 0;
    let mut colons = 0;
    for c in s.chars() {
        if let Some(d) = c.to_digit(10) {
            accum = accum.saturating_mul(10).saturating_add(i64::from(d));
        } else if c == ':' {
            colons += 1;
            if colons > 2 {
                return 0;
            }
            seconds = seconds.saturating_mul(60).saturating_add(accum);
            accum = 0;
        } else {
            return 0;
        }
    }
    seconds.saturating_mul(60).saturating_add(accum)
}

/// Parses rating search text onto the stored 0-1 scale, -1.0 (unrated) when
/// the text is empty or unusable.
///
/// - `f0.4` / `0.4f`: a raw 0-1 float
/// - `0`..`5`: a star count, mapped to `n / 5`
/// - any other plain number within 0-1: a raw 0-1 float
pub fn parse_rating(s: &str) -> f64 {
    const UNRATED: f64 = -1.0;
    let s = s.trim();
    if s.is_empty() {
        return UNRATED;
    }
    let lower = s.to_lowercase();
    if lower.contains('f') {
        if lower.matches('f').count() > 1 {
            return UNRATED;
        }
        let stripped = lower.trim_start_matches('f').trim_end_matches('f');
        return stripped
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(UNRATED);
    }
    if let Ok(stars) = lower.parse::<i64>() {
        return if (0..=5).contains(&stars) { stars as f64 / 5.0 } else { UNRATED };
    }
    match lower.parse::<f64>() {
        Ok(v) if (0.0..=1.0).contains(&v) => v,
        _ => UNRATED,
    }
}
