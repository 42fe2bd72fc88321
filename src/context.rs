//! Context module: a string-keyed record for hosts without a concrete record type.
//!
//! This module provides the FilterContext type and the registry helpers that read
//! from it.

use crate::schema::{FieldRegistry, FieldRegistryBuilder};
use crate::types::{FieldKind, FieldValue};
use crate::FilterError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterContext {
    values: HashMap<String, FieldValue>,
}

impl FilterContext {
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Store `value` under `field`, checked against the field's kind in `registry`.
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
        registry: &FieldRegistry<FilterContext>,
    ) -> Result<(), FilterError> {
        let value = value.into();
        let descriptor = registry
            .resolve(field)
            .ok_or_else(|| FilterError::FieldNotFound(field.to_string()))?;
        if !value.fits(descriptor.kind()) {
            return Err(FilterError::TypeMismatch {
                field: descriptor.name().to_string(),
                expected: descriptor.kind(),
                actual: value.type_name(),
            });
        }
        self.values.insert(descriptor.name().to_string(), value);
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }
}

impl FieldRegistryBuilder<FilterContext> {
    /// Register a field read from a [`FilterContext`]; unset fields read as empty.
    pub fn context_field(self, name: &str, kind: FieldKind) -> Self {
        let key = name.to_lowercase();
        self.field(name, kind, move |ctx: &FilterContext| {
            ctx.get(&key).cloned().unwrap_or_else(|| FieldValue::empty_of(kind))
        })
    }

    /// Like [`context_field`](Self::context_field), but excluded from bare-term search.
    pub fn scoped_context_field(self, name: &str, kind: FieldKind) -> Self {
        let key = name.to_lowercase();
        self.scoped_field(name, kind, move |ctx: &FilterContext| {
            ctx.get(&key).cloned().unwrap_or_else(|| FieldValue::empty_of(kind))
        })
    }
}
