//! Schema module: defines the field registry a filter is parsed against.
//!
//! A registry maps lower-case column names to a [`FieldKind`] and an accessor that
//! reads the field out of a record of type `R`. The engine defines no field names of
//! its own; each record shape brings its own registry.

use crate::types::{FieldKind, FieldValue};
use crate::FilterError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Index of a field inside its registry.
pub type FieldId = usize;

/// Reads one field out of a record.
pub type Accessor<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// How `Rating` fields compare against search text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingScale {
    /// Float comparison on the stored 0-1 value. Search text is a star count
    /// (0-5), a raw float (`f0.4`), or a plain fraction (`0.4`).
    #[default]
    Unit,
    /// The stored value is scaled to an integer 0-10 and compared against an
    /// integer operand.
    Tenths,
}

pub struct FieldDescriptor<R> {
    name: String,
    kind: FieldKind,
    searchable: bool,
    accessor: Accessor<R>,
}

impl<R> FieldDescriptor<R> {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
    /// Whether bare terms (no column) search this field.
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }
    pub fn read(&self, record: &R) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            searchable: self.searchable,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("searchable", &self.searchable)
            .finish_non_exhaustive()
    }
}

pub struct FieldRegistry<R> {
    fields: Vec<FieldDescriptor<R>>, // index = FieldId
    field_ids: HashMap<String, FieldId>,
    default_fields: Vec<FieldId>,
    rating_scale: RatingScale,
}

impl<R> FieldRegistry<R> {
    pub fn builder() -> FieldRegistryBuilder<R> {
        FieldRegistryBuilder::new()
    }

    /// Look up a field by column name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.resolve_id(name).and_then(|id| self.fields.get(id))
    }

    /// Get the field ID for a column name, case-insensitively.
    pub fn resolve_id(&self, name: &str) -> Option<FieldId> {
        if let Some(id) = self.field_ids.get(name) {
            return Some(*id);
        }
        self.field_ids.get(&name.to_lowercase()).copied()
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldDescriptor<R>> {
        self.fields.get(id)
    }

    /// The fields a bare term searches, in registration order.
    pub fn default_fields(&self) -> impl Iterator<Item = &FieldDescriptor<R>> + '_ {
        self.default_fields.iter().filter_map(move |id| self.fields.get(*id))
    }

    pub(crate) fn default_field_ids(&self) -> &[FieldId] {
        &self.default_fields
    }

    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn rating_scale(&self) -> RatingScale {
        self.rating_scale
    }

    /// Read field `id` from `record`, `None` when the id is not ours.
    pub fn read(&self, id: FieldId, record: &R) -> Option<FieldValue> {
        self.fields.get(id).map(|f| f.read(record))
    }
}

impl<R> Clone for FieldRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            field_ids: self.field_ids.clone(),
            default_fields: self.default_fields.clone(),
            rating_scale: self.rating_scale,
        }
    }
}

impl<R> fmt::Debug for FieldRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("fields", &self.fields)
            .field("rating_scale", &self.rating_scale)
            .finish()
    }
}

pub struct FieldRegistryBuilder<R> {
    fields: Vec<FieldDescriptor<R>>,
    rating_scale: RatingScale,
}

impl<R> Default for FieldRegistryBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> FieldRegistryBuilder<R> {
    pub fn new() -> Self {
        Self { fields: Vec::new(), rating_scale: RatingScale::default() }
    }

    /// Register a field that bare terms also search.
    pub fn field<F>(self, name: impl Into<String>, kind: FieldKind, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        self.push(name.into(), kind, true, Arc::new(accessor))
    }

    /// Register a field only reachable through an explicit `column:` prefix.
    pub fn scoped_field<F>(self, name: impl Into<String>, kind: FieldKind, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        self.push(name.into(), kind, false, Arc::new(accessor))
    }

    pub fn rating_scale(mut self, scale: RatingScale) -> Self {
        self.rating_scale = scale;
        self
    }

    fn push(mut self, name: String, kind: FieldKind, searchable: bool, accessor: Accessor<R>) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.to_lowercase(),
            kind,
            searchable,
            accessor,
        });
        self
    }

    pub fn build(self) -> Result<FieldRegistry<R>, FilterError> {
        let mut field_ids = HashMap::with_capacity(self.fields.len());
        let mut default_fields = Vec::new();
        for (id, field) in self.fields.iter().enumerate() {
            if !is_addressable(&field.name) {
                return Err(FilterError::InvalidFieldName(field.name.clone()));
            }
            if field_ids.insert(field.name.clone(), id).is_some() {
                return Err(FilterError::DuplicateField(field.name.clone()));
            }
            if field.searchable {
                default_fields.push(id);
            }
        }
        // Bare terms need somewhere to look.
        if default_fields.is_empty() && !self.fields.is_empty() {
            return Err(FilterError::NoSearchableFields);
        }
        Ok(FieldRegistry {
            fields: self.fields,
            field_ids,
            default_fields,
            rating_scale: self.rating_scale,
        })
    }
}

// A column the parser can never produce would be dead weight.
fn is_addressable(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '(' | ')' | '"'))
}
