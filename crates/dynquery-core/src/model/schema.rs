//! Module: model::schema
//! Responsibility: registry of entity models keyed by tag.
//! Does not own: row storage or query execution.

use crate::{
    error::QueryError,
    model::{EntityModel, EntityTag},
    traits::EntityKind,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// ModelError
///
/// Invalid model contracts detected at registration.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("entity '{entity}' is already registered")]
    DuplicateEntity { entity: EntityTag },

    #[error("entity '{entity}' declares no fields")]
    NoFields { entity: EntityTag },

    #[error("entity '{entity}' declares an empty field name")]
    EmptyFieldName { entity: EntityTag },

    #[error("entity '{entity}' declares field '{field}' twice")]
    DuplicateField { entity: EntityTag, field: String },

    #[error("record for '{entity}' has {found} values, expected {expected}")]
    ArityMismatch {
        entity: EntityTag,
        expected: usize,
        found: usize,
    },

    #[error("record for '{entity}' holds an invalid value for field '{field}': {value}")]
    InvalidRecordValue {
        entity: EntityTag,
        field: String,
        value: String,
    },
}

///
/// Schema
///
/// Runtime-usable model map. This is the only schema surface the resolver
/// and predicate compiler depend on.
///

#[derive(Clone, Debug, Default)]
pub struct Schema {
    models: BTreeMap<EntityTag, EntityModel>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one model after validating its field list.
    pub fn register(&mut self, model: EntityModel) -> Result<(), ModelError> {
        if self.models.contains_key(&model.tag) {
            return Err(ModelError::DuplicateEntity {
                entity: model.tag.clone(),
            });
        }
        if model.fields.is_empty() {
            return Err(ModelError::NoFields {
                entity: model.tag.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for field in &model.fields {
            if field.name.is_empty() {
                return Err(ModelError::EmptyFieldName {
                    entity: model.tag.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    entity: model.tag.clone(),
                    field: field.name.clone(),
                });
            }
        }

        self.models.insert(model.tag.clone(), model);

        Ok(())
    }

    /// Register the model declared by a typed entity.
    pub fn register_entity<E: EntityKind>(&mut self) -> Result<(), ModelError> {
        self.register(E::model())
    }

    #[must_use]
    pub fn model(&self, tag: &EntityTag) -> Option<&EntityModel> {
        self.models.get(tag)
    }

    /// Look up a model, failing with `UnknownEntity` when absent.
    pub fn require(&self, tag: &EntityTag) -> Result<&EntityModel, QueryError> {
        self.model(tag).ok_or_else(|| QueryError::UnknownEntity {
            entity: tag.clone(),
        })
    }

    #[must_use]
    pub fn contains(&self, tag: &EntityTag) -> bool {
        self.models.contains_key(tag)
    }
}
