use crate::model::{EntityTag, FieldKind, FieldModel};
use serde::{Deserialize, Serialize};

///
/// EntityModel
/// Runtime model for one entity: its tag and ordered field list.
///
/// Field order is authoritative: a `Record` stores one value per field, in
/// this order, and resolved field paths address values by slot.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityModel {
    pub tag: EntityTag,
    pub fields: Vec<FieldModel>,
}

impl EntityModel {
    #[must_use]
    pub const fn new(tag: EntityTag) -> Self {
        Self {
            tag,
            fields: Vec::new(),
        }
    }

    /// Append a non-nullable field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldModel::new(name, kind));
        self
    }

    /// Append a nullable field.
    #[must_use]
    pub fn nullable_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldModel::nullable(name, kind));
        self
    }

    /// Slot index of a directly declared field.
    #[must_use]
    pub fn field_slot(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    #[must_use]
    pub fn field_at(&self, slot: usize) -> Option<&FieldModel> {
        self.fields.get(slot)
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.fields.len()
    }
}
