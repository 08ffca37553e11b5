use crate::{
    db::row::Record,
    model::{EntityModel, EntityTag},
    value::Value,
};

// ============================================================================
// ENTITY KINDS
// ============================================================================
//
// These traits describe *what shape* a row has, not the data it holds.
//

///
/// EntityKind
///
/// A Rust type registered as one row shape. The model's field order defines
/// the slot order of every `Record` produced for this entity.
///

pub trait EntityKind {
    const TAG: EntityTag;

    fn model() -> EntityModel;
}

// ============================================================================
// ENTITY VALUES
// ============================================================================
//
// These traits describe *instances* of entities.
//

///
/// EntityValue
///
/// Field accessor for an entity instance. Values are returned in model slot
/// order; this is how typed structs reach the dynamic engine without
/// reflection.
///

pub trait EntityValue: EntityKind {
    fn values(&self) -> Vec<Value>;

    /// Look up a single field by name through the model.
    fn field_value(&self, name: &str) -> Option<Value> {
        let slot = Self::model().field_slot(name)?;

        self.values().into_iter().nth(slot)
    }

    fn to_record(&self) -> Record {
        Record::new(Self::TAG, self.values())
    }
}
