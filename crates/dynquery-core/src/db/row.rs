use crate::{model::EntityTag, value::Value};

///
/// Record
///
/// One entity row. Values are stored in the entity model's slot order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    entity: EntityTag,
    values: Vec<Value>,
}

impl Record {
    #[must_use]
    pub const fn new(entity: EntityTag, values: Vec<Value>) -> Self {
        Self { entity, values }
    }

    #[must_use]
    pub const fn entity(&self) -> &EntityTag {
        &self.entity
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Value> {
        self.values.get(slot)
    }
}

///
/// CompositeRow
///
/// Runtime value matching a `CompositeShape`. Both sides of every join stay
/// fully inspectable. `inner: None` marks an unmatched left-join row.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompositeRow {
    Entity(Record),
    Pair {
        outer: Box<Self>,
        inner: Option<Record>,
    },
}

impl CompositeRow {
    #[must_use]
    pub fn pair(outer: Self, inner: Option<Record>) -> Self {
        Self::Pair {
            outer: Box::new(outer),
            inner,
        }
    }

    /// The root entity record, found by walking outer branches.
    #[must_use]
    pub fn root(&self) -> &Record {
        match self {
            Self::Entity(record) => record,
            Self::Pair { outer, .. } => outer.root(),
        }
    }

    /// Number of joins this row went through.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Entity(_) => 0,
            Self::Pair { outer, .. } => outer.depth() + 1,
        }
    }
}

impl From<Record> for CompositeRow {
    fn from(record: Record) -> Self {
        Self::Entity(record)
    }
}
