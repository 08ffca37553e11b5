//! Module: db::resolve
//! Responsibility: locate a named field anywhere inside a composite shape.
//! Does not own: literal coercion or operator validation.
//!
//! Resolution searches `outer` before `inner` at every level, so on a name
//! collision the earliest-joined entity wins.

use crate::{
    db::{
        row::{CompositeRow, Record},
        shape::CompositeShape,
    },
    error::QueryError,
    model::{EntityTag, FieldKind, Schema},
    value::Value,
};
use std::fmt;

///
/// Branch
/// One step through a `Pair` node.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Branch {
    Outer,
    Inner,
}

///
/// FieldPath
///
/// Resolved access path to one field. `branches` walks from the top of the
/// composite down to the owning entity; `slot` indexes that entity's record.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FieldPath {
    pub name: String,
    pub branches: Vec<Branch>,
    pub entity: EntityTag,
    pub slot: usize,
    pub kind: FieldKind,
    pub nullable: bool,
}

///
/// FieldPresence
///
/// Result of reading a field path from a row. `Missing` covers the absent
/// inner side of a left join.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldPresence<'a> {
    Present(&'a Value),
    Missing,
}

impl FieldPath {
    /// Read the field from a row built for the shape this path was resolved on.
    #[must_use]
    pub fn read<'a>(&self, row: &'a CompositeRow) -> FieldPresence<'a> {
        let mut row = row;
        let mut branches = self.branches.iter();

        // An inner branch always terminates the walk.
        let record: &Record = loop {
            match (row, branches.next()) {
                (CompositeRow::Entity(record), None) => break record,
                (CompositeRow::Pair { outer, .. }, Some(Branch::Outer)) => row = outer.as_ref(),
                (
                    CompositeRow::Pair {
                        inner: Some(record),
                        ..
                    },
                    Some(Branch::Inner),
                ) => break record,
                _ => return FieldPresence::Missing,
            }
        };

        if record.entity() != &self.entity {
            return FieldPresence::Missing;
        }

        record
            .get(self.slot)
            .map_or(FieldPresence::Missing, FieldPresence::Present)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for branch in &self.branches {
            match branch {
                Branch::Outer => f.write_str("outer.")?,
                Branch::Inner => f.write_str("inner.")?,
            }
        }

        write!(f, "{}.{}", self.entity, self.name)
    }
}

/// Resolve `name` against `shape`, searching outer before inner.
pub fn resolve_field(
    schema: &Schema,
    shape: &CompositeShape,
    name: &str,
) -> Result<FieldPath, QueryError> {
    let mut branches = Vec::new();

    search(schema, shape, name, &mut branches)?
        .ok_or_else(|| QueryError::field_not_found(name, shape))
}

/// Resolve `name` as a field declared directly on `entity`.
pub fn resolve_direct(
    schema: &Schema,
    entity: &EntityTag,
    name: &str,
) -> Result<FieldPath, QueryError> {
    leaf_path(schema, entity, name, Vec::new())?
        .ok_or_else(|| QueryError::field_not_found(name, entity))
}

fn search(
    schema: &Schema,
    shape: &CompositeShape,
    name: &str,
    branches: &mut Vec<Branch>,
) -> Result<Option<FieldPath>, QueryError> {
    match shape {
        CompositeShape::Leaf(entity) => leaf_path(schema, entity, name, branches.clone()),
        CompositeShape::Pair { outer, inner } => {
            branches.push(Branch::Outer);
            if let Some(path) = search(schema, outer, name, branches)? {
                return Ok(Some(path));
            }
            branches.pop();

            let mut inner_branches = branches.clone();
            inner_branches.push(Branch::Inner);

            leaf_path(schema, inner, name, inner_branches)
        }
    }
}

fn leaf_path(
    schema: &Schema,
    entity: &EntityTag,
    name: &str,
    branches: Vec<Branch>,
) -> Result<Option<FieldPath>, QueryError> {
    let model = schema.require(entity)?;

    Ok(model.field_slot(name).and_then(|slot| {
        model.field_at(slot).map(|field| FieldPath {
            name: field.name.clone(),
            branches,
            entity: entity.clone(),
            slot,
            kind: field.kind,
            nullable: field.nullable,
        })
    }))
}
