//! Module: db::flatten
//! Responsibility: project composite rows into flat name → value maps for
//! presentation.
//!
//! Outer fields are written before inner fields; on a name collision the
//! later write wins while the key keeps its first position.

use crate::{
    db::{
        row::{CompositeRow, Record},
        shape::CompositeShape,
    },
    error::QueryError,
    model::{EntityTag, Schema},
    value::Value,
};
use derive_more::{Deref, IntoIterator};
use indexmap::IndexMap;

///
/// FlatRow
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct FlatRow(IndexMap<String, Value>);

impl FlatRow {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Field names in projection order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

///
/// Flattener
///

#[derive(Clone, Copy, Debug)]
pub struct Flattener<'a> {
    schema: &'a Schema,
}

impl<'a> Flattener<'a> {
    #[must_use]
    pub const fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Flatten one row yielded by a query of `shape`.
    ///
    /// The shape is only consulted for absent left-join sides, whose fields
    /// are written as `Null` unless an earlier side already wrote that name.
    pub fn flatten(
        &self,
        shape: &CompositeShape,
        row: &CompositeRow,
    ) -> Result<FlatRow, QueryError> {
        let mut out = IndexMap::new();
        self.write_row(Some(shape), row, &mut out)?;

        Ok(FlatRow(out))
    }

    /// Flatten every row of a result set.
    pub fn flatten_all<'r, I>(
        &self,
        shape: &CompositeShape,
        rows: I,
    ) -> Result<Vec<FlatRow>, QueryError>
    where
        I: IntoIterator<Item = &'r CompositeRow>,
    {
        rows.into_iter().map(|row| self.flatten(shape, row)).collect()
    }

    fn write_row(
        &self,
        shape: Option<&CompositeShape>,
        row: &CompositeRow,
        out: &mut IndexMap<String, Value>,
    ) -> Result<(), QueryError> {
        match row {
            CompositeRow::Entity(record) => self.write_record(record, out),
            CompositeRow::Pair { outer, inner } => {
                let (outer_shape, inner_entity) = match shape {
                    Some(CompositeShape::Pair { outer, inner }) => {
                        (Some(outer.as_ref()), Some(inner))
                    }
                    _ => (None, None),
                };

                self.write_row(outer_shape, outer, out)?;

                match (inner, inner_entity) {
                    (Some(record), _) => self.write_record(record, out),
                    (None, Some(entity)) => self.write_absent(entity, out),
                    (None, None) => Ok(()),
                }
            }
        }
    }

    fn write_record(
        &self,
        record: &Record,
        out: &mut IndexMap<String, Value>,
    ) -> Result<(), QueryError> {
        let model = self.schema.require(record.entity())?;

        for (field, value) in model.fields.iter().zip(record.values()) {
            out.insert(field.name.clone(), value.clone());
        }

        Ok(())
    }

    fn write_absent(
        &self,
        entity: &EntityTag,
        out: &mut IndexMap<String, Value>,
    ) -> Result<(), QueryError> {
        let model = self.schema.require(entity)?;

        for field in &model.fields {
            out.entry(field.name.clone()).or_insert(Value::Null);
        }

        Ok(())
    }
}
