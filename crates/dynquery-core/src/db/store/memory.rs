//! Module: db::store::memory
//! Responsibility: in-process rows plus a lazy executor for compiled plans.
//! Does not own: query composition.

use crate::{
    db::{
        join::JoinKind,
        query::{JoinNode, Page, Query, QueryBuilder, QueryNode},
        resolve::FieldPresence,
        row::{CompositeRow, Record},
        source::{QueryProvider, RowStream, SourceRegistry},
    },
    error::QueryError,
    model::{EntityModel, EntityTag, ModelError, Schema},
    traits::{EntityKind, EntityValue},
    value::Value,
};
use std::collections::{BTreeMap, HashMap};

///
/// MemoryStore
///
/// Schema plus validated records per entity. Implements both collaborator
/// seams so compiled queries can run over in-process data.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    schema: Schema,
    rows: BTreeMap<EntityTag, Vec<Record>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, model: EntityModel) -> Result<(), QueryError> {
        self.schema.register(model)?;

        Ok(())
    }

    pub fn register_entity<E: EntityKind>(&mut self) -> Result<(), QueryError> {
        self.register(E::model())
    }

    /// Insert one record after checking arity and per-field kinds.
    pub fn insert(&mut self, record: Record) -> Result<(), QueryError> {
        let model = self.schema.require(record.entity())?;
        validate_record(model, &record)?;

        self.rows
            .entry(record.entity().clone())
            .or_default()
            .push(record);

        Ok(())
    }

    pub fn insert_values(
        &mut self,
        entity: EntityTag,
        values: Vec<Value>,
    ) -> Result<(), QueryError> {
        self.insert(Record::new(entity, values))
    }

    pub fn insert_entity<E: EntityValue>(&mut self, entity: &E) -> Result<(), QueryError> {
        self.insert(entity.to_record())
    }

    pub fn extend_entities<'e, E, I>(&mut self, entities: I) -> Result<(), QueryError>
    where
        E: EntityValue + 'e,
        I: IntoIterator<Item = &'e E>,
    {
        for entity in entities {
            self.insert_entity(entity)?;
        }

        Ok(())
    }

    /// Number of stored rows for `entity`.
    #[must_use]
    pub fn len(&self, entity: &EntityTag) -> usize {
        self.rows.get(entity).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.values().all(Vec::is_empty)
    }

    /// Compile `builder` against this store and collect every row.
    pub fn fetch(&self, builder: &QueryBuilder) -> Result<Vec<CompositeRow>, QueryError> {
        let query = builder.compile_from(self)?;
        let rows = self.execute(&query)?.collect();

        Ok(rows)
    }

    fn stream<'a>(&'a self, node: &'a QueryNode) -> Result<RowStream<'a>, QueryError> {
        match node {
            QueryNode::Scan { entity } => {
                self.schema.require(entity)?;
                let rows = self.rows.get(entity).map(Vec::as_slice).unwrap_or_default();

                Ok(Box::new(rows.iter().cloned().map(CompositeRow::Entity)))
            }
            QueryNode::Filter { input, predicate } => {
                let input = self.stream(input)?;

                Ok(Box::new(input.filter(move |row| predicate.eval(row))))
            }
            QueryNode::Join(join) => self.hash_join(join),
            QueryNode::Page { input, page } => {
                let input = self.stream(input)?;

                Ok(apply_page(input, *page))
            }
        }
    }

    // The inner side is drained into a hash table on the first outer pull.
    fn hash_join<'a>(&'a self, join: &'a JoinNode) -> Result<RowStream<'a>, QueryError> {
        let outer = self.stream(&join.outer)?;
        let mut inner = Some(self.stream(&join.inner)?);
        let mut table: HashMap<Value, Vec<Record>> = HashMap::new();

        Ok(Box::new(outer.flat_map(move |row| {
            if let Some(inner) = inner.take() {
                table = build_table(join, inner);
            }

            probe(join, &table, row)
        })))
    }
}

impl SourceRegistry for MemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl QueryProvider for MemoryStore {
    fn execute<'a>(&'a self, query: &'a Query) -> Result<RowStream<'a>, QueryError> {
        self.stream(query.node())
    }
}

fn validate_record(model: &EntityModel, record: &Record) -> Result<(), ModelError> {
    if record.values().len() != model.arity() {
        return Err(ModelError::ArityMismatch {
            entity: model.tag.clone(),
            expected: model.arity(),
            found: record.values().len(),
        });
    }

    for (field, value) in model.fields.iter().zip(record.values()) {
        if !value.fits(field.kind, field.nullable) {
            return Err(ModelError::InvalidRecordValue {
                entity: model.tag.clone(),
                field: field.name.clone(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

fn build_table(join: &JoinNode, inner: RowStream<'_>) -> HashMap<Value, Vec<Record>> {
    let mut table: HashMap<Value, Vec<Record>> = HashMap::new();

    for row in inner {
        let key = match join.inner_key.read(&row) {
            FieldPresence::Present(value) if !value.is_null() => value.clone(),
            _ => continue,
        };
        if let CompositeRow::Entity(record) = row {
            table.entry(key).or_default().push(record);
        }
    }

    table
}

fn probe(
    join: &JoinNode,
    table: &HashMap<Value, Vec<Record>>,
    row: CompositeRow,
) -> Vec<CompositeRow> {
    let matches: &[Record] = match join.outer_key.read(&row) {
        FieldPresence::Present(value) => join
            .coercion
            .apply(value)
            .and_then(|key| table.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        FieldPresence::Missing => &[],
    };

    if matches.is_empty() {
        return match join.kind {
            JoinKind::Inner => Vec::new(),
            JoinKind::Left => vec![CompositeRow::pair(row, None)],
        };
    }

    matches
        .iter()
        .map(|record| CompositeRow::pair(row.clone(), Some(record.clone())))
        .collect()
}

fn apply_page(input: RowStream<'_>, page: Page) -> RowStream<'_> {
    let input = input.skip(page.skip.unwrap_or(0));

    match page.take {
        Some(take) => Box::new(input.take(take)),
        None => Box::new(input),
    }
}
