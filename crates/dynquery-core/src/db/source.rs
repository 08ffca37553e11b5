//! Collaborator seams.
//!
//! The engine never touches storage. A `SourceRegistry` hands out lazy
//! sources per entity and a `QueryProvider` materializes finished plans.

use crate::{
    db::{query::Query, row::CompositeRow},
    error::QueryError,
    model::{EntityTag, Schema},
};

/// Lazy stream of result rows.
pub type RowStream<'a> = Box<dyn Iterator<Item = CompositeRow> + 'a>;

///
/// SourceRegistry
///
/// Type registry accessor: the schema the engine resolves fields against,
/// and a lazy source over each entity's full extent.
///

pub trait SourceRegistry {
    fn schema(&self) -> &Schema;

    /// Lazy source yielding rows of `entity`.
    fn source(&self, entity: &EntityTag) -> Result<Query, QueryError> {
        self.schema().require(entity)?;

        Ok(Query::scan(entity.clone()))
    }
}

///
/// QueryProvider
/// Executes a compiled query. No rows are produced until the stream is pulled.
///

pub trait QueryProvider {
    fn execute<'a>(&'a self, query: &'a Query) -> Result<RowStream<'a>, QueryError>;
}
