//! Module: db::query::compile
//! Responsibility: sequence root filtering, per-join inner filtering and join
//! application into one lazy `Query`.
//! Does not own: data access (delegated to `SourceRegistry`) or execution.
//!
//! Compilation only reads builder state. It may run concurrently from many
//! readers once the builder is fully configured.

use crate::{
    db::{
        join::apply_join,
        predicate::compile_predicate,
        query::{builder::QueryBuilder, plan::Query},
        shape::CompositeShape,
        source::SourceRegistry,
    },
    error::QueryError,
    model::{EntityTag, Schema},
    obs::trace::TraceScope,
};

impl QueryBuilder {
    /// Compile against an explicit root query and a source registry.
    ///
    /// `root` must yield rows of the builder's root entity. Each declared join
    /// pulls its inner source from `sources`, restricts it by that entity's
    /// own filters, and pairs it onto the accumulated query.
    pub fn compile<S>(&self, root: Query, sources: &S) -> Result<Query, QueryError>
    where
        S: SourceRegistry + ?Sized,
    {
        let trace = TraceScope::start(self.trace, self.root(), self.joins().len());
        let result = self.compile_pipeline(root, sources, trace.as_ref());

        if let Some(trace) = trace {
            match &result {
                Ok(query) => trace.finish(query.fingerprint(), self.joins().len()),
                Err(err) => trace.error(err),
            }
        }

        result
    }

    /// Compile using the registry's own source for the root entity.
    pub fn compile_from<S>(&self, sources: &S) -> Result<Query, QueryError>
    where
        S: SourceRegistry + ?Sized,
    {
        let root = sources.source(self.root())?;

        self.compile(root, sources)
    }

    fn compile_pipeline<S>(
        &self,
        root: Query,
        sources: &S,
        trace: Option<&TraceScope>,
    ) -> Result<Query, QueryError>
    where
        S: SourceRegistry + ?Sized,
    {
        let schema = sources.schema();
        schema.require(self.root())?;

        if root.shape() != &CompositeShape::leaf(self.root().clone()) {
            return Err(QueryError::RootMismatch {
                expected: self.root().clone(),
                found: root.shape().to_string(),
            });
        }

        let mut current = self.restrict(schema, root, self.root(), trace)?;

        for (index, spec) in self.joins().iter().enumerate() {
            let inner = sources.source(&spec.entity)?;
            let inner = self.restrict(schema, inner, &spec.entity, trace)?;

            current = apply_join(schema, current, spec, inner)?;

            if let Some(trace) = trace {
                trace.join_applied(index + 1, &spec.entity, spec.kind);
            }
        }

        if let Some(trace) = trace {
            for (entity, conditions) in self.filtered_entities() {
                if !current.shape().contains(entity) {
                    trace.dead_filter(entity, conditions.len());
                }
            }
        }

        let grouping = Some(self.grouping().clone()).filter(|grouping| !grouping.is_empty());

        Ok(current.page(self.page()).with_grouping(grouping))
    }

    // Apply `entity`'s own conditions to a source that yields that entity.
    fn restrict(
        &self,
        schema: &Schema,
        query: Query,
        entity: &EntityTag,
        trace: Option<&TraceScope>,
    ) -> Result<Query, QueryError> {
        let conditions = self.conditions(entity);
        if conditions.is_empty() {
            return Ok(query);
        }

        let predicate = compile_predicate(schema, query.shape(), conditions)?;

        if let Some(trace) = trace {
            trace.filter_applied(entity, conditions.len());
        }

        Ok(query.filter(predicate))
    }
}
