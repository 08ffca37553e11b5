use crate::{
    db::{
        join::{JoinKind, JoinSpec},
        predicate::{CompareOp, Combinator, FilterCondition, FilterOp},
        query::plan::{AggregateSpec, Grouping, Page},
    },
    model::EntityTag,
    obs::QueryTraceSink,
    traits::EntityKind,
    value::Value,
};
use std::{collections::BTreeMap, fmt};

///
/// QueryBuilder
///
/// Chainable, declarative accumulation of filters, joins and paging for one
/// root entity.
///
/// This builder:
/// - Keys filter conditions by entity; order within one entity is significant
/// - Records joins in call order, which fixes both application order and the
///   nesting of the resulting composite shape
/// - Performs no schema access, validation or I/O until `compile`
///
/// Filters registered for an entity that ends up neither root nor joined are
/// accepted and ignored at compile time.
///

#[derive(Clone)]
pub struct QueryBuilder {
    root: EntityTag,
    filters: BTreeMap<EntityTag, Vec<FilterCondition>>,
    joins: Vec<JoinSpec>,
    page: Page,
    grouping: Grouping,
    pub(super) trace: Option<&'static dyn QueryTraceSink>,
}

impl QueryBuilder {
    /// Create an empty builder rooted at `root`.
    #[must_use]
    pub const fn new(root: EntityTag) -> Self {
        Self {
            root,
            filters: BTreeMap::new(),
            joins: Vec::new(),
            page: Page {
                skip: None,
                take: None,
            },
            grouping: Grouping {
                keys: Vec::new(),
                aggregates: Vec::new(),
            },
            trace: None,
        }
    }

    /// Create an empty builder rooted at a typed entity.
    #[must_use]
    pub const fn for_entity<E: EntityKind>() -> Self {
        Self::new(E::TAG)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Register a root-entity condition combined with AND.
    #[must_use]
    pub fn filter(
        self,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
    ) -> Self {
        let root = self.root.clone();
        self.condition(root, FilterCondition::and(field, op, value))
    }

    /// Alias of [`Self::filter`].
    #[must_use]
    pub fn and_where(
        self,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
    ) -> Self {
        self.filter(field, op, value)
    }

    /// Register a root-entity condition combined with OR.
    #[must_use]
    pub fn or_else(
        self,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
    ) -> Self {
        let root = self.root.clone();
        self.condition(root, FilterCondition::or(field, op, value))
    }

    /// Register a root-entity IN condition combined with AND.
    #[must_use]
    pub fn in_list<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let root = self.root.clone();
        self.in_list_on(root, field, values)
    }

    /// Register a condition for any entity, with an explicit combinator.
    #[must_use]
    pub fn filter_on(
        self,
        entity: EntityTag,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
        combinator: Combinator,
    ) -> Self {
        self.condition(entity, FilterCondition::new(field, op, value, combinator))
    }

    #[must_use]
    pub fn and_where_on(
        self,
        entity: EntityTag,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
    ) -> Self {
        self.filter_on(entity, field, op, value, Combinator::And)
    }

    #[must_use]
    pub fn or_else_on(
        self,
        entity: EntityTag,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
    ) -> Self {
        self.filter_on(entity, field, op, value, Combinator::Or)
    }

    #[must_use]
    pub fn in_list_on<I, V>(self, entity: EntityTag, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = Value::list(values);
        self.condition(entity, FilterCondition::and(field, CompareOp::In, values))
    }

    /// Append a prebuilt condition to `entity`'s ordered list.
    #[must_use]
    pub fn condition(mut self, entity: EntityTag, condition: FilterCondition) -> Self {
        self.filters.entry(entity).or_default().push(condition);
        self
    }

    // ------------------------------------------------------------------
    // Joins
    // ------------------------------------------------------------------

    #[must_use]
    pub fn join(mut self, spec: JoinSpec) -> Self {
        self.joins.push(spec);
        self
    }

    #[must_use]
    pub fn inner_join(
        self,
        entity: EntityTag,
        outer_key: impl Into<String>,
        inner_key: impl Into<String>,
    ) -> Self {
        self.join(JoinSpec::new(entity, outer_key, inner_key, JoinKind::Inner))
    }

    #[must_use]
    pub fn left_join(
        self,
        entity: EntityTag,
        outer_key: impl Into<String>,
        inner_key: impl Into<String>,
    ) -> Self {
        self.join(JoinSpec::new(entity, outer_key, inner_key, JoinKind::Left))
    }

    // ------------------------------------------------------------------
    // Paging, grouping, tracing
    // ------------------------------------------------------------------

    /// Set or replace the number of leading rows to skip.
    #[must_use]
    pub const fn skip(mut self, n: usize) -> Self {
        self.page.skip = Some(n);
        self
    }

    /// Set or replace the maximum number of rows to return.
    #[must_use]
    pub const fn take(mut self, n: usize) -> Self {
        self.page.take = Some(n);
        self
    }

    #[must_use]
    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping.keys.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn select_aggregate(
        mut self,
        field: impl Into<String>,
        function: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.grouping.aggregates.push(AggregateSpec {
            field: field.into(),
            function: function.into(),
            alias: alias.into(),
        });
        self
    }

    /// Install a compile trace sink.
    #[must_use]
    pub fn trace(mut self, sink: &'static dyn QueryTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn root(&self) -> &EntityTag {
        &self.root
    }

    #[must_use]
    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    /// Ordered conditions registered for `entity`, empty when none.
    #[must_use]
    pub fn conditions(&self, entity: &EntityTag) -> &[FilterCondition] {
        self.filters
            .get(entity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entities with at least one registered condition.
    pub fn filtered_entities(&self) -> impl Iterator<Item = (&EntityTag, &[FilterCondition])> {
        self.filters
            .iter()
            .map(|(entity, conditions)| (entity, conditions.as_slice()))
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub const fn grouping(&self) -> &Grouping {
        &self.grouping
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("root", &self.root)
            .field("filters", &self.filters)
            .field("joins", &self.joins)
            .field("page", &self.page)
            .field("grouping", &self.grouping)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
