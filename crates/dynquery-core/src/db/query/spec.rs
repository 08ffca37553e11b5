//! Module: db::query::spec
//! Responsibility: serde-driven query documents and their conversion into
//! builder state.

use crate::{
    db::{
        join::JoinSpec,
        predicate::{Combinator, FilterCondition, FilterOp},
        query::{builder::QueryBuilder, plan::AggregateSpec},
    },
    error::QueryError,
    model::EntityTag,
    value::Value,
};
use serde::{Deserialize, Serialize};

///
/// QuerySpec
///
/// Declarative query document, e.g. from configuration or an API request.
/// Filters without an `entity` apply to the root.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySpec {
    pub root: EntityTag,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub take: Option<usize>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,
}

///
/// FilterSpec
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    #[serde(default)]
    pub entity: Option<EntityTag>,
    pub field: String,
    pub op: FilterOp,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub combinator: Combinator,
}

impl QuerySpec {
    pub fn from_json_str(json: &str) -> Result<Self, QueryError> {
        serde_json::from_str(json).map_err(|err| QueryError::invalid_spec(err.to_string()))
    }
}

impl QueryBuilder {
    /// Build builder state from a query document.
    ///
    /// Literal conversion errors surface here; operator and field errors
    /// surface at compile time, like any other builder input.
    pub fn from_spec(spec: &QuerySpec) -> Result<Self, QueryError> {
        let mut builder = Self::new(spec.root.clone());

        for filter in &spec.filters {
            let entity = filter.entity.clone().unwrap_or_else(|| spec.root.clone());
            let value = Value::from_json(&filter.value)?;

            builder = builder.condition(
                entity,
                FilterCondition::new(
                    filter.field.clone(),
                    filter.op.clone(),
                    value,
                    filter.combinator,
                ),
            );
        }

        for join in &spec.joins {
            builder = builder.join(join.clone());
        }
        if let Some(skip) = spec.skip {
            builder = builder.skip(skip);
        }
        if let Some(take) = spec.take {
            builder = builder.take(take);
        }

        builder = builder.group_by(spec.group_by.iter().cloned());
        for aggregate in &spec.aggregates {
            builder = builder.select_aggregate(
                aggregate.field.clone(),
                aggregate.function.clone(),
                aggregate.alias.clone(),
            );
        }

        Ok(builder)
    }
}
