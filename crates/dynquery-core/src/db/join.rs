//! Module: db::join
//! Responsibility: join declarations, key-type reconciliation and pairing an
//! accumulated query with a filtered inner source.
//! Does not own: join execution (see `QueryProvider`).

use crate::{
    db::{
        query::{JoinNode, Query, QueryNode},
        resolve::{FieldPath, resolve_direct, resolve_field},
        shape::CompositeShape,
    },
    error::QueryError,
    model::{EntityTag, FieldKind, Schema},
    value::{Value, widen_key},
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// JoinKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum JoinKind {
    /// Outer rows without a match are dropped.
    #[default]
    Inner,
    /// Outer rows without a match are kept, paired with an absent inner.
    Left,
}

impl JoinKind {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Inner => 0x01,
            Self::Left => 0x02,
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

///
/// JoinSpec
///
/// One declared join. `outer_key` is resolved against the accumulated
/// composite shape; `inner_key` must be declared directly on `entity`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JoinSpec {
    pub entity: EntityTag,
    pub outer_key: String,
    pub inner_key: String,
    #[serde(default)]
    pub kind: JoinKind,
}

impl JoinSpec {
    #[must_use]
    pub fn new(
        entity: EntityTag,
        outer_key: impl Into<String>,
        inner_key: impl Into<String>,
        kind: JoinKind,
    ) -> Self {
        Self {
            entity,
            outer_key: outer_key.into(),
            inner_key: inner_key.into(),
            kind,
        }
    }
}

///
/// KeyCoercion
/// How outer key values are converted before matching inner keys.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyCoercion {
    Identity,
    Widen { to: FieldKind },
}

impl KeyCoercion {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Identity => 0x01,
            Self::Widen { .. } => 0x02,
        }
    }

    /// Convert a key value into its matchable form. Null keys never match.
    #[must_use]
    pub fn apply(self, value: &Value) -> Option<Value> {
        match self {
            _ if value.is_null() => None,
            Self::Identity => Some(value.clone()),
            Self::Widen { to } => widen_key(value, to),
        }
    }
}

/// Decide how outer keys are matched against inner keys.
pub fn reconcile_keys(outer: &FieldPath, inner: &FieldPath) -> Result<KeyCoercion, QueryError> {
    if outer.kind == inner.kind {
        return Ok(KeyCoercion::Identity);
    }
    if outer.kind.is_numeric() && inner.kind.is_numeric() {
        return Ok(KeyCoercion::Widen { to: inner.kind });
    }

    Err(QueryError::JoinKeyTypeMismatch {
        outer_field: outer.name.clone(),
        outer_kind: outer.kind,
        inner_field: inner.name.clone(),
        inner_kind: inner.kind,
    })
}

/// Pair `outer` with a filtered `inner` source.
///
/// The returned query's shape is `Pair { outer: <outer shape>, inner: entity }`.
pub fn apply_join(
    schema: &Schema,
    outer: Query,
    spec: &JoinSpec,
    inner: Query,
) -> Result<Query, QueryError> {
    let expected_inner = CompositeShape::leaf(spec.entity.clone());
    if inner.shape() != &expected_inner {
        return Err(QueryError::RootMismatch {
            expected: spec.entity.clone(),
            found: inner.shape().to_string(),
        });
    }

    let outer_key = resolve_field(schema, outer.shape(), &spec.outer_key)?;
    let inner_key = resolve_direct(schema, &spec.entity, &spec.inner_key)?;
    let coercion = reconcile_keys(&outer_key, &inner_key)?;

    let (outer_node, outer_shape) = outer.into_parts();
    let (inner_node, _) = inner.into_parts();

    let node = QueryNode::Join(Box::new(JoinNode {
        outer: outer_node,
        inner: inner_node,
        outer_key,
        inner_key,
        coercion,
        kind: spec.kind,
    }));

    Ok(Query::from_parts(node, outer_shape.pair(spec.entity.clone())))
}
