//! Module: db::query::plan
//! Responsibility: the lazy, executor-agnostic query plan.
//! Does not own: compilation policy or execution.

use crate::{
    db::{
        join::{JoinKind, KeyCoercion},
        predicate::{
            Predicate,
            fingerprint::{hash_field_path, hash_predicate, write_len_u32, write_str, write_tag},
        },
        resolve::FieldPath,
        shape::CompositeShape,
    },
    model::EntityTag,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

///
/// Query
///
/// Unexecuted plan plus the shape of the rows it yields. Building a query
/// performs no I/O; a `QueryProvider` materializes it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    node: QueryNode,
    shape: CompositeShape,
    grouping: Option<Grouping>,
}

impl Query {
    /// Full extent of one entity.
    #[must_use]
    pub fn scan(entity: EntityTag) -> Self {
        Self {
            node: QueryNode::Scan {
                entity: entity.clone(),
            },
            shape: CompositeShape::leaf(entity),
            grouping: None,
        }
    }

    pub(crate) const fn from_parts(node: QueryNode, shape: CompositeShape) -> Self {
        Self {
            node,
            shape,
            grouping: None,
        }
    }

    pub(crate) fn into_parts(self) -> (QueryNode, CompositeShape) {
        (self.node, self.shape)
    }

    /// Restrict rows by `predicate`. A trivial predicate passes through.
    #[must_use]
    pub fn filter(self, predicate: Predicate) -> Self {
        if predicate.is_trivial() {
            return self;
        }

        Self {
            node: QueryNode::Filter {
                input: Box::new(self.node),
                predicate,
            },
            ..self
        }
    }

    /// Attach a final page window. An empty page passes through.
    #[must_use]
    pub fn page(self, page: Page) -> Self {
        if page.is_empty() {
            return self;
        }

        Self {
            node: QueryNode::Page {
                input: Box::new(self.node),
                page,
            },
            ..self
        }
    }

    #[must_use]
    pub(crate) fn with_grouping(mut self, grouping: Option<Grouping>) -> Self {
        self.grouping = grouping;
        self
    }

    #[must_use]
    pub const fn node(&self) -> &QueryNode {
        &self.node
    }

    /// Element shape of the rows this query yields.
    #[must_use]
    pub const fn shape(&self) -> &CompositeShape {
        &self.shape
    }

    /// Grouping and aggregate descriptors, carried for the executor.
    #[must_use]
    pub const fn grouping(&self) -> Option<&Grouping> {
        self.grouping.as_ref()
    }

    /// Stable hash of the plan tree, predicates and literals.
    #[must_use]
    pub fn fingerprint(&self) -> PlanFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"planfp:v1");
        hash_node(&mut hasher, &self.node);
        if let Some(grouping) = &self.grouping {
            write_tag(&mut hasher, 0x60);
            grouping.hash_into(&mut hasher);
        }

        PlanFingerprint(hasher.finalize().into())
    }
}

///
/// QueryNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryNode {
    Scan {
        entity: EntityTag,
    },
    Filter {
        input: Box<Self>,
        predicate: Predicate,
    },
    Join(Box<JoinNode>),
    Page {
        input: Box<Self>,
        page: Page,
    },
}

///
/// JoinNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinNode {
    pub outer: QueryNode,
    pub inner: QueryNode,
    pub outer_key: FieldPath,
    pub inner_key: FieldPath,
    pub coercion: KeyCoercion,
    pub kind: JoinKind,
}

///
/// Page
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Page {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub take: Option<usize>,
}

impl Page {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.skip.is_none() && self.take.is_none()
    }
}

///
/// AggregateSpec
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct AggregateSpec {
    pub field: String,
    pub function: String,
    pub alias: String,
}

///
/// Grouping
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Grouping {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,
}

impl Grouping {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.aggregates.is_empty()
    }

    fn hash_into(&self, hasher: &mut Sha256) {
        write_len_u32(hasher, self.keys.len());
        for key in &self.keys {
            write_str(hasher, key);
        }
        write_len_u32(hasher, self.aggregates.len());
        for aggregate in &self.aggregates {
            write_str(hasher, &aggregate.field);
            write_str(hasher, &aggregate.function);
            write_str(hasher, &aggregate.alias);
        }
    }
}

///
/// PlanFingerprint
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PlanFingerprint([u8; 32]);

impl PlanFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex digits, for compact diagnostics.
    #[must_use]
    pub fn short(&self) -> String {
        let mut out = self.to_string();
        out.truncate(8);
        out
    }
}

impl fmt::Display for PlanFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn hash_node(hasher: &mut Sha256, node: &QueryNode) {
    match node {
        QueryNode::Scan { entity } => {
            write_tag(hasher, 0x50);
            write_str(hasher, entity.as_str());
        }
        QueryNode::Filter { input, predicate } => {
            write_tag(hasher, 0x51);
            hash_node(hasher, input);
            hash_predicate(hasher, predicate);
        }
        QueryNode::Join(join) => {
            write_tag(hasher, 0x52);
            write_tag(hasher, join.kind.tag());
            hash_node(hasher, &join.outer);
            hash_node(hasher, &join.inner);
            hash_field_path(hasher, &join.outer_key);
            hash_field_path(hasher, &join.inner_key);
            write_tag(hasher, join.coercion.tag());
        }
        QueryNode::Page { input, page } => {
            write_tag(hasher, 0x53);
            hash_node(hasher, input);
            write_opt_len(hasher, page.skip);
            write_opt_len(hasher, page.take);
        }
    }
}

fn write_opt_len(hasher: &mut Sha256, len: Option<usize>) {
    match len {
        Some(len) => {
            write_tag(hasher, 1);
            write_len_u32(hasher, len);
        }
        None => write_tag(hasher, 0),
    }
}
