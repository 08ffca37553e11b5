//! Deterministic, read-only explanation of query plans; must not execute or validate.

use crate::{
    db::{
        join::{JoinKind, KeyCoercion},
        predicate::{CompareOp, Predicate},
        query::plan::{Grouping, PlanFingerprint, Query, QueryNode},
    },
    model::EntityTag,
    value::Value,
};
use std::fmt::{self, Write as _};

///
/// ExplainPlan
///
/// Stable, deterministic representation of a `Query` for observability.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExplainPlan {
    pub shape: String,
    pub fingerprint: PlanFingerprint,
    pub root: ExplainNode,
    pub grouping: Option<Grouping>,
}

///
/// ExplainNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExplainNode {
    Scan {
        entity: EntityTag,
    },
    Filter {
        predicate: ExplainPredicate,
        input: Box<Self>,
    },
    Join {
        kind: JoinKind,
        outer_key: String,
        inner_key: String,
        coercion: KeyCoercion,
        outer: Box<Self>,
        inner: Box<Self>,
    },
    Page {
        skip: Option<usize>,
        take: Option<usize>,
        input: Box<Self>,
    },
}

///
/// ExplainPredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExplainPredicate {
    True,
    And(Vec<Self>),
    Or(Vec<Self>),
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
}

impl Query {
    #[must_use]
    pub fn explain(&self) -> ExplainPlan {
        ExplainPlan {
            shape: self.shape().to_string(),
            fingerprint: self.fingerprint(),
            root: ExplainNode::from_node(self.node()),
            grouping: self.grouping().cloned(),
        }
    }
}

impl ExplainNode {
    fn from_node(node: &QueryNode) -> Self {
        match node {
            QueryNode::Scan { entity } => Self::Scan {
                entity: entity.clone(),
            },
            QueryNode::Filter { input, predicate } => Self::Filter {
                predicate: ExplainPredicate::from_predicate(predicate),
                input: Box::new(Self::from_node(input)),
            },
            QueryNode::Join(join) => Self::Join {
                kind: join.kind,
                outer_key: join.outer_key.to_string(),
                inner_key: join.inner_key.to_string(),
                coercion: join.coercion,
                outer: Box::new(Self::from_node(&join.outer)),
                inner: Box::new(Self::from_node(&join.inner)),
            },
            QueryNode::Page { input, page } => Self::Page {
                skip: page.skip,
                take: page.take,
                input: Box::new(Self::from_node(input)),
            },
        }
    }

    fn render(&self, out: &mut String, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Self::Scan { entity } => writeln!(out, "{indent}Scan {entity}"),
            Self::Filter { predicate, input } => {
                writeln!(out, "{indent}Filter {predicate}")?;
                input.render(out, depth + 1)
            }
            Self::Join {
                kind,
                outer_key,
                inner_key,
                coercion,
                outer,
                inner,
            } => {
                write!(out, "{indent}Join {kind} on {outer_key} = {inner_key}")?;
                if let KeyCoercion::Widen { to } = coercion {
                    write!(out, " (widen to {to})")?;
                }
                writeln!(out)?;
                outer.render(out, depth + 1)?;
                inner.render(out, depth + 1)
            }
            Self::Page { skip, take, input } => {
                write!(out, "{indent}Page")?;
                if let Some(skip) = skip {
                    write!(out, " skip={skip}")?;
                }
                if let Some(take) = take {
                    write!(out, " take={take}")?;
                }
                writeln!(out)?;
                input.render(out, depth + 1)
            }
        }
    }
}

impl ExplainPredicate {
    fn from_predicate(predicate: &Predicate) -> Self {
        match predicate {
            Predicate::True => Self::True,
            Predicate::And(children) => {
                Self::And(children.iter().map(Self::from_predicate).collect())
            }
            Predicate::Or(children) => {
                Self::Or(children.iter().map(Self::from_predicate).collect())
            }
            Predicate::Compare(compare) => Self::Compare {
                field: compare.field.to_string(),
                op: compare.op,
                value: compare.value.clone(),
            },
        }
    }
}

impl fmt::Display for ExplainPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("TRUE"),
            Self::And(children) => write_joined(f, children, " AND "),
            Self::Or(children) => write_joined(f, children, " OR "),
            Self::Compare { field, op, value } => write!(f, "{field} {op} {value}"),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    children: &[ExplainPredicate],
    sep: &str,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = String::new();
        self.root.render(&mut body, 1)?;

        writeln!(f, "Query {} [{}]", self.shape, self.fingerprint.short())?;
        f.write_str(&body)?;

        if let Some(grouping) = &self.grouping {
            if !grouping.keys.is_empty() {
                writeln!(f, "  GroupBy {}", grouping.keys.join(", "))?;
            }
            for aggregate in &grouping.aggregates {
                writeln!(
                    f,
                    "  Aggregate {}({}) AS {}",
                    aggregate.function, aggregate.field, aggregate.alias
                )?;
            }
        }

        Ok(())
    }
}
