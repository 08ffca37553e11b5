//! Module: db::query
//! Responsibility: builder state, the compile pipeline and the lazy plan it
//! produces.

mod builder;
mod compile;
mod explain;
mod plan;
mod spec;


// re-exports
pub use builder::QueryBuilder;
pub use explain::{ExplainNode, ExplainPlan, ExplainPredicate};
pub use plan::{AggregateSpec, Grouping, JoinNode, Page, PlanFingerprint, Query, QueryNode};
pub use spec::{FilterSpec, QuerySpec};
