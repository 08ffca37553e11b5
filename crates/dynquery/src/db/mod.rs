mod response;
mod session;

pub use response::Response;
pub use session::Session;

///
/// Re-exports
/// Composition vocabulary, the collaborator seams and the reference store.
///
pub use dynquery_core::db::{
    Branch, CompositeRow, CompositeShape, FieldPath, FieldPresence, FlatRow, Flattener, JoinKind,
    JoinSpec, MemoryStore, Query, QueryBuilder, QueryProvider, QuerySpec, Record, RowStream,
    SourceRegistry, predicate,
};

pub mod plan {
    pub use dynquery_core::db::query::{
        AggregateSpec, ExplainNode, ExplainPlan, ExplainPredicate, FilterSpec, Grouping, JoinNode,
        Page, PlanFingerprint, QueryNode,
    };
}
