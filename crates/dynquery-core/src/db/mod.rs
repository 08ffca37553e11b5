//! Query composition engine.
//!
//! Data flows leaf-first: `resolve` locates fields inside a `CompositeShape`,
//! `predicate` compiles filter conditions against resolved paths, `join`
//! pairs an accumulated query with a filtered inner source, and `query`
//! orchestrates the whole pipeline into a lazy `Query` plan. Execution is
//! delegated to a `QueryProvider` collaborator.

pub mod flatten;
pub mod join;
pub mod predicate;
pub mod query;
pub mod resolve;
pub mod row;
pub mod shape;
pub mod source;
pub mod store;

// re-exports
pub use flatten::{FlatRow, Flattener};
pub use join::{JoinKind, JoinSpec};
pub use query::{Query, QueryBuilder, QuerySpec};
pub use resolve::{Branch, FieldPath, FieldPresence};
pub use row::{CompositeRow, Record};
pub use shape::CompositeShape;
pub use source::{QueryProvider, RowStream, SourceRegistry};
pub use store::MemoryStore;
