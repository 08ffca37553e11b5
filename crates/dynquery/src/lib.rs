//! ## Crate layout
//! - `core`: entity models, values, the predicate/join composition engine and
//!   the reference in-memory store.
//! - `db`: session facade, materialized responses and re-exported query
//!   vocabulary.
//! - `error`: the public error taxonomy.
//!
//! The `prelude` module mirrors the surface most callers need to build and
//! run a query.

pub use dynquery_core as core;

pub mod db;
pub mod error;

/// re-exports
///
/// entity implementations need these, stops the user having to specify all
/// the dependencies in the Cargo.toml file manually
pub mod __reexports {
    pub use rust_decimal;
    pub use serde;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        core::{
            model::{EntityModel, EntityTag, FieldKind},
            traits::{EntityKind, EntityValue},
            value::Value,
        },
        db::{
            JoinKind, MemoryStore, QueryBuilder, QueryProvider as _, Response, Session,
            SourceRegistry as _,
            predicate::{Combinator, CompareOp},
        },
    };
}
