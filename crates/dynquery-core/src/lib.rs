//! Core runtime for dynquery: entity models, values, the predicate/join
//! composition engine, and the reference in-memory collaborator.
#![warn(unreachable_pub)]

pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Maximum length of an entity tag, in bytes.
pub const MAX_ENTITY_TAG_LEN: usize = 64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No executors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            join::JoinKind,
            predicate::{Combinator, CompareOp},
            query::QueryBuilder,
        },
        model::{EntityModel, EntityTag, FieldKind},
        traits::{EntityKind, EntityValue},
        value::Value,
    };
}
