//! Runtime data model definitions.
//!
//! Types in `model` describe *what exists*: entity identifiers, declared field
//! types, and the schema registry the resolver consults. They carry no query
//! semantics of their own.

mod entity;
mod field;
mod schema;
mod tag;


pub use entity::EntityModel;
pub use field::{FieldKind, FieldModel};
pub use schema::{ModelError, Schema};
pub use tag::{EntityTag, EntityTagError};
