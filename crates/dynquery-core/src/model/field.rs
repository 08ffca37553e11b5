use serde::{Deserialize, Serialize};
use std::fmt;

///
/// FieldKind
///
/// Declared scalar type of one entity field.
/// Literals are coerced to this type at compile time.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum FieldKind {
    Bool,
    Decimal,
    Int,
    Text,
    Timestamp,
    Uint,
}

impl FieldKind {
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Integer, unsigned and decimal fields widen into each other.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Decimal | Self::Int | Self::Uint)
    }

    #[must_use]
    pub const fn is_orderable(self) -> bool {
        !matches!(self, Self::Bool)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

///
/// FieldModel
/// Runtime field metadata used by resolution and coercion.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldModel {
    /// Field name as used in filters and join keys.
    pub name: String,
    pub kind: FieldKind,
    /// Whether the field may hold `Value::Null`.
    #[serde(default)]
    pub nullable: bool,
}

impl FieldModel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    #[must_use]
    pub fn nullable(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
        }
    }
}
