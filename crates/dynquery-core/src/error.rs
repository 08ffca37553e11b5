use crate::model::{EntityTag, EntityTagError, FieldKind, ModelError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Structural failures detected while composing a query.
/// Every variant is fatal and surfaces before any data access occurs.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("field '{field}' not found on {searched}")]
    FieldNotFound { field: String, searched: String },

    #[error("operator '{op}' is not supported for field '{field}'{}", kind_suffix(.kind.as_ref()))]
    UnsupportedOperator {
        op: String,
        field: String,
        kind: Option<FieldKind>,
    },

    #[error("value {found} cannot be coerced to {expected} for field '{field}'")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: String,
    },

    #[error(
        "join key '{outer_field}' ({outer_kind}) is not compatible with '{inner_field}' ({inner_kind})"
    )]
    JoinKeyTypeMismatch {
        outer_field: String,
        outer_kind: FieldKind,
        inner_field: String,
        inner_kind: FieldKind,
    },

    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: EntityTag },

    #[error("root query yields {found}, expected '{expected}'")]
    RootMismatch { expected: EntityTag, found: String },

    #[error("invalid query spec: {message}")]
    InvalidSpec { message: String },

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    EntityTag(#[from] EntityTagError),
}

impl QueryError {
    pub(crate) fn field_not_found(field: &str, searched: impl fmt::Display) -> Self {
        Self::FieldNotFound {
            field: field.to_string(),
            searched: searched.to_string(),
        }
    }

    pub(crate) fn unsupported_operator(
        op: impl fmt::Display,
        field: &str,
        kind: Option<FieldKind>,
    ) -> Self {
        Self::UnsupportedOperator {
            op: op.to_string(),
            field: field.to_string(),
            kind,
        }
    }

    pub(crate) fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }

    /// Coarse classification used by callers that route on error category.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::FieldNotFound { .. } | Self::UnknownEntity { .. } | Self::Model(_) => {
                ErrorClass::Schema
            }
            Self::UnsupportedOperator { .. } => ErrorClass::Operator,
            Self::TypeMismatch { .. } | Self::JoinKeyTypeMismatch { .. } => ErrorClass::Type,
            Self::RootMismatch { .. } | Self::InvalidSpec { .. } | Self::EntityTag(_) => {
                ErrorClass::Configuration
            }
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

fn kind_suffix(kind: Option<&FieldKind>) -> String {
    kind.map_or_else(String::new, |kind| format!(" of type {kind}"))
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    Schema,
    Operator,
    Type,
    Configuration,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Schema => "schema",
            Self::Operator => "operator",
            Self::Type => "type",
            Self::Configuration => "configuration",
        };
        write!(f, "{label}")
    }
}
