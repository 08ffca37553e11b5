use derive_more::Display;
use dynquery_core::error::{ErrorClass, QueryError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        let kind = match err.class() {
            ErrorClass::Schema => ErrorKind::Query(QueryErrorKind::Schema),
            ErrorClass::Operator => ErrorKind::Query(QueryErrorKind::Unsupported),
            ErrorClass::Type => ErrorKind::Query(QueryErrorKind::Type),
            ErrorClass::Configuration => ErrorKind::Query(QueryErrorKind::Invalid),
        };

        Self::new(kind, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    #[display("query.{_0}")]
    Query(QueryErrorKind),
    #[display("response.{_0}")]
    Response(ResponseErrorKind),
}

///
/// QueryErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// A field or entity is not part of the schema.
    Schema,

    /// An operator is unknown or not valid for the field type.
    Unsupported,

    /// A literal or join key does not fit the declared field type.
    Type,

    /// Builder state or a query document is malformed.
    Invalid,
}

///
/// ResponseErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ResponseErrorKind {
    /// Valid query, but no rows matched.
    NotFound,

    /// Query expected one row but matched many.
    NotUnique,
}
