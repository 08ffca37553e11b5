use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// CompareOp
///
/// Closed set of supported filter operators. Discriminants are stable and
/// feed plan fingerprints.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum CompareOp {
    Eq = 0x01,
    Ne = 0x02,
    Lt = 0x03,
    Lte = 0x04,
    Gt = 0x05,
    Gte = 0x06,
    In = 0x07,
    NotIn = 0x08,
    Contains = 0x09,
    StartsWith = 0x0a,
    EndsWith = 0x0b,
}

impl CompareOp {
    pub const ALL: [Self; 11] = [
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::In,
        Self::NotIn,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
    ];

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Operator token as accepted in query documents.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Contains => "Contains",
            Self::StartsWith => "StartsWith",
            Self::EndsWith => "EndsWith",
        }
    }

    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Lte | Self::Gt | Self::Gte)
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

///
/// UnknownOperator
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for CompareOp {
    type Err = UnknownOperator;

    // Tokens are exact and case-sensitive.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.token() == token)
            .ok_or_else(|| UnknownOperator(token.to_string()))
    }
}

///
/// FilterOp
///
/// Operator as registered on the builder. Unrecognised tokens are kept
/// verbatim and rejected when the predicate is compiled.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FilterOp {
    Compare(CompareOp),
    Unsupported(String),
}

impl FilterOp {
    #[must_use]
    pub fn parse(token: &str) -> Self {
        token
            .parse()
            .map_or_else(|_| Self::Unsupported(token.to_string()), Self::Compare)
    }
}

impl From<CompareOp> for FilterOp {
    fn from(op: CompareOp) -> Self {
        Self::Compare(op)
    }
}

impl From<&str> for FilterOp {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<String> for FilterOp {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare(op) => write!(f, "{op}"),
            Self::Unsupported(token) => f.write_str(token),
        }
    }
}

impl Serialize for FilterOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FilterOp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;

        Ok(Self::parse(&token))
    }
}

///
/// Combinator
/// How a condition joins the accumulated predicate.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

///
/// FilterCondition
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterCondition {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
    pub combinator: Combinator,
}

impl FilterCondition {
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
        combinator: Combinator,
    ) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
            combinator,
        }
    }

    #[must_use]
    pub fn and(field: impl Into<String>, op: impl Into<FilterOp>, value: impl Into<Value>) -> Self {
        Self::new(field, op, value, Combinator::And)
    }

    #[must_use]
    pub fn or(field: impl Into<String>, op: impl Into<FilterOp>, value: impl Into<Value>) -> Self {
        Self::new(field, op, value, Combinator::Or)
    }
}
