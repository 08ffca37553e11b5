mod coerce;
mod compare;
mod json;


use crate::model::FieldKind;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// re-exports
pub use coerce::{coerce_literal, widen_key};
pub use compare::{strict_eq, strict_order_cmp};

///
/// Value
/// Dynamic literal and row value.
///
/// Null     → the field holds no value (nullable fields only).
/// List     → a sequence literal, e.g. the candidate set of an IN filter.
/// Tuple    → a fixed-size literal group; normalized like a list for IN.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Decimal(Decimal),
    Int(i64),
    List(Vec<Self>),
    Text(String),
    Timestamp(NaiveDateTime),
    Tuple(Vec<Self>),
    Uint(u64),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Declared field kind this value stores as, if scalar and non-null.
    #[must_use]
    pub const fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Bool(_) => Some(FieldKind::Bool),
            Self::Decimal(_) => Some(FieldKind::Decimal),
            Self::Int(_) => Some(FieldKind::Int),
            Self::Text(_) => Some(FieldKind::Text),
            Self::Timestamp(_) => Some(FieldKind::Timestamp),
            Self::Uint(_) => Some(FieldKind::Uint),
            Self::Null | Self::List(_) | Self::Tuple(_) => None,
        }
    }

    /// Whether this value may be stored in a field of the given shape.
    #[must_use]
    pub fn fits(&self, kind: FieldKind, nullable: bool) -> bool {
        match self {
            Self::Null => nullable,
            other => other.kind() == Some(kind),
        }
    }

    #[must_use]
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            Self::Uint(v) => write!(f, "{v}"),
            Self::List(items) => write_items(f, '[', ']', items),
            Self::Tuple(items) => write_items(f, '(', ')', items),
        }
    }
}

fn write_items(
    f: &mut fmt::Formatter<'_>,
    open: char,
    close: char,
    items: &[Value],
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

///
/// From impls
///

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    Decimal => Decimal,
    NaiveDateTime => Timestamp,
    &str => Text,
    String => Text,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Self::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
