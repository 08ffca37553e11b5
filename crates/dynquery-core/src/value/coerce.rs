//! Module: value::coerce
//! Responsibility: convert dynamic literals into a field's declared kind.
//!
//! Coercion happens once, at compile time. Evaluation only ever compares
//! values of identical variants.

use crate::{error::QueryError, model::FieldKind, value::Value};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::str::FromStr;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coerce one scalar literal to the declared kind of `field`.
///
/// `Null` is accepted only when the field is nullable. Sequence literals are
/// never scalars and always fail.
pub fn coerce_literal(
    field: &str,
    value: &Value,
    kind: FieldKind,
    nullable: bool,
) -> Result<Value, QueryError> {
    if value.is_null() {
        return if nullable {
            Ok(Value::Null)
        } else {
            Err(mismatch(field, kind, value))
        };
    }

    convert(value, kind).ok_or_else(|| mismatch(field, kind, value))
}

/// Widen a join key value to the kind of the key it is matched against.
///
/// Returns `None` when the value is null or does not fit the target kind,
/// in which case the row cannot match.
#[must_use]
pub fn widen_key(value: &Value, to: FieldKind) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Decimal(_) | Value::Int(_) | Value::Uint(_) => convert(value, to),
        other if other.kind() == Some(to) => Some(other.clone()),
        _ => None,
    }
}

fn convert(value: &Value, kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Bool => to_bool(value).map(Value::Bool),
        FieldKind::Decimal => to_decimal(value).map(Value::Decimal),
        FieldKind::Int => to_int(value).map(Value::Int),
        FieldKind::Text => value.as_text().map(|s| Value::Text(s.to_string())),
        FieldKind::Timestamp => to_timestamp(value).map(Value::Timestamp),
        FieldKind::Uint => to_uint(value).map(Value::Uint),
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Text(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Decimal(d) => Some(*d),
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Uint(u) => Some(Decimal::from(*u)),
        Value::Text(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Uint(u) => i64::try_from(*u).ok(),
        Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_uint(value: &Value) -> Option<u64> {
    match value {
        Value::Uint(u) => Some(*u),
        Value::Int(i) => u64::try_from(*i).ok(),
        Value::Decimal(d) if d.fract().is_zero() => d.to_u64(),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Text(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn mismatch(field: &str, expected: FieldKind, value: &Value) -> QueryError {
    QueryError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: value.to_string(),
    }
}
