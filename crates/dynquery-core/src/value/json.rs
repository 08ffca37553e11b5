use crate::{error::QueryError, value::Value};
use rust_decimal::Decimal;
use serde_json::{Number, Value as JsonValue};
use std::str::FromStr;

impl Value {
    /// Convert a JSON literal from a query document into a `Value`.
    ///
    /// Integers become `Int` when they fit `i64` and `Uint` otherwise;
    /// fractional numbers become `Decimal`. Objects are rejected.
    pub fn from_json(json: &JsonValue) -> Result<Self, QueryError> {
        match json {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(b) => Ok(Self::Bool(*b)),
            JsonValue::Number(n) => number_to_value(n),
            JsonValue::String(s) => Ok(Self::Text(s.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            JsonValue::Object(_) => Err(QueryError::invalid_spec(
                "object literals are not valid filter values",
            )),
        }
    }
}

fn number_to_value(n: &Number) -> Result<Value, QueryError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::Uint(u));
    }

    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Value::Decimal)
        .map_err(|_| QueryError::invalid_spec(format!("number {text} is out of decimal range")))
}
