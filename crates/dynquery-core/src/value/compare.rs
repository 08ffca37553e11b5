use crate::value::Value;
use std::cmp::Ordering;

/// Strict equality for identical scalar variants.
///
/// Returns `None` for mismatched variants so callers can treat the comparison
/// as unknown rather than false. `Null` equals only `Null`.
#[must_use]
pub fn strict_eq(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(true),
        (Value::Null, _) | (_, Value::Null) => Some(false),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => Some(a == b),
        _ => strict_order_cmp(left, right).map(Ordering::is_eq),
    }
}

/// Strict comparator for identical orderable variants.
///
/// Returns `None` for mismatched or non-orderable variants.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

impl Value {
    /// Case-sensitive substring test; `None` unless both sides are text.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> Option<bool> {
        Some(self.as_text()?.contains(needle.as_text()?))
    }

    #[must_use]
    pub fn text_starts_with(&self, prefix: &Self) -> Option<bool> {
        Some(self.as_text()?.starts_with(prefix.as_text()?))
    }

    #[must_use]
    pub fn text_ends_with(&self, suffix: &Self) -> Option<bool> {
        Some(self.as_text()?.ends_with(suffix.as_text()?))
    }

    /// Membership test against a list or tuple of candidates.
    #[must_use]
    pub fn in_list(&self, haystack: &Self) -> Option<bool> {
        match haystack {
            Self::List(items) | Self::Tuple(items) => {
                Some(items.iter().any(|item| strict_eq(self, item) == Some(true)))
            }
            _ => None,
        }
    }
}
