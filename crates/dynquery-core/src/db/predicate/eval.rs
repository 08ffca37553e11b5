use crate::{
    db::{
        predicate::{ComparePredicate, CompareOp, Predicate},
        resolve::FieldPresence,
        row::CompositeRow,
    },
    value::{Value, strict_eq, strict_order_cmp},
};
use std::cmp::Ordering;

impl Predicate {
    /// Evaluate against one row of the shape this predicate was compiled for.
    #[must_use]
    pub fn eval(&self, row: &CompositeRow) -> bool {
        match self {
            Self::True => true,
            Self::And(children) => children.iter().all(|child| child.eval(row)),
            Self::Or(children) => children.iter().any(|child| child.eval(row)),
            Self::Compare(compare) => compare.eval(row),
        }
    }
}

impl ComparePredicate {
    /// A missing field never satisfies any comparison, negated ones included.
    #[must_use]
    pub fn eval(&self, row: &CompositeRow) -> bool {
        match self.field.read(row) {
            FieldPresence::Present(actual) => eval_compare(actual, self.op, &self.value),
            FieldPresence::Missing => false,
        }
    }
}

fn eval_compare(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    match op {
        CompareOp::Eq => strict_eq(actual, expected) == Some(true),
        CompareOp::Ne => strict_eq(actual, expected) == Some(false),
        CompareOp::Lt => order_is(actual, expected, Ordering::is_lt),
        CompareOp::Lte => order_is(actual, expected, Ordering::is_le),
        CompareOp::Gt => order_is(actual, expected, Ordering::is_gt),
        CompareOp::Gte => order_is(actual, expected, Ordering::is_ge),
        CompareOp::In => actual.in_list(expected) == Some(true),
        CompareOp::NotIn => actual.in_list(expected) == Some(false),
        CompareOp::Contains => actual.text_contains(expected) == Some(true),
        CompareOp::StartsWith => actual.text_starts_with(expected) == Some(true),
        CompareOp::EndsWith => actual.text_ends_with(expected) == Some(true),
    }
}

fn order_is(actual: &Value, expected: &Value, pred: fn(Ordering) -> bool) -> bool {
    strict_order_cmp(actual, expected).is_some_and(pred)
}
