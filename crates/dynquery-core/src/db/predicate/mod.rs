//! Module: db::predicate
//! Responsibility: filter vocabulary, compilation into resolved predicate
//! trees, runtime evaluation and fingerprint hashing.
//! Does not own: join planning or execution order.

mod compile;
mod eval;
pub(crate) mod fingerprint;
mod model;

#[cfg(test)]
mod tests;

use crate::{db::resolve::FieldPath, value::Value};

// re-exports
pub use compile::compile_predicate;
pub use model::{CompareOp, Combinator, FilterCondition, FilterOp, UnknownOperator};

///
/// ComparePredicate
///
/// One comparison against a resolved field. `value` is already coerced to
/// the field's kind; for `In`/`NotIn` it is a `Value::List` of candidates.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub field: FieldPath,
    pub op: CompareOp,
    pub value: Value,
}

///
/// Predicate
///
/// Compiled boolean tree. Mixed AND/OR chains are folded strictly left to
/// right, so `a AND b OR c` is `Or([And([a, b]), c])`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    True,
    And(Vec<Self>),
    Or(Vec<Self>),
    Compare(ComparePredicate),
}

impl Predicate {
    #[must_use]
    pub const fn is_trivial(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Fold `next` onto this predicate with the given combinator.
    #[must_use]
    pub fn combine(self, combinator: Combinator, next: Self) -> Self {
        match combinator {
            Combinator::And => Self::And(vec![self, next]),
            Combinator::Or => Self::Or(vec![self, next]),
        }
    }

    /// Number of comparison leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::True => 0,
            Self::Compare(_) => 1,
            Self::And(children) | Self::Or(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }
}
