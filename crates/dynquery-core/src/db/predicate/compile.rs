use crate::{
    db::{
        predicate::{ComparePredicate, CompareOp, FilterCondition, FilterOp, Predicate},
        resolve::{FieldPath, resolve_field},
        shape::CompositeShape,
    },
    error::QueryError,
    model::Schema,
    value::{Value, coerce_literal},
};

/// Compile an ordered condition list into one predicate over `shape`.
///
/// Zero conditions compile to `Predicate::True`. The first condition seeds
/// the accumulator; its combinator is ignored.
pub fn compile_predicate(
    schema: &Schema,
    shape: &CompositeShape,
    conditions: &[FilterCondition],
) -> Result<Predicate, QueryError> {
    let mut acc: Option<Predicate> = None;

    for condition in conditions {
        let next = compile_condition(schema, shape, condition)?;

        acc = Some(match acc {
            None => next,
            Some(acc) => acc.combine(condition.combinator, next),
        });
    }

    Ok(acc.unwrap_or(Predicate::True))
}

fn compile_condition(
    schema: &Schema,
    shape: &CompositeShape,
    condition: &FilterCondition,
) -> Result<Predicate, QueryError> {
    let field = resolve_field(schema, shape, &condition.field)?;

    let op = match &condition.op {
        FilterOp::Compare(op) => *op,
        FilterOp::Unsupported(token) => {
            return Err(QueryError::unsupported_operator(token, &field.name, None));
        }
    };

    let value = compile_literal(&field, op, &condition.value)?;

    Ok(Predicate::Compare(ComparePredicate { field, op, value }))
}

// Validate the operator against the field kind and coerce the literal.
fn compile_literal(field: &FieldPath, op: CompareOp, value: &Value) -> Result<Value, QueryError> {
    if op.is_text() && !field.kind.is_text() {
        return Err(QueryError::unsupported_operator(
            op,
            &field.name,
            Some(field.kind),
        ));
    }
    if op.is_ordering() && !field.kind.is_orderable() {
        return Err(QueryError::unsupported_operator(
            op,
            &field.name,
            Some(field.kind),
        ));
    }

    match op {
        CompareOp::Eq | CompareOp::Ne => {
            coerce_literal(&field.name, value, field.kind, field.nullable)
        }
        CompareOp::In | CompareOp::NotIn => candidate_set(field, value),
        _ => coerce_literal(&field.name, value, field.kind, false),
    }
}

// Sequences, tuples and single scalars all normalize into a candidate list.
fn candidate_set(field: &FieldPath, value: &Value) -> Result<Value, QueryError> {
    let items: &[Value] = match value {
        Value::List(items) | Value::Tuple(items) => items,
        scalar => std::slice::from_ref(scalar),
    };

    items
        .iter()
        .map(|item| coerce_literal(&field.name, item, field.kind, field.nullable))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}
