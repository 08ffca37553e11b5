use crate::{
    db::{
        predicate::{
            CompareOp, Combinator, FilterCondition, FilterOp, Predicate, compile_predicate,
        },
        row::CompositeRow,
        shape::CompositeShape,
        source::SourceRegistry,
    },
    error::QueryError,
    model::FieldKind,
    test_fixtures::{PRODUCT, USER, USERS, sales_store, user_store},
    traits::EntityValue,
    value::Value,
};
use proptest::prelude::*;

// ---- helpers -----------------------------------------------------------

fn user_rows() -> Vec<CompositeRow> {
    USERS
        .iter()
        .map(|user| CompositeRow::Entity(user.to_record()))
        .collect()
}

fn compile_users(conditions: &[FilterCondition]) -> Result<Predicate, QueryError> {
    let store = user_store();

    compile_predicate(store.schema(), &CompositeShape::leaf(USER), conditions)
}

fn matching_names(predicate: &Predicate) -> Vec<&'static str> {
    USERS
        .iter()
        .zip(user_rows())
        .filter(|(_, row)| predicate.eval(row))
        .map(|(user, _)| user.name)
        .collect()
}

fn names_for(conditions: &[FilterCondition]) -> Vec<&'static str> {
    let predicate = compile_users(conditions).expect("conditions compile");

    matching_names(&predicate)
}

// ---- composition -------------------------------------------------------

#[test]
fn zero_conditions_compile_to_identity() {
    let predicate = compile_users(&[]).expect("empty list compiles");

    assert_eq!(predicate, Predicate::True);
    assert_eq!(matching_names(&predicate).len(), USERS.len());
}

#[test]
fn age_window_and_active_flag_select_two_users() {
    let names = names_for(&[
        FilterCondition::and("Age", ">", 30),
        FilterCondition::and("Age", "<", 50),
        FilterCondition::and("IsActive", "==", true),
    ]);

    assert_eq!(names, vec!["Jack", "Glade"]);
}

#[test]
fn mixed_chain_folds_left_to_right() {
    let predicate = compile_users(&[
        FilterCondition::and("Name", "==", "Jack"),
        FilterCondition::or("Name", "==", "Sara"),
        FilterCondition::and("IsActive", "==", false),
    ])
    .expect("compiles");

    // (Jack OR Sara) AND inactive, not Jack OR (Sara AND inactive).
    let Predicate::And(outer) = &predicate else {
        panic!("expected AND at the top, got {predicate:?}");
    };
    assert!(matches!(outer.as_slice(), [Predicate::Or(inner), Predicate::Compare(_)] if inner.len() == 2));
    assert_eq!(matching_names(&predicate), vec!["Sara"]);
}

#[test]
fn first_condition_combinator_is_ignored() {
    let as_or = names_for(&[FilterCondition::or("Age", ">", 45)]);
    let as_and = names_for(&[FilterCondition::and("Age", ">", 45)]);

    assert_eq!(as_or, as_and);
    assert_eq!(as_or, vec!["Sara", "Juli"]);
}

// ---- membership --------------------------------------------------------

#[test]
fn in_accepts_sequences_tuples_and_scalars() {
    let list = names_for(&[FilterCondition::and("Age", CompareOp::In, vec![40_i64, 48])]);
    let tuple = names_for(&[FilterCondition::and("Age", CompareOp::In, (40_i64, 48_i64))]);
    let scalar = names_for(&[FilterCondition::and("Age", CompareOp::In, 37)]);

    assert_eq!(list, vec!["Jack", "Sara"]);
    assert_eq!(tuple, list);
    assert_eq!(scalar, vec!["Glade"]);
}

#[test]
fn not_in_is_the_complement_of_in() {
    let not_in = names_for(&[FilterCondition::and("Age", "NOT IN", vec![40_i64, 48])]);

    assert_eq!(not_in, vec!["Glade", "Juli"]);
}

#[test]
fn in_candidates_are_coerced_to_field_kind() {
    let names = names_for(&[FilterCondition::and(
        "Age",
        CompareOp::In,
        Value::List(vec![Value::Text("40".into()), Value::Uint(52)]),
    )]);

    assert_eq!(names, vec!["Jack", "Juli"]);
}

// ---- text --------------------------------------------------------------

#[test]
fn text_operators_match_case_sensitively() {
    assert_eq!(
        names_for(&[FilterCondition::and("Name", "StartsWith", "J")]),
        vec!["Jack", "Juli"]
    );
    assert_eq!(
        names_for(&[FilterCondition::and("Name", "EndsWith", "a")]),
        vec!["Sara"]
    );
    assert_eq!(
        names_for(&[FilterCondition::and("Name", "Contains", "la")]),
        vec!["Glade"]
    );
    assert!(names_for(&[FilterCondition::and("Name", "Contains", "LA")]).is_empty());
}

// ---- errors ------------------------------------------------------------

#[test]
fn text_operator_on_numeric_field_is_unsupported() {
    let err = compile_users(&[FilterCondition::and("Age", "StartsWith", "4")])
        .expect_err("Age is not text");

    assert_eq!(
        err,
        QueryError::UnsupportedOperator {
            op: "StartsWith".to_string(),
            field: "Age".to_string(),
            kind: Some(FieldKind::Int),
        }
    );
}

#[test]
fn ordering_on_bool_field_is_unsupported() {
    let err = compile_users(&[FilterCondition::and("IsActive", ">", true)])
        .expect_err("bools are not ordered");

    assert!(matches!(err, QueryError::UnsupportedOperator { .. }));
}

#[test]
fn unknown_operator_token_is_rejected_by_name() {
    let condition = FilterCondition::and("Name", "LIKE", "J%");
    assert_eq!(condition.op, FilterOp::Unsupported("LIKE".to_string()));

    let err = compile_users(&[condition]).expect_err("LIKE is unknown");
    assert_eq!(
        err.to_string(),
        "operator 'LIKE' is not supported for field 'Name'"
    );
}

#[test]
fn operator_tokens_are_case_sensitive() {
    assert_eq!(FilterOp::from("IN"), FilterOp::Compare(CompareOp::In));
    assert_eq!(FilterOp::from("NOT IN"), FilterOp::Compare(CompareOp::NotIn));
    assert_eq!(FilterOp::from("in"), FilterOp::Unsupported("in".to_string()));
    assert_eq!(
        FilterOp::from("contains"),
        FilterOp::Unsupported("contains".to_string())
    );
}

#[test]
fn uncoercible_literal_is_a_type_mismatch() {
    let err = compile_users(&[FilterCondition::and("Age", ">", "old")])
        .expect_err("not a number");

    assert!(matches!(
        err,
        QueryError::TypeMismatch {
            expected: FieldKind::Int,
            ..
        }
    ));
}

#[test]
fn unknown_field_names_searched_shape() {
    let err = compile_users(&[FilterCondition::and("Email", "==", "x")])
        .expect_err("no such field");

    assert_eq!(
        err,
        QueryError::FieldNotFound {
            field: "Email".to_string(),
            searched: "User".to_string(),
        }
    );
}

#[test]
fn field_errors_surface_before_operator_errors() {
    let err = compile_users(&[FilterCondition::and("Email", "LIKE", "x")])
        .expect_err("no such field");

    assert!(matches!(err, QueryError::FieldNotFound { .. }));
}

// ---- nulls -------------------------------------------------------------

fn product_colors(conditions: &[FilterCondition]) -> Result<usize, QueryError> {
    let store = sales_store();
    let shape = CompositeShape::leaf(PRODUCT);
    let predicate = compile_predicate(store.schema(), &shape, conditions)?;
    let query = crate::db::query::Query::scan(PRODUCT).filter(predicate);

    let rows = crate::db::source::QueryProvider::execute(&store, &query)?.count();

    Ok(rows)
}

#[test]
fn null_literals_follow_field_nullability() {
    assert_eq!(
        product_colors(&[FilterCondition::and("Color", "==", Value::Null)]),
        Ok(1)
    );
    assert_eq!(
        product_colors(&[FilterCondition::and("Color", "!=", Value::Null)]),
        Ok(4)
    );
    assert!(matches!(
        product_colors(&[FilterCondition::and("Name", "==", Value::Null)]),
        Err(QueryError::TypeMismatch { .. })
    ));
}

#[test]
fn text_and_ordering_never_match_null_values() {
    assert_eq!(
        product_colors(&[FilterCondition::and("Color", "Contains", "e")]),
        Ok(2)
    );
    assert_eq!(
        product_colors(&[FilterCondition::and("Color", ">=", "")]),
        Ok(4)
    );
}

// ---- properties --------------------------------------------------------

fn arb_condition() -> impl Strategy<Value = FilterCondition> {
    (
        20_i64..60,
        prop_oneof![Just(">"), Just("<"), Just("=="), Just("!=")],
        any::<bool>(),
    )
        .prop_map(|(age, op, and)| {
            let combinator = if and { Combinator::And } else { Combinator::Or };
            FilterCondition::new("Age", op, age, combinator)
        })
}

// Reference left fold over plain booleans.
fn fold_reference(conditions: &[FilterCondition], age: i64) -> bool {
    let eval = |condition: &FilterCondition| {
        let Value::Int(literal) = condition.value else {
            unreachable!("ages are ints");
        };
        match &condition.op {
            FilterOp::Compare(CompareOp::Gt) => age > literal,
            FilterOp::Compare(CompareOp::Lt) => age < literal,
            FilterOp::Compare(CompareOp::Eq) => age == literal,
            FilterOp::Compare(CompareOp::Ne) => age != literal,
            other => unreachable!("unexpected op {other}"),
        }
    };

    let mut iter = conditions.iter();
    let Some(first) = iter.next() else {
        return true;
    };

    iter.fold(eval(first), |acc, condition| match condition.combinator {
        Combinator::And => acc && eval(condition),
        Combinator::Or => acc || eval(condition),
    })
}

proptest! {
    #[test]
    fn compiled_chain_matches_left_fold(conditions in prop::collection::vec(arb_condition(), 0..8)) {
        let predicate = compile_users(&conditions).expect("age conditions compile");

        for (user, row) in USERS.iter().zip(user_rows()) {
            prop_assert_eq!(predicate.eval(&row), fold_reference(&conditions, user.age));
        }
        prop_assert_eq!(predicate.leaf_count(), conditions.len());
    }

    #[test]
    fn not_in_complements_in(ages in prop::collection::vec(30_i64..60, 0..6)) {
        let inside = compile_users(&[FilterCondition::and("Age", CompareOp::In, ages.clone())])
            .expect("IN compiles");
        let outside = compile_users(&[FilterCondition::and("Age", CompareOp::NotIn, ages)])
            .expect("NOT IN compiles");

        for row in user_rows() {
            prop_assert_ne!(inside.eval(&row), outside.eval(&row));
        }
    }
}
