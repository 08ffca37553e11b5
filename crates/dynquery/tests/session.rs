use dynquery::{
    core::obs::{QueryTraceEvent, QueryTraceSink},
    db::{CompositeRow, QuerySpec, plan::PlanFingerprint},
    error::{ErrorKind, QueryErrorKind, ResponseErrorKind},
    prelude::*,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Mutex;

// ---- entities ----------------------------------------------------------

const EMPLOYEE: EntityTag = EntityTag::from_static("Employee");
const DEPARTMENT: EntityTag = EntityTag::from_static("Department");

struct Employee {
    id: u64,
    name: &'static str,
    department: Option<u64>,
    salary: Decimal,
}

impl EntityKind for Employee {
    const TAG: EntityTag = EMPLOYEE;

    fn model() -> EntityModel {
        EntityModel::new(EMPLOYEE)
            .field("Id", FieldKind::Uint)
            .field("Name", FieldKind::Text)
            .nullable_field("DepartmentId", FieldKind::Uint)
            .field("Salary", FieldKind::Decimal)
    }
}

impl EntityValue for Employee {
    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.name.into(),
            self.department.into(),
            self.salary.into(),
        ]
    }
}

struct Department {
    id: i64,
    title: &'static str,
}

impl EntityKind for Department {
    const TAG: EntityTag = DEPARTMENT;

    fn model() -> EntityModel {
        EntityModel::new(DEPARTMENT)
            .field("Id", FieldKind::Int)
            .field("Title", FieldKind::Text)
    }
}

impl EntityValue for Department {
    fn values(&self) -> Vec<Value> {
        vec![self.id.into(), self.title.into()]
    }
}

fn store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.register_entity::<Employee>().expect("Employee");
    store.register_entity::<Department>().expect("Department");

    let employees = [
        Employee {
            id: 1,
            name: "Ada",
            department: Some(10),
            salary: Decimal::new(120_000, 0),
        },
        Employee {
            id: 2,
            name: "Brian",
            department: Some(20),
            salary: Decimal::new(85_500, 0),
        },
        Employee {
            id: 3,
            name: "Cleo",
            department: None,
            salary: Decimal::new(60_000, 0),
        },
        Employee {
            id: 4,
            name: "Dev",
            department: Some(10),
            salary: Decimal::new(99_999, 0),
        },
    ];
    let departments = [
        Department {
            id: 10,
            title: "Engineering",
        },
        Department {
            id: 20,
            title: "Sales",
        },
    ];

    store.extend_entities(&employees).expect("employees");
    store.extend_entities(&departments).expect("departments");

    store
}

fn names(rows: &[CompositeRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.root().get(1))
        .filter_map(|value| value.as_text().map(str::to_string))
        .collect()
}

// ---- entities as values -------------------------------------------------

#[test]
fn field_values_follow_the_model() {
    let cleo = Employee {
        id: 3,
        name: "Cleo",
        department: None,
        salary: Decimal::new(60_000, 0),
    };

    assert_eq!(cleo.field_value("Name"), Some(Value::from("Cleo")));
    assert_eq!(cleo.field_value("DepartmentId"), Some(Value::Null));
    assert_eq!(cleo.field_value("Title"), None);
    assert_eq!(cleo.to_record().get(0), Some(&Value::Uint(3)));
}

// ---- session -----------------------------------------------------------

#[test]
fn fetch_flat_joins_and_projects() {
    let store = store();
    let session = Session::new(&store);

    // Uint department ids widen onto the Int department key.
    let builder = QueryBuilder::for_entity::<Employee>()
        .filter("Salary", ">=", "90000")
        .inner_join(DEPARTMENT, "DepartmentId", "Id");

    let rows = session.fetch_flat(&builder).expect("runs");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("Title"), Some(&Value::from("Engineering")));
    // Department.Id overwrites Employee.Id in the flat projection.
    assert_eq!(rows[0].get("Id"), Some(&Value::Int(10)));
    assert_eq!(
        rows[0].names().collect::<Vec<_>>(),
        vec!["Id", "Name", "DepartmentId", "Salary", "Title"]
    );
}

#[test]
fn left_join_without_department_projects_nulls() {
    let store = store();
    let session = Session::new(&store);
    let builder = QueryBuilder::new(EMPLOYEE)
        .filter("Name", "==", "Cleo")
        .left_join(DEPARTMENT, "DepartmentId", "Id");

    let rows = session.fetch_flat(&builder).expect("runs");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Title"), Some(&Value::Null));
    assert_eq!(rows[0].get("Id"), Some(&Value::Uint(3)));
}

#[test]
fn response_cardinality_guards() {
    let store = store();
    let session = Session::new(&store);

    let one = session
        .fetch(&QueryBuilder::new(EMPLOYEE).filter("Id", "==", 2))
        .expect("runs");
    assert!(one.require_one().is_ok());
    assert_eq!(names(&[one.one().expect("one row")]), vec!["Brian"]);

    let none = session
        .fetch(&QueryBuilder::new(EMPLOYEE).filter("Id", "==", 99))
        .expect("runs");
    assert!(none.is_empty());
    assert_eq!(
        none.require_one().map_err(|err| err.kind),
        Err(ErrorKind::Response(ResponseErrorKind::NotFound))
    );

    let many = session.fetch(&QueryBuilder::new(EMPLOYEE)).expect("runs");
    let err = many.one().expect_err("four rows");
    assert_eq!(err.kind, ErrorKind::Response(ResponseErrorKind::NotUnique));
    assert_eq!(err.message, "expected one Employee row, found 4");
}

#[test]
fn core_errors_map_to_public_kinds() {
    let store = store();
    let session = Session::new(&store);

    let cases = [
        (
            QueryBuilder::new(EMPLOYEE).filter("Missing", "==", 1),
            QueryErrorKind::Schema,
        ),
        (
            QueryBuilder::new(EMPLOYEE).filter("Name", "~=", "A"),
            QueryErrorKind::Unsupported,
        ),
        (
            QueryBuilder::new(EMPLOYEE).filter("Salary", ">", "lots"),
            QueryErrorKind::Type,
        ),
        (
            QueryBuilder::new(EMPLOYEE).inner_join(DEPARTMENT, "Name", "Id"),
            QueryErrorKind::Type,
        ),
    ];

    for (builder, expected) in cases {
        let err = session.fetch(&builder).expect_err("compile fails");
        assert_eq!(err.kind, ErrorKind::Query(expected), "{err}");
    }
}

#[test]
fn error_kinds_display_with_their_family() {
    assert_eq!(
        ErrorKind::Query(QueryErrorKind::Unsupported).to_string(),
        "query.Unsupported"
    );
    assert_eq!(
        ErrorKind::Response(ResponseErrorKind::NotFound).to_string(),
        "response.NotFound"
    );
}

#[test]
fn json_documents_run_through_the_session() {
    let store = store();
    let session = Session::new(&store);

    let response = session
        .fetch_json(
            r#"{
                "root": "Employee",
                "filters": [
                    { "field": "Name", "op": "StartsWith", "value": "A" },
                    { "field": "Name", "op": "EndsWith", "value": "v", "combinator": "Or" }
                ],
                "take": 5
            }"#,
        )
        .expect("runs");

    assert_eq!(names(response.rows()), vec!["Ada", "Dev"]);
}

#[test]
fn serialized_documents_round_trip_through_the_session() {
    let store = store();
    let session = Session::new(&store);

    let document = serde_json::json!({
        "root": "Employee",
        "filters": [{ "field": "Salary", "op": ">", "value": 90_000 }],
        "joins": [{
            "entity": "Department",
            "outer_key": "DepartmentId",
            "inner_key": "Id",
            "kind": "Inner"
        }],
        "take": 1
    });
    let spec: QuerySpec = serde_json::from_value(document).expect("valid document");
    let json = serde_json::to_string(&spec).expect("serializes");

    assert_eq!(QuerySpec::from_json_str(&json).expect("parses"), spec);

    let rows = session.fetch_json(&json).expect("runs").into_rows();
    assert_eq!(names(&rows), vec!["Ada"]);
}

#[test]
fn malformed_documents_are_invalid_queries() {
    let store = store();
    let session = Session::new(&store);

    let err = session.fetch_json("{ \"root\": 5 }").expect_err("not a tag");

    assert_eq!(err.kind, ErrorKind::Query(QueryErrorKind::Invalid));
}

#[test]
fn explain_and_response_share_a_fingerprint() {
    let store = store();
    let session = Session::new(&store);
    let builder = QueryBuilder::new(EMPLOYEE)
        .in_list("Id", [1_u64, 4])
        .skip(1);

    let explain = session.explain(&builder).expect("explains");
    let response = session.fetch(&builder).expect("runs");

    assert_eq!(explain.fingerprint, response.fingerprint());
    assert_eq!(names(response.rows()), vec!["Dev"]);
    assert!(explain.to_string().contains("Page skip=1"));
}

// ---- tracing -----------------------------------------------------------

struct Collect(Mutex<Vec<QueryTraceEvent>>);

impl QueryTraceSink for Collect {
    fn on_event(&self, event: QueryTraceEvent) {
        self.0.lock().expect("sink lock").push(event);
    }
}

static SINK: Collect = Collect(Mutex::new(Vec::new()));

#[test]
fn session_trace_sink_sees_every_compile() {
    let store = store();
    let session = Session::new(&store).trace(&SINK);

    let response = session
        .fetch(&QueryBuilder::new(EMPLOYEE).inner_join(DEPARTMENT, "DepartmentId", "Id"))
        .expect("runs");

    let events = std::mem::take(&mut *SINK.0.lock().expect("sink lock"));
    let finish: Vec<PlanFingerprint> = events
        .iter()
        .filter_map(|event| match event {
            QueryTraceEvent::CompileFinish { fingerprint, .. } => Some(*fingerprint),
            _ => None,
        })
        .collect();

    assert_eq!(finish, vec![response.fingerprint()]);
    assert_eq!(response.len(), 3);
}

// ---- properties --------------------------------------------------------

proptest! {
    #[test]
    fn builder_and_document_agree(threshold in 50_000_i64..130_000, or_name in any::<bool>()) {
        let store = store();
        let session = Session::new(&store);

        let mut builder = QueryBuilder::new(EMPLOYEE).filter("Salary", ">", threshold);
        let mut filters = format!(r#"{{ "field": "Salary", "op": ">", "value": {threshold} }}"#);
        if or_name {
            builder = builder.or_else("Name", "==", "Cleo");
            filters.push_str(r#", { "field": "Name", "op": "==", "value": "Cleo", "combinator": "Or" }"#);
        }
        let json = format!(r#"{{ "root": "Employee", "filters": [{filters}] }}"#);

        let from_builder = session.fetch(&builder).expect("builder runs");
        let from_json = session.fetch_json(&json).expect("document runs");

        prop_assert_eq!(from_builder.fingerprint(), from_json.fingerprint());
        prop_assert_eq!(names(from_builder.rows()), names(from_json.rows()));
    }
}
