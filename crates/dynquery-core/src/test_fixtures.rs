//! Shared test entities, schemas and stores.

use crate::{
    db::store::MemoryStore,
    model::{EntityModel, EntityTag, FieldKind},
    obs::{QueryTraceEvent, QueryTraceSink},
    traits::{EntityKind, EntityValue},
    value::Value,
};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Mutex;

pub(crate) const USER: EntityTag = EntityTag::from_static("User");
pub(crate) const PRODUCT: EntityTag = EntityTag::from_static("Product");
pub(crate) const ORDER_DETAIL: EntityTag = EntityTag::from_static("OrderDetail");
pub(crate) const ORDER_HEADER: EntityTag = EntityTag::from_static("OrderHeader");

///
/// User
///

pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) name: &'static str,
    pub(crate) age: i64,
    pub(crate) is_active: bool,
}

impl EntityKind for User {
    const TAG: EntityTag = USER;

    fn model() -> EntityModel {
        EntityModel::new(USER)
            .field("Id", FieldKind::Int)
            .field("Name", FieldKind::Text)
            .field("Age", FieldKind::Int)
            .field("IsActive", FieldKind::Bool)
    }
}

impl EntityValue for User {
    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.name.into(),
            self.age.into(),
            self.is_active.into(),
        ]
    }
}

pub(crate) const USERS: [User; 4] = [
    User {
        id: 1,
        name: "Jack",
        age: 40,
        is_active: true,
    },
    User {
        id: 2,
        name: "Glade",
        age: 37,
        is_active: true,
    },
    User {
        id: 3,
        name: "Sara",
        age: 48,
        is_active: false,
    },
    User {
        id: 4,
        name: "Juli",
        age: 52,
        is_active: false,
    },
];

///
/// Product
///

pub(crate) struct Product {
    pub(crate) product_id: i64,
    pub(crate) name: &'static str,
    pub(crate) color: Option<&'static str>,
    pub(crate) list_price: Decimal,
}

impl EntityKind for Product {
    const TAG: EntityTag = PRODUCT;

    fn model() -> EntityModel {
        EntityModel::new(PRODUCT)
            .field("ProductID", FieldKind::Int)
            .field("Name", FieldKind::Text)
            .nullable_field("Color", FieldKind::Text)
            .field("ListPrice", FieldKind::Decimal)
    }
}

impl EntityValue for Product {
    fn values(&self) -> Vec<Value> {
        vec![
            self.product_id.into(),
            self.name.into(),
            self.color.into(),
            self.list_price.into(),
        ]
    }
}

///
/// OrderDetail
///

pub(crate) struct OrderDetail {
    pub(crate) detail_id: i64,
    pub(crate) sales_order_id: i64,
    pub(crate) product_id: i64,
    pub(crate) order_qty: i64,
    pub(crate) unit_price: Decimal,
}

impl EntityKind for OrderDetail {
    const TAG: EntityTag = ORDER_DETAIL;

    fn model() -> EntityModel {
        EntityModel::new(ORDER_DETAIL)
            .field("DetailID", FieldKind::Int)
            .field("SalesOrderID", FieldKind::Int)
            .field("ProductID", FieldKind::Int)
            .field("OrderQty", FieldKind::Int)
            .field("UnitPrice", FieldKind::Decimal)
    }
}

impl EntityValue for OrderDetail {
    fn values(&self) -> Vec<Value> {
        vec![
            self.detail_id.into(),
            self.sales_order_id.into(),
            self.product_id.into(),
            self.order_qty.into(),
            self.unit_price.into(),
        ]
    }
}

///
/// OrderHeader
///

pub(crate) struct OrderHeader {
    pub(crate) sales_order_id: i64,
    pub(crate) order_date: NaiveDateTime,
    pub(crate) customer_id: i64,
    pub(crate) total_due: Decimal,
}

impl EntityKind for OrderHeader {
    const TAG: EntityTag = ORDER_HEADER;

    fn model() -> EntityModel {
        EntityModel::new(ORDER_HEADER)
            .field("SalesOrderID", FieldKind::Int)
            .field("OrderDate", FieldKind::Timestamp)
            .field("CustomerID", FieldKind::Int)
            .field("TotalDue", FieldKind::Decimal)
    }
}

impl EntityValue for OrderHeader {
    fn values(&self) -> Vec<Value> {
        vec![
            self.sales_order_id.into(),
            self.order_date.into(),
            self.customer_id.into(),
            self.total_due.into(),
        ]
    }
}

// ---- builders ----------------------------------------------------------

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Store holding the four reference users.
pub(crate) fn user_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.register_entity::<User>().expect("register User");
    store.extend_entities(&USERS).expect("insert users");

    store
}

/// Store holding products, order details and order headers.
pub(crate) fn sales_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.register_entity::<Product>().expect("register Product");
    store
        .register_entity::<OrderDetail>()
        .expect("register OrderDetail");
    store
        .register_entity::<OrderHeader>()
        .expect("register OrderHeader");

    let products = [
        Product {
            product_id: 680,
            name: "HL Road Frame - Black, 58",
            color: Some("Black"),
            list_price: money(143_150),
        },
        Product {
            product_id: 707,
            name: "Sport-100 Helmet, Red",
            color: Some("Red"),
            list_price: money(3_499),
        },
        Product {
            product_id: 712,
            name: "AWC Logo Cap",
            color: None,
            list_price: money(899),
        },
        Product {
            product_id: 749,
            name: "Road-150 Red, 62",
            color: Some("Red"),
            list_price: money(357_827),
        },
        Product {
            product_id: 771,
            name: "Mountain-100 Black, 42",
            color: Some("Black"),
            list_price: money(337_499),
        },
    ];

    let details = [
        detail(110, 43_659, 771, 1, money(202_499)),
        detail(115, 43_659, 771, 3, money(202_499)),
        detail(116, 43_661, 712, 40, money(519)),
        detail(156, 43_660, 680, 25, money(87_479)),
        detail(157, 43_660, 707, 30, money(2_019)),
        detail(160, 43_661, 749, 2, money(214_696)),
    ];

    let headers = [
        OrderHeader {
            sales_order_id: 43_659,
            order_date: date(2011, 5, 31),
            customer_id: 29_825,
            total_due: money(2_311_675),
        },
        OrderHeader {
            sales_order_id: 43_660,
            order_date: date(2011, 6, 1),
            customer_id: 29_672,
            total_due: money(1_457_171),
        },
        OrderHeader {
            sales_order_id: 43_661,
            order_date: date(2011, 6, 2),
            customer_id: 29_734,
            total_due: money(3_695_398),
        },
    ];

    store.extend_entities(&products).expect("insert products");
    store.extend_entities(&details).expect("insert details");
    store.extend_entities(&headers).expect("insert headers");

    store
}

const fn detail(
    detail_id: i64,
    sales_order_id: i64,
    product_id: i64,
    order_qty: i64,
    unit_price: Decimal,
) -> OrderDetail {
    OrderDetail {
        detail_id,
        sales_order_id,
        product_id,
        order_qty,
        unit_price,
    }
}

// ---- tracing -----------------------------------------------------------

///
/// RecordingSink
///
/// Test sink that keeps every event. Declare one `static` per test so
/// parallel tests never share a buffer.
///

pub(crate) struct RecordingSink {
    events: Mutex<Vec<QueryTraceEvent>>,
}

impl RecordingSink {
    pub(crate) const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn take(&self) -> Vec<QueryTraceEvent> {
        std::mem::take(&mut *self.events.lock().expect("sink lock"))
    }
}

impl QueryTraceSink for RecordingSink {
    fn on_event(&self, event: QueryTraceEvent) {
        self.events.lock().expect("sink lock").push(event);
    }
}

// ---- row helpers -------------------------------------------------------

/// Text value of `field` on the root record of each row.
pub(crate) fn root_texts(rows: &[crate::db::row::CompositeRow], slot: usize) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.root().get(slot))
        .filter_map(|value| value.as_text().map(str::to_string))
        .collect()
}
