use crate::error::{Error, ErrorKind, ResponseErrorKind};
use dynquery_core::{
    db::{CompositeRow, CompositeShape, FlatRow, Flattener, query::PlanFingerprint},
    model::Schema,
};

///
/// Response
/// Materialized query result: rows in provider order plus the shape they match.
///

#[derive(Clone, Debug)]
pub struct Response {
    shape: CompositeShape,
    fingerprint: PlanFingerprint,
    rows: Vec<CompositeRow>,
}

impl Response {
    pub(crate) const fn new(
        shape: CompositeShape,
        fingerprint: PlanFingerprint,
        rows: Vec<CompositeRow>,
    ) -> Self {
        Self {
            shape,
            fingerprint,
            rows,
        }
    }

    #[must_use]
    pub const fn shape(&self) -> &CompositeShape {
        &self.shape
    }

    /// Fingerprint of the plan that produced these rows.
    #[must_use]
    pub const fn fingerprint(&self) -> PlanFingerprint {
        self.fingerprint
    }

    // ======================================================================
    // Cardinality
    // ======================================================================

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Require exactly one row.
    pub fn require_one(&self) -> Result<(), Error> {
        match self.rows.len() {
            1 => Ok(()),
            0 => Err(not_found(&self.shape)),
            n => Err(not_unique(&self.shape, n)),
        }
    }

    // ======================================================================
    // Row extractors
    // ======================================================================

    #[must_use]
    pub const fn rows(&self) -> &[CompositeRow] {
        self.rows.as_slice()
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<CompositeRow> {
        self.rows
    }

    /// Require exactly one row and return it.
    pub fn one(self) -> Result<CompositeRow, Error> {
        let count = self.rows.len();
        let mut rows = self.rows.into_iter();

        match (rows.next(), count) {
            (Some(row), 1) => Ok(row),
            (None, _) => Err(not_found(&self.shape)),
            (Some(_), n) => Err(not_unique(&self.shape, n)),
        }
    }

    /// Project every row into a flat name → value map.
    pub fn flatten(&self, schema: &Schema) -> Result<Vec<FlatRow>, Error> {
        Flattener::new(schema)
            .flatten_all(&self.shape, &self.rows)
            .map_err(Error::from)
    }
}

fn not_found(shape: &CompositeShape) -> Error {
    Error::new(
        ErrorKind::Response(ResponseErrorKind::NotFound),
        format!("no {shape} rows matched"),
    )
}

fn not_unique(shape: &CompositeShape, count: usize) -> Error {
    Error::new(
        ErrorKind::Response(ResponseErrorKind::NotUnique),
        format!("expected one {shape} row, found {count}"),
    )
}
