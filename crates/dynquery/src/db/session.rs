use crate::{db::response::Response, error::Error};
use dynquery_core::{
    db::{
        FlatRow, QueryBuilder, QueryProvider, QuerySpec, SourceRegistry,
        query::{ExplainPlan, Query},
    },
    obs::QueryTraceSink,
};

///
/// Session
/// Public facade over one collaborator that both resolves sources and
/// executes plans. Converts core errors into `dynquery::Error`.
///

pub struct Session<'a, P>
where
    P: QueryProvider + SourceRegistry + ?Sized,
{
    provider: &'a P,
    trace: Option<&'static dyn QueryTraceSink>,
}

impl<'a, P> Session<'a, P>
where
    P: QueryProvider + SourceRegistry + ?Sized,
{
    #[must_use]
    pub const fn new(provider: &'a P) -> Self {
        Self {
            provider,
            trace: None,
        }
    }

    /// Install a compile trace sink on every builder run through this session.
    #[must_use]
    pub const fn trace(mut self, sink: &'static dyn QueryTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    // ======================================================================
    // Compilation
    // ======================================================================

    /// Compile without executing.
    pub fn compile(&self, builder: &QueryBuilder) -> Result<Query, Error> {
        let query = match self.trace {
            Some(sink) => builder.clone().trace(sink).compile_from(self.provider)?,
            None => builder.compile_from(self.provider)?,
        };

        Ok(query)
    }

    /// Compile and return the explained plan.
    pub fn explain(&self, builder: &QueryBuilder) -> Result<ExplainPlan, Error> {
        Ok(self.compile(builder)?.explain())
    }

    // ======================================================================
    // Execution
    // ======================================================================

    /// Compile, execute and collect every row.
    pub fn fetch(&self, builder: &QueryBuilder) -> Result<Response, Error> {
        let query = self.compile(builder)?;
        let rows = self.provider.execute(&query)?.collect();

        Ok(Response::new(query.shape().clone(), query.fingerprint(), rows))
    }

    /// Fetch and flatten in one step.
    pub fn fetch_flat(&self, builder: &QueryBuilder) -> Result<Vec<FlatRow>, Error> {
        self.fetch(builder)?.flatten(self.provider.schema())
    }

    /// Run a JSON query document.
    pub fn fetch_json(&self, json: &str) -> Result<Response, Error> {
        let spec = QuerySpec::from_json_str(json)?;
        let builder = QueryBuilder::from_spec(&spec)?;

        self.fetch(&builder)
    }
}
