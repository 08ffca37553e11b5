//! Observability: compile tracing boundary.
//!
//! The engine never logs on its own. Callers that want structured compile
//! events inject a `QueryTraceSink` into the builder.

pub mod trace;

// re-exports
pub use trace::{QueryTraceEvent, QueryTraceSink};
