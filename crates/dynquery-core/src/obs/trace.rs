//! Query compile tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect compile semantics.

use crate::{
    db::{join::JoinKind, query::PlanFingerprint},
    error::{ErrorClass, QueryError},
    model::EntityTag,
};

///
/// QueryTraceSink
///

pub trait QueryTraceSink: Send + Sync {
    fn on_event(&self, event: QueryTraceEvent);
}

///
/// QueryTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryTraceEvent {
    CompileStart {
        root: EntityTag,
        joins: u32,
    },
    FilterApplied {
        entity: EntityTag,
        conditions: u32,
    },
    /// Filters registered for an entity that is neither the root nor joined.
    DeadFilter {
        entity: EntityTag,
        conditions: u32,
    },
    JoinApplied {
        depth: u32,
        entity: EntityTag,
        kind: JoinKind,
    },
    CompileFinish {
        fingerprint: PlanFingerprint,
        joins: u32,
    },
    CompileError {
        class: ErrorClass,
    },
}

///
/// TraceScope
///

pub(crate) struct TraceScope {
    sink: &'static dyn QueryTraceSink,
}

impl TraceScope {
    pub(crate) fn start(
        sink: Option<&'static dyn QueryTraceSink>,
        root: &EntityTag,
        joins: usize,
    ) -> Option<Self> {
        let sink = sink?;
        sink.on_event(QueryTraceEvent::CompileStart {
            root: root.clone(),
            joins: saturating_u32(joins),
        });

        Some(Self { sink })
    }

    pub(crate) fn filter_applied(&self, entity: &EntityTag, conditions: usize) {
        self.sink.on_event(QueryTraceEvent::FilterApplied {
            entity: entity.clone(),
            conditions: saturating_u32(conditions),
        });
    }

    pub(crate) fn dead_filter(&self, entity: &EntityTag, conditions: usize) {
        self.sink.on_event(QueryTraceEvent::DeadFilter {
            entity: entity.clone(),
            conditions: saturating_u32(conditions),
        });
    }

    pub(crate) fn join_applied(&self, depth: usize, entity: &EntityTag, kind: JoinKind) {
        self.sink.on_event(QueryTraceEvent::JoinApplied {
            depth: saturating_u32(depth),
            entity: entity.clone(),
            kind,
        });
    }

    pub(crate) fn finish(self, fingerprint: PlanFingerprint, joins: usize) {
        self.sink.on_event(QueryTraceEvent::CompileFinish {
            fingerprint,
            joins: saturating_u32(joins),
        });
    }

    pub(crate) fn error(self, err: &QueryError) {
        self.sink
            .on_event(QueryTraceEvent::CompileError { class: err.class() });
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
