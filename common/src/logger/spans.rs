use tracing::{Span, field};

use super::TraceId;

/// Create a root span for one command / job run.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        dataset = field::Empty
    )
}

/// Create a child span (inherits trace_id from the current root).
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name)
}
