use tracing::{Span, field};

use super::TraceId;

/// Root span for one runtime invocation.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
    )
}

/// Child span, inherits `trace_id` from the enclosing root span.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name, feed = field::Empty)
}

/// Span wrapping everything a single feed controller does.
pub fn feed_span(feed: &str) -> Span {
    tracing::info_span!("feed", feed = %feed)
}
