//! Pre-built [`tracing::Span`] constructors.
//!
//! Consistent span names and field sets make it easy to filter and
//! correlate log lines for one block or one request.

use tracing::{info_span, Span};

/// Span covering one block: fetch, event dispatch, cursor write.
pub fn block_span(height: u64) -> Span {
    info_span!("block", height)
}

/// Span covering one program transition.
pub fn event_span(function: &str, transition: &str) -> Span {
    info_span!("event", function = %function, transition = %transition)
}

/// Span covering one read API request.
pub fn rpc_span(route: &'static str) -> Span {
    info_span!("rpc", route)
}
