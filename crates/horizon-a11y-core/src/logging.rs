//! Logging facilities for Horizon A11y.
//!
//! Horizon A11y uses the `tracing` crate for instrumentation. Install a
//! subscriber in the host application to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_a11y=debug")
//!     .init();
//! ```
//!
//! Every event is emitted under one of the [`targets`] so a host can, for
//! example, silence query chatter while keeping lifecycle events.

/// Target names for log filtering.
pub mod targets {
    /// UI executor target.
    pub const EXECUTOR: &str = "horizon_a11y_core::executor";
    /// Tree store mutations.
    pub const TREE: &str = "horizon_a11y::tree";
    /// Host queries (node info, focus, hit testing, hover).
    pub const QUERY: &str = "horizon_a11y::query";
    /// Action dispatch.
    pub const ACTION: &str = "horizon_a11y::action";
    /// Update notification and marshalling.
    pub const NOTIFY: &str = "horizon_a11y::notify";
    /// Adapter creation, activation and teardown.
    pub const LIFECYCLE: &str = "horizon_a11y::lifecycle";
}

/// A guard that keeps a tracing span entered for one host query.
///
/// Dropping the guard closes the span, so subscribers that record span
/// timings see how long the query took.
#[derive(Debug)]
pub struct QuerySpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl QuerySpan {
    /// Enter a span named after the query operation.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_a11y::query", "query", operation);
        Self {
            span: span.entered(),
        }
    }

    /// Enter a span for a query about a specific virtual view id.
    pub fn for_node(operation: &'static str, virtual_id: i32) -> Self {
        let span =
            tracing::debug_span!(target: "horizon_a11y::query", "query", operation, virtual_id);
        Self {
            span: span.entered(),
        }
    }
}
