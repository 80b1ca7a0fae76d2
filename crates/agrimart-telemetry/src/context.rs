//! Span helpers for console invocations.
//!
//! # Design
//! - One top-level span per invocation carries the command label, request id and build SHA.
//! - Callers attach it with `tracing::Instrument` so it survives across awaits.

use tracing::Span;

use crate::init::build_sha;

/// Build the top-level span for a single console invocation.
#[must_use]
pub fn console_span(command: &str, request_id: &str) -> Span {
    tracing::info_span!(
        "console",
        command = %command,
        request_id = %request_id,
        build_sha = %build_sha(),
        role = tracing::field::Empty,
    )
}

/// Record the role resolved by the route guard on the active span.
pub fn record_role(role: &str) {
    Span::current().record("role", tracing::field::display(role));
}
