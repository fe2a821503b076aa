//! Liveness probe.

use axum::http::Uri;
use tracing::info;

pub const PROBE_BODY: &str = "Hello world!";

/// Answer any GET with a fixed plain-text body.
pub async fn probe(uri: Uri) -> &'static str {
    info!(path = %uri.path(), "GET request");
    PROBE_BODY
}
