//! Registry push webhooks.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use swarmhook_core::ImageId;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

/// Handle a registry push notification.
///
/// Any path is accepted. The request is logged in full before anything else
/// happens, whatever the outcome.
pub async fn push_webhook(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<String, ApiError> {
    info!(
        path = %uri.path(),
        headers = ?headers,
        body = %String::from_utf8_lossy(&body),
        "POST request"
    );

    let image = ImageId::from_push_payload(&body);
    let kind = state.dispatcher.dispatch(&image).await?;

    Ok(format!("OK ({kind})\n"))
}
