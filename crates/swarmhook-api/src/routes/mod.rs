//! HTTP routes.
//!
//! Every path behaves the same: GET is the liveness probe, POST is a
//! registry push notification.

pub mod health;
pub mod webhooks;

use crate::AppState;
use axum::Router;
use axum::routing::get;

/// Build the main router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::probe).post(webhooks::push_webhook))
        .route("/{*path}", get(health::probe).post(webhooks::push_webhook))
        .with_state(state)
}
