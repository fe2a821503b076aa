//! Webhook server for swarmhook.
//!
//! Accepts registry push notifications over HTTP and redeploys the matching
//! Swarm stack or service.

pub mod error;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod state;

pub use services::dispatcher::Dispatcher;
pub use state::AppState;
