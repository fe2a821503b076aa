//! Application state.

use std::sync::Arc;
use swarmhook_core::{CommandRunner, RoutingTable};

use crate::Dispatcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(routes: Arc<RoutingTable>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(routes, runner)),
        }
    }
}
