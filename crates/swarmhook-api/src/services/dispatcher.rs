//! Webhook dispatcher.
//!
//! Turns a pushed image into exactly one deployment:
//! 1. Resolve the image against the routing table
//! 2. Run the stack or service command for the entry
//! 3. Report success, a routing miss, or a failed deployment

use std::sync::Arc;
use swarmhook_core::{CommandRunner, ImageId, RoutingEntry, RoutingTable};
use tracing::{error, info, warn};

use crate::error::ApiError;

/// Routes pushed images to deployment commands.
pub struct Dispatcher {
    routes: Arc<RoutingTable>,
    runner: Arc<dyn CommandRunner>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RoutingTable>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { routes, runner }
    }

    /// Deploy `image` to its configured target.
    ///
    /// Returns the kind of target that was deployed (`"stack"` or
    /// `"service"`). The undetected-image sentinel never resolves, whatever
    /// the table holds. The command is attempted once; a failure is logged with
    /// its full output and never retried.
    pub async fn dispatch(&self, image: &ImageId) -> Result<&'static str, ApiError> {
        let entry = if image.is_undetected() {
            None
        } else {
            self.routes.resolve(image.as_str())
        };
        let Some(entry) = entry else {
            warn!(
                image = %image,
                "Received update for image, but no service or stack is configured to handle it"
            );
            return Err(ApiError::NotFound(image.to_string()));
        };

        let kind = entry.kind();
        let target = entry.target_name();
        match entry {
            RoutingEntry::Stack { manifest_path, .. } => {
                info!(
                    image = %image,
                    stack = %target,
                    manifest = %manifest_path,
                    "Deploying image to stack"
                );
            }
            RoutingEntry::Service { .. } => {
                info!(image = %image, service = %target, "Deploying image to service");
            }
        }

        let command = entry.command(image);
        match self.runner.run(&command).await {
            Ok(outcome) if outcome.succeeded => {
                info!(
                    image = %image,
                    kind,
                    target = %target,
                    elapsed_ms = outcome.duration().num_milliseconds(),
                    "Deployed image successfully"
                );
                Ok(kind)
            }
            Ok(outcome) => {
                error!(
                    image = %image,
                    kind,
                    target = %target,
                    exit_code = ?outcome.exit_code,
                    stdout = %outcome.stdout_lossy(),
                    stderr = %outcome.stderr_lossy(),
                    "Failed to deploy image"
                );
                Err(ApiError::Internal(format!(
                    "{} exited with {:?}",
                    command.join(" "),
                    outcome.exit_code
                )))
            }
            Err(e) => {
                error!(
                    image = %image,
                    kind,
                    target = %target,
                    error = %e,
                    "Failed to deploy image"
                );
                Err(ApiError::Internal(e.to_string()))
            }
        }
    }
}
