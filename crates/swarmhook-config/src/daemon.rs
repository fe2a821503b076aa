//! Daemon configuration parsing.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use swarmhook_core::{ImageId, IntervalJob, RoutingEntry, RoutingTable};
use tracing::debug;

/// Validated daemon configuration.
#[derive(Debug, Clone, Default)]
pub struct DaemonConfig {
    /// Image → target routes from `services` and `stacks`.
    pub routes: RoutingTable,
    /// Recurring jobs from `intervals`, in file order.
    pub intervals: Vec<IntervalJob>,
}

/// Longest accepted interval, one year.
pub const MAX_INTERVAL_SECS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    services: BTreeMap<String, RawService>,
    #[serde(default)]
    stacks: BTreeMap<String, RawStack>,
    #[serde(default)]
    intervals: Vec<RawInterval>,
}

#[derive(Debug, Deserialize)]
struct RawService {
    service: String,
}

#[derive(Debug, Deserialize)]
struct RawStack {
    stack: String,
    filepath: String,
}

#[derive(Debug, Deserialize)]
struct RawInterval {
    interval: f64,
    priority: i32,
    command: String,
}

/// Parse a daemon configuration from JSON text.
pub fn parse_daemon_config(json: &str) -> ConfigResult<DaemonConfig> {
    let raw: RawConfig = serde_json::from_str(json)?;

    let mut entries = Vec::with_capacity(raw.services.len() + raw.stacks.len());

    for (image, service) in raw.services {
        require_non_empty(&format!("services.{image}.service"), &service.service)?;
        entries.push((
            ImageId::from(image),
            RoutingEntry::Service {
                service_name: service.service,
            },
        ));
    }

    for (image, stack) in raw.stacks {
        if entries.iter().any(|(id, _)| id.as_str() == image) {
            return Err(ConfigError::Duplicate(format!(
                "image '{image}' is routed to both a service and a stack"
            )));
        }
        require_non_empty(&format!("stacks.{image}.stack"), &stack.stack)?;
        require_non_empty(&format!("stacks.{image}.filepath"), &stack.filepath)?;
        entries.push((
            ImageId::from(image),
            RoutingEntry::Stack {
                stack_name: stack.stack,
                manifest_path: stack.filepath,
            },
        ));
    }

    let intervals = raw
        .intervals
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| parse_interval(idx, raw))
        .collect::<ConfigResult<Vec<_>>>()?;

    let routes: RoutingTable = entries.into_iter().collect();
    debug!(
        routes = routes.len(),
        intervals = intervals.len(),
        "Parsed daemon configuration"
    );

    Ok(DaemonConfig { routes, intervals })
}

/// Read and parse a daemon configuration file.
pub fn load_daemon_config(path: impl AsRef<Path>) -> ConfigResult<DaemonConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_daemon_config(&text)
}

fn parse_interval(idx: usize, raw: RawInterval) -> ConfigResult<IntervalJob> {
    let field = format!("intervals[{idx}]");

    if !raw.interval.is_finite() || raw.interval <= 0.0 {
        return Err(ConfigError::invalid(
            format!("{field}.interval"),
            format!("must be a positive number of seconds, got {}", raw.interval),
        ));
    }
    if raw.interval > MAX_INTERVAL_SECS {
        return Err(ConfigError::invalid(
            format!("{field}.interval"),
            format!(
                "must be at most {MAX_INTERVAL_SECS} seconds, got {}",
                raw.interval
            ),
        ));
    }
    let period = Duration::try_from_secs_f64(raw.interval)
        .map_err(|e| ConfigError::invalid(format!("{field}.interval"), e.to_string()))?;

    let job = IntervalJob::from_command_line(period, raw.priority, &raw.command);
    if job.command.is_empty() {
        return Err(ConfigError::invalid(
            format!("{field}.command"),
            "command is empty",
        ));
    }

    Ok(job)
}

fn require_non_empty(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    Ok(())
}
