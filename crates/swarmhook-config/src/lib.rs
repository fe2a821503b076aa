//! JSON configuration parsing for swarmhook.
//!
//! This crate handles parsing of:
//! - Service and stack routes (image → Swarm target)
//! - Interval job definitions

pub mod daemon;
pub mod error;

pub use daemon::{DaemonConfig, load_daemon_config, parse_daemon_config};
pub use error::{ConfigError, ConfigResult};
