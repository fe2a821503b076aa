//! Core domain types and traits for swarmhook.
//!
//! This crate contains:
//! - Image identifiers and the sentinel for undetected images
//! - Routing entries and the immutable routing table
//! - The command runner trait and deployment outcomes
//! - Interval job definitions

pub mod error;
pub mod executor;
pub mod image;
pub mod interval;
pub mod routing;

pub use error::{Error, Result};
pub use executor::{CommandRunner, DeploymentOutcome};
pub use image::ImageId;
pub use interval::IntervalJob;
pub use routing::{RoutingEntry, RoutingTable};
