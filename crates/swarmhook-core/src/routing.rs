//! Image routing.
//!
//! Maps a pushed image to the Swarm target that should be redeployed.

use std::collections::HashMap;

use crate::ImageId;

/// Where a pushed image gets deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingEntry {
    /// Redeploy a whole stack from its compose manifest.
    Stack {
        stack_name: String,
        manifest_path: String,
    },
    /// Force-update a single running service.
    Service { service_name: String },
}

impl RoutingEntry {
    /// Short label used in logs and response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingEntry::Stack { .. } => "stack",
            RoutingEntry::Service { .. } => "service",
        }
    }

    /// Name of the stack or service being deployed.
    pub fn target_name(&self) -> &str {
        match self {
            RoutingEntry::Stack { stack_name, .. } => stack_name,
            RoutingEntry::Service { service_name } => service_name,
        }
    }

    /// The docker invocation that deploys `image` to this target.
    pub fn command(&self, image: &ImageId) -> Vec<String> {
        match self {
            RoutingEntry::Stack {
                stack_name,
                manifest_path,
            } => vec![
                "docker".to_string(),
                "stack".to_string(),
                "deploy".to_string(),
                "-c".to_string(),
                manifest_path.clone(),
                stack_name.clone(),
            ],
            RoutingEntry::Service { service_name } => vec![
                "docker".to_string(),
                "service".to_string(),
                "update".to_string(),
                "--force".to_string(),
                "--image".to_string(),
                image.to_string(),
                service_name.clone(),
            ],
        }
    }
}

/// Immutable image → target lookup, built once at startup.
///
/// Shared between request handlers behind an `Arc`; it is never mutated after
/// construction, so lookups need no synchronization.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: HashMap<ImageId, RoutingEntry>,
}

impl RoutingTable {
    /// Build a table from already-validated entries.
    pub fn new(entries: HashMap<ImageId, RoutingEntry>) -> Self {
        Self { entries }
    }

    /// Look up the target for an image. `None` is the normal "no route" case.
    pub fn resolve(&self, image: &str) -> Option<&RoutingEntry> {
        self.entries.get(image)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by image id, for stable listings.
    pub fn iter_sorted(&self) -> Vec<(&ImageId, &RoutingEntry)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        entries
    }
}

impl FromIterator<(ImageId, RoutingEntry)> for RoutingTable {
    fn from_iter<I: IntoIterator<Item = (ImageId, RoutingEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
