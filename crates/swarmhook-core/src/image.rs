//! Image identifiers.

use derive_more::Display;
use serde::Deserialize;

/// An image pushed to the registry, in `repository:tag` form.
///
/// Identifiers are not validated: whatever the registry sends is joined with
/// a colon. Payloads that lack either half map to [`ImageId::undetected`],
/// which no routing entry can ever match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct ImageId(String);

impl ImageId {
    /// Text used for notifications that did not name an image.
    pub const UNDETECTED: &'static str = "Image not detected!";

    /// Build an identifier from a repository name and a tag.
    pub fn new(repository: &str, tag: &str) -> Self {
        Self(format!("{repository}:{tag}"))
    }

    /// The sentinel identifier.
    pub fn undetected() -> Self {
        Self(Self::UNDETECTED.to_string())
    }

    /// Whether this is the sentinel identifier.
    pub fn is_undetected(&self) -> bool {
        self.0 == Self::UNDETECTED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the identifier from a registry push notification.
    ///
    /// Recognizes `{"repository": {"repo_name": ..}, "push_data": {"tag": ..}}`.
    /// Anything else, including bodies that are not JSON at all, yields the
    /// sentinel rather than an error.
    pub fn from_push_payload(body: &[u8]) -> Self {
        let Ok(payload) = serde_json::from_slice::<PushPayload>(body) else {
            return Self::undetected();
        };

        match (payload.repository, payload.push_data) {
            (
                Some(Repository {
                    repo_name: Some(repo),
                }),
                Some(PushData { tag: Some(tag) }),
            ) => Self::new(&repo, &tag),
            _ => Self::undetected(),
        }
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for ImageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Every field is optional and typed loosely so that partial payloads still
// deserialize; a field of the wrong JSON type fails the whole parse, which
// also lands on the sentinel.
#[derive(Deserialize)]
struct PushPayload {
    repository: Option<Repository>,
    push_data: Option<PushData>,
}

#[derive(Deserialize)]
struct Repository {
    repo_name: Option<String>,
}

#[derive(Deserialize)]
struct PushData {
    tag: Option<String>,
}
