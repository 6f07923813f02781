//! GitHub `push` event.
//!
//! Only the fields the relay renders are modelled; everything else in the
//! payload is ignored.

use serde::{Deserialize, Serialize};

/// Author of a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubAuthor {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
}

/// A commit as it appears in a push event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubCommit {
    /// Full commit message.
    #[serde(default)]
    pub message: String,
    /// ISO 8601 commit timestamp.
    #[serde(default)]
    pub timestamp: String,
    /// Commit author.
    #[serde(default)]
    pub author: GitHubAuthor,
}

impl GitHubCommit {
    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }
}

/// Pusher of a push event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubPusher {
    /// Login or display name.
    #[serde(default)]
    pub name: String,
}

/// Payload of the `push` webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubPushEvent {
    /// Full ref name, e.g. `refs/heads/main`.
    #[serde(default, rename = "ref")]
    pub git_ref: String,
    /// Link to the diff of the pushed commits.
    #[serde(default)]
    pub compare: String,
    /// `true` when the push deleted the ref.
    #[serde(default)]
    pub deleted: bool,
    /// The most recent commit; absent for deletions.
    #[serde(default)]
    pub head_commit: Option<GitHubCommit>,
    /// Who pushed.
    #[serde(default)]
    pub pusher: Option<GitHubPusher>,
}

impl GitHubPushEvent {
    /// The ref without its `refs/heads/` or `refs/tags/` prefix.
    pub fn short_ref(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/heads/")
            .or_else(|| self.git_ref.strip_prefix("refs/tags/"))
            .unwrap_or(&self.git_ref)
    }
}
