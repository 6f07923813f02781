//! Gerrit stream events delivered through the webhooks plugin.

use serde::{Deserialize, Serialize};

/// Event type of a merged change.
pub const CHANGE_MERGED: &str = "change-merged";

/// The change an event refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GerritChange {
    /// Project (repository) name.
    #[serde(default)]
    pub project: String,
    /// Target branch.
    #[serde(default)]
    pub branch: String,
    /// Change id, usable as a change key in the REST API.
    #[serde(default)]
    pub id: String,
}

/// The patch set an event refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GerritPatchSet {
    /// Commit SHA of the patch set.
    #[serde(default)]
    pub revision: String,
}

/// A Gerrit webhook event.
///
/// `change` and `patchSet` are absent for event types that are not about a
/// change, such as `ref-updated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GerritEvent {
    /// Event type, e.g. `change-merged`.
    #[serde(default, rename = "type")]
    pub event_type: String,
    /// The change.
    #[serde(default)]
    pub change: Option<GerritChange>,
    /// The patch set.
    #[serde(default, rename = "patchSet")]
    pub patch_set: Option<GerritPatchSet>,
}

impl GerritEvent {
    /// Returns `true` for `change-merged` events.
    pub fn is_change_merged(&self) -> bool {
        self.event_type == CHANGE_MERGED
    }
}
