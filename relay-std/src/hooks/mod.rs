//! Standard hooks.
//!
//! - [`GitHubPushHook`]: forwards GitHub `push` events on matching refs
//! - [`GerritMergeHook`]: forwards Gerrit `change-merged` events for one branch

mod gerrit;
mod github;

pub use gerrit::GerritMergeHook;
pub use github::{EVENT_HEADER, GitHubPushHook};
