//! Wire models for inbound events and outbound requests.

pub mod bytebase;
pub mod gerrit;
pub mod github;

pub use bytebase::{IssueCreate, IssueType, MigrationDetail};
pub use gerrit::{GerritChange, GerritEvent, GerritPatchSet};
pub use github::{GitHubAuthor, GitHubCommit, GitHubPushEvent, GitHubPusher};
