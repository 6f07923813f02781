//! # relay-std
//!
//! Standard implementations for the webhook relay.
//!
//! This crate provides:
//! - **Hooks**: [`GitHubPushHook`](hooks::GitHubPushHook), [`GerritMergeHook`](hooks::GerritMergeHook)
//! - **Sinks**: [`LarkSink`](sinks::LarkSink), [`BytebaseIssueSink`](sinks::BytebaseIssueSink)
//! - **Outbound clients**: Lark, Gerrit and Bytebase in [`service`]
//! - **File path templates**: [`PlaceholderTemplate`](template::PlaceholderTemplate)
//! - **Redaction**: [`redact_last_n`](redact::redact_last_n)
//! - **Testing utilities** in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use relay_core;

// Modules
pub mod hooks;
pub mod payload;
pub mod redact;
pub mod service;
pub mod sinks;
pub mod template;
pub mod testing;
