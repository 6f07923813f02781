//! # Classification Stage (Hook)
//!
//! A Hook adapts one inbound event source. It decodes the raw request and
//! decides whether the event should reach the sinks.
//!
//! # Lifecycle
//!
//! Hooks are constructed once at startup, validated once when mounted, and
//! then shared read-only by every request on their route. They must not hold
//! per-request mutable state.

use crate::{error::ConfigError, message::Message, outcome::DispatchOutcome, request::InboundRequest};
use std::future::Future;

/// The adapter for one kind of inbound webhook.
///
/// The associated [`Payload`](Hook::Payload) type is what the route's sinks
/// receive, so a sink bound to the wrong hook fails to compile.
///
/// This trait uses native `async fn`; the registry keeps each hook
/// statically typed inside its route pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Hook`",
    label = "missing `Hook` implementation",
    note = "Hooks must implement `handle` and name their decoded `Payload` type."
)]
pub trait Hook: Send + Sync + 'static {
    /// The decoded payload forwarded to sinks.
    type Payload: Message;

    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Check the hook's configuration. Called once when the hook is mounted.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Decode and classify an inbound request.
    fn handle(
        &self,
        request: &InboundRequest,
    ) -> impl Future<Output = DispatchOutcome<Self::Payload>> + Send;
}
