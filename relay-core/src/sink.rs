//! # Fan-out Stage (Sink)
//!
//! A Sink consumes the payload forwarded by the route's hook and performs, or
//! deliberately skips, one downstream action such as posting a chat message
//! or opening an issue.
//!
//! # Responsibilities
//!
//! 1. **Validation**: check required configuration once, at mount time.
//! 2. **Decision**: ignore payloads that are not relevant (return `Ok(())`).
//! 3. **Delivery**: call the outbound collaborator, honouring the
//!    [`RequestContext`] deadline.
//!
//! Sinks never retry; a failure is reported to the dispatcher, which collects
//! it together with the failures of every other sink of the route.

use crate::{
    context::RequestContext,
    error::{BoxError, ConfigError},
    message::Message,
    route::Route,
};
use std::{future::Future, pin::Pin};

/// A consumer of decoded payloads of type `P`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot consume payloads of type `{P}`",
    label = "missing `Sink<{P}>` implementation",
    note = "The sink must accept the `Payload` type of the hook it is bound to."
)]
pub trait Sink<P: Message>: Send + Sync + 'static {
    /// A short name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Check the sink's configuration. Called once when the route is mounted.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Process one payload forwarded on `route`.
    fn process(
        &self,
        ctx: &RequestContext,
        route: &Route,
        payload: &P,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Dynamic object-safe version of [`Sink`].
///
/// Use this trait when a route holds sinks of different concrete types.
pub trait DynSink<P: Message>: Send + Sync + 'static {
    /// See [`Sink::name`].
    fn sink_name(&self) -> &str;

    /// See [`Sink::validate`].
    fn validate_dyn(&self) -> Result<(), ConfigError>;

    /// See [`Sink::process`].
    fn process_dyn<'a>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        payload: &'a P,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

// Blanket implementation: Any type implementing Sink implements DynSink automatically.
impl<P: Message, S: Sink<P>> DynSink<P> for S {
    fn sink_name(&self) -> &str {
        self.name()
    }

    fn validate_dyn(&self) -> Result<(), ConfigError> {
        self.validate()
    }

    fn process_dyn<'a>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        payload: &'a P,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.process(ctx, route, payload))
    }
}

/// A type-erased sink.
pub type BoxSink<P> = Box<dyn DynSink<P>>;

/// What happens when a sink fails validation at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    /// The process must not start without this sink.
    #[default]
    Essential,
    /// The sink is dropped from its route with a logged warning.
    Optional,
}

/// A sink together with its startup policy.
pub struct SinkBinding<P: Message> {
    sink: BoxSink<P>,
    requirement: Requirement,
}

impl<P: Message> SinkBinding<P> {
    /// Bind a sink whose misconfiguration is fatal.
    pub fn essential<S: Sink<P>>(sink: S) -> Self {
        Self::new(Box::new(sink), Requirement::Essential)
    }

    /// Bind a sink that is disabled when misconfigured.
    pub fn optional<S: Sink<P>>(sink: S) -> Self {
        Self::new(Box::new(sink), Requirement::Optional)
    }

    /// Bind an already boxed sink.
    pub fn new(sink: BoxSink<P>, requirement: Requirement) -> Self {
        Self { sink, requirement }
    }

    /// The sink.
    pub fn sink(&self) -> &dyn DynSink<P> {
        &*self.sink
    }

    /// The sink's name.
    pub fn name(&self) -> &str {
        self.sink.sink_name()
    }

    /// The startup policy.
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }
}

impl<P: Message> std::fmt::Debug for SinkBinding<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkBinding")
            .field("sink", &self.name())
            .field("requirement", &self.requirement)
            .finish()
    }
}
