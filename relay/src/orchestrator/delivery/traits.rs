use relay_core::{DeliveryReport, Message, RequestContext, Route, SinkBinding};
use std::future::Future;

/// Strategy for delivering one payload to the sinks of a route.
///
/// This abstraction allows different execution models (sequential,
/// concurrent) to be plugged into the registry. Every strategy invokes every
/// sink and records every failure; none of them stops early.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a delivery strategy",
    label = "missing `DeliveryStrategy` implementation",
    note = "Implement `deliver` and return a `DeliveryReport` covering every sink."
)]
pub trait DeliveryStrategy: Send + Sync + 'static {
    /// Deliver the payload to the sinks.
    fn deliver<'a, P: Message>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        payload: &'a P,
        sinks: &'a [SinkBinding<P>],
    ) -> impl Future<Output = DeliveryReport> + Send + 'a;
}
