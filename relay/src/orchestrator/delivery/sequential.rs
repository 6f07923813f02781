use super::{invoke, traits::DeliveryStrategy};
use relay_core::{DeliveryReport, Message, RequestContext, Route, SinkBinding};

/// A sequential delivery strategy.
///
/// Executes sinks one by one in binding order. A failing sink does not stop
/// the ones after it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialDelivery;

impl DeliveryStrategy for SequentialDelivery {
    async fn deliver<'a, P: Message>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        payload: &'a P,
        sinks: &'a [SinkBinding<P>],
    ) -> DeliveryReport {
        let mut report = DeliveryReport::new(route.clone());
        for binding in sinks {
            report.record(invoke(ctx, route, payload, binding).await);
        }
        report
    }
}
