use super::{invoke, traits::DeliveryStrategy};
use futures::future::join_all;
use relay_core::{DeliveryReport, Message, RequestContext, Route, SinkBinding};

/// A concurrent delivery strategy.
///
/// Starts every sink at once on the current task and waits for all of them.
/// Failures are reported in binding order, regardless of completion order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConcurrentDelivery;

impl DeliveryStrategy for ConcurrentDelivery {
    async fn deliver<'a, P: Message>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        payload: &'a P,
        sinks: &'a [SinkBinding<P>],
    ) -> DeliveryReport {
        let results = join_all(
            sinks
                .iter()
                .map(|binding| invoke(ctx, route, payload, binding)),
        )
        .await;

        let mut report = DeliveryReport::new(route.clone());
        report.extend(results);
        report
    }
}
