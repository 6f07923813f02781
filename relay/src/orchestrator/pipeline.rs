//! A mounted route: one hook and the sinks bound to it.

use super::delivery::DeliveryStrategy;
use relay_core::{
    DispatchOutcome, Hook, InboundRequest, Reply, RequestContext, Route, SinkBinding, StatusCode,
};
use std::{future::Future, pin::Pin, sync::Arc};
use tracing::{debug, info};

/// Object-safe view of a [`Pipeline`], erasing its payload type.
pub(crate) trait RouteHandler: Send + Sync {
    fn hook_name(&self) -> &'static str;

    fn sink_names(&self) -> Vec<String>;

    fn handle<'a>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        request: &'a InboundRequest,
    ) -> Pin<Box<dyn Future<Output = Reply> + Send + 'a>>;
}

/// A hook together with its sinks and the delivery strategy.
pub(crate) struct Pipeline<H: Hook, D> {
    hook: H,
    sinks: Vec<SinkBinding<H::Payload>>,
    delivery: Arc<D>,
}

impl<H: Hook, D: DeliveryStrategy> Pipeline<H, D> {
    pub(crate) fn new(hook: H, sinks: Vec<SinkBinding<H::Payload>>, delivery: Arc<D>) -> Self {
        Self {
            hook,
            sinks,
            delivery,
        }
    }

    async fn run(&self, ctx: &RequestContext, route: &Route, request: &InboundRequest) -> Reply {
        match self.hook.handle(request).await {
            DispatchOutcome::Reject { status, detail } => {
                info!(status = status.as_u16(), %detail, "rejected by hook");
                Reply::new(status, detail)
            }
            DispatchOutcome::ShortCircuit { status, detail } => {
                debug!(status = status.as_u16(), %detail, "short-circuited by hook");
                Reply::new(status, detail)
            }
            DispatchOutcome::Forward(payload) => {
                let report = self
                    .delivery
                    .deliver(ctx, route, &payload, &self.sinks)
                    .await;
                match report.into_result() {
                    Ok(()) => Reply::ok(),
                    Err(report) => Reply::new(StatusCode::INTERNAL_SERVER_ERROR, report.to_string()),
                }
            }
        }
    }
}

impl<H: Hook, D: DeliveryStrategy> RouteHandler for Pipeline<H, D> {
    fn hook_name(&self) -> &'static str {
        self.hook.name()
    }

    fn sink_names(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.name().to_string()).collect()
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        request: &'a InboundRequest,
    ) -> Pin<Box<dyn Future<Output = Reply> + Send + 'a>> {
        Box::pin(self.run(ctx, route, request))
    }
}
