pub(crate) mod concurrent;
pub(crate) mod sequential;
pub(crate) mod traits;

// Expose strategies
pub use concurrent::ConcurrentDelivery;
pub use sequential::SequentialDelivery;
pub use traits::DeliveryStrategy;

use relay_core::{
    BoxError, DeadlineExceeded, DeliveryFailure, DeliveryReport, Message, RequestContext, Route,
    SinkBinding,
};
use tracing::{debug, warn};

/// Fan-out mode picked at startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// See [`SequentialDelivery`].
    #[default]
    Sequential,
    /// See [`ConcurrentDelivery`].
    Concurrent,
}

impl DeliveryStrategy for Fanout {
    async fn deliver<'a, P: Message>(
        &'a self,
        ctx: &'a RequestContext,
        route: &'a Route,
        payload: &'a P,
        sinks: &'a [SinkBinding<P>],
    ) -> DeliveryReport {
        match self {
            Fanout::Sequential => SequentialDelivery.deliver(ctx, route, payload, sinks).await,
            Fanout::Concurrent => ConcurrentDelivery.deliver(ctx, route, payload, sinks).await,
        }
    }
}

/// Run one sink, bounded by the request deadline.
pub(crate) async fn invoke<P: Message>(
    ctx: &RequestContext,
    route: &Route,
    payload: &P,
    binding: &SinkBinding<P>,
) -> Result<(), DeliveryFailure> {
    let process = binding.sink().process_dyn(ctx, route, payload);
    let result = match ctx.deadline() {
        Some(deadline) => tokio::time::timeout_at(deadline.into(), process)
            .await
            .unwrap_or_else(|_| Err(BoxError::from(DeadlineExceeded))),
        None => process.await,
    };

    match result {
        Ok(()) => {
            debug!(sink = binding.name(), "sink succeeded");
            Ok(())
        }
        Err(error) => {
            warn!(sink = binding.name(), error = %error, "sink failed");
            Err(DeliveryFailure::new(binding.name(), error))
        }
    }
}
