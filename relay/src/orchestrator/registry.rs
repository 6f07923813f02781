//! Registry module for route management.
//!
//! This module provides a builder for mounting hooks and their sinks, and a
//! frozen registry for immutable, thread-safe dispatch.

use super::{
    delivery::{DeliveryStrategy, SequentialDelivery},
    pipeline::{Pipeline, RouteHandler},
};
use crate::routing::{RouteMatch, RouteTable, RouteTableBuilder};
use relay_core::{
    Hook, InboundRequest, RegistryError, Reply, RequestContext, Requirement, Route, Sink,
    SinkBinding, StatusCode,
};
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

// ============================================================================
// RegistryBuilder - for mounting routes
// ============================================================================

/// Builder for constructing a [`Registry`].
///
/// Every hook and sink is validated when its route is mounted, so a
/// misconfigured relay fails before it serves a single request.
///
/// # Example
/// ```ignore
/// let mut builder = RegistryBuilder::new();
/// builder
///     .route(Route::post("/github"), GitHubPushHook::default())
///     .sink(lark_sink)
///     .mount()?;
/// let registry = builder.build();
/// ```
pub struct RegistryBuilder<D: DeliveryStrategy = SequentialDelivery> {
    routes: RouteTableBuilder<Box<dyn RouteHandler>>,
    delivery: Arc<D>,
}

impl RegistryBuilder<SequentialDelivery> {
    /// Create a new empty builder delivering to sinks sequentially.
    pub fn new() -> Self {
        Self::with_delivery(SequentialDelivery)
    }
}

impl Default for RegistryBuilder<SequentialDelivery> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DeliveryStrategy> RegistryBuilder<D> {
    /// Create a new empty builder using the given delivery strategy.
    pub fn with_delivery(delivery: D) -> Self {
        Self {
            routes: RouteTableBuilder::default(),
            delivery: Arc::new(delivery),
        }
    }

    /// Mount `hook` and its sinks on `route`.
    pub fn register<H: Hook>(
        mut self,
        route: Route,
        hook: H,
        sinks: Vec<SinkBinding<H::Payload>>,
    ) -> Result<Self, RegistryError> {
        self.register_mut(route, hook, sinks)?;
        Ok(self)
    }

    /// Mount `hook` and its sinks on `route` (mutable version).
    ///
    /// Fails if the route is taken, the hook rejects its configuration, or an
    /// essential sink does. Optional sinks that reject their configuration
    /// are left out of the route with a warning.
    pub fn register_mut<H: Hook>(
        &mut self,
        route: Route,
        hook: H,
        sinks: Vec<SinkBinding<H::Payload>>,
    ) -> Result<(), RegistryError> {
        if self.routes.contains(&route) {
            return Err(RegistryError::DuplicateRoute(route));
        }

        if let Err(source) = hook.validate() {
            return Err(RegistryError::InvalidHook {
                route,
                hook: hook.name().to_string(),
                source,
            });
        }

        let mut enabled = Vec::with_capacity(sinks.len());
        for binding in sinks {
            match (binding.sink().validate_dyn(), binding.requirement()) {
                (Ok(()), _) => enabled.push(binding),
                (Err(source), Requirement::Essential) => {
                    return Err(RegistryError::InvalidSink {
                        route,
                        sink: binding.name().to_string(),
                        source,
                    });
                }
                (Err(error), Requirement::Optional) => {
                    warn!(%route, sink = binding.name(), %error, "optional sink disabled");
                }
            }
        }

        info!(
            %route,
            hook = hook.name(),
            sinks = enabled.len(),
            "route mounted"
        );
        let pipeline = Pipeline::new(hook, enabled, self.delivery.clone());
        self.routes.insert(route, Box::new(pipeline))
    }

    /// Start mounting `hook` on `route`; bind sinks, then call
    /// [`mount`](RouteBuilder::mount).
    pub fn route<H: Hook>(&mut self, route: Route, hook: H) -> RouteBuilder<'_, H, D> {
        RouteBuilder {
            registry: self,
            route,
            hook,
            sinks: Vec::new(),
        }
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Registry {
        Registry {
            routes: self.routes.build(),
        }
    }

    /// Get the number of mounted routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the builder has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Fluent builder for one route, created by [`RegistryBuilder::route`].
#[must_use = "a route is only mounted by calling `mount`"]
pub struct RouteBuilder<'r, H: Hook, D: DeliveryStrategy> {
    registry: &'r mut RegistryBuilder<D>,
    route: Route,
    hook: H,
    sinks: Vec<SinkBinding<H::Payload>>,
}

impl<H: Hook, D: DeliveryStrategy> RouteBuilder<'_, H, D> {
    /// Bind an essential sink.
    pub fn sink<S: Sink<H::Payload>>(mut self, sink: S) -> Self {
        self.sinks.push(SinkBinding::essential(sink));
        self
    }

    /// Bind an optional sink.
    pub fn optional_sink<S: Sink<H::Payload>>(mut self, sink: S) -> Self {
        self.sinks.push(SinkBinding::optional(sink));
        self
    }

    /// Validate and mount the route.
    pub fn mount(self) -> Result<(), RegistryError> {
        self.registry.register_mut(self.route, self.hook, self.sinks)
    }
}

// ============================================================================
// Registry - immutable, thread-safe route storage
// ============================================================================

/// An immutable, thread-safe set of mounted routes.
///
/// Created by calling [`RegistryBuilder::build`]. Share it via `Arc`.
pub struct Registry {
    routes: RouteTable<Box<dyn RouteHandler>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("routes", &self.routes.iter().map(|(route, _)| route).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Dispatch one inbound request and produce the reply.
    ///
    /// - unknown path: `404`
    /// - known path, other method: `405`
    /// - otherwise the route's hook decides, and sink failures turn the
    ///   reply into a `500` listing every failure
    pub async fn dispatch(&self, ctx: &RequestContext, request: &InboundRequest) -> Reply {
        let route = Route::new(request.method().clone(), request.path());
        let handler = match self.routes.lookup(&route) {
            RouteMatch::Matched(handler) => handler,
            RouteMatch::MethodNotAllowed(_) => {
                return Reply::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
            }
            RouteMatch::NotFound => return Reply::new(StatusCode::NOT_FOUND, "Not found"),
        };

        let span = info_span!(
            "dispatch",
            route = %route,
            request_id = ctx.request_id(),
            hook = handler.hook_name()
        );
        async {
            let reply = handler.handle(ctx, &route, request).await;
            info!(status = reply.status.as_u16(), "dispatched");
            reply
        }
        .instrument(span)
        .await
    }

    /// Iterate over the mounted routes with their hook and sink names.
    pub fn routes(&self) -> impl Iterator<Item = (&Route, &'static str, Vec<String>)> {
        self.routes
            .iter()
            .map(|(route, handler)| (route, handler.hook_name(), handler.sink_names()))
    }

    /// Get the number of mounted routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
