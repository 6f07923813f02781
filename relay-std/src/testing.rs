//! Testing utilities for the relay.
//!
//! This module provides stand-ins for hooks and sinks so the registry and the
//! server can be exercised without real webhooks or outbound services.
//!
//! # Features
//!
//! - [`StaticHook`]: A hook that returns a fixed outcome
//! - [`RecordingSink`]: A sink that records every payload it receives
//! - [`CountingSink`]: A sink that counts invocations and can be told to fail

use relay_core::{
    BoxError, ConfigError, DispatchOutcome, Hook, InboundRequest, Message, RequestContext, Route,
    Sink,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Static Hook
// ============================================================================

/// A hook that ignores the request and returns the same outcome every time.
///
/// # Example
///
/// ```rust,ignore
/// let hook = StaticHook::forward("payload".to_string());
/// let calls = hook.clone();
///
/// registry.dispatch(&ctx, &request).await;
/// assert_eq!(calls.calls(), 1);
/// ```
pub struct StaticHook<P: Clone> {
    outcome: DispatchOutcome<P>,
    invalid: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl<P: Clone> StaticHook<P> {
    /// Return `outcome` for every request.
    pub fn new(outcome: DispatchOutcome<P>) -> Self {
        Self {
            outcome,
            invalid: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Forward `payload` for every request.
    pub fn forward(payload: P) -> Self {
        Self::new(DispatchOutcome::Forward(payload))
    }

    /// Fail validation with `message` when mounted.
    pub fn with_invalid_config(mut self, message: impl Into<String>) -> Self {
        self.invalid = Some(message.into());
        self
    }

    /// Number of handled requests.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: Clone> Clone for StaticHook<P> {
    fn clone(&self) -> Self {
        Self {
            outcome: self.outcome.clone(),
            invalid: self.invalid.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<P: Message + Clone> Hook for StaticHook<P> {
    type Payload = P;

    fn name(&self) -> &'static str {
        "static"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match &self.invalid {
            Some(message) => Err(ConfigError::new(self.name(), message.clone())),
            None => Ok(()),
        }
    }

    async fn handle(&self, _request: &InboundRequest) -> DispatchOutcome<P> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// A sink that records every payload it receives, together with the route
/// and request id.
pub struct RecordingSink<P: Clone> {
    name: String,
    records: Arc<Mutex<Vec<(Route, String, P)>>>,
}

impl<P: Clone> RecordingSink<P> {
    /// Create a recording sink called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded payloads.
    pub fn payloads(&self) -> Vec<P> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, payload)| payload.clone())
            .collect()
    }

    /// Get the request ids, in delivery order.
    pub fn request_ids(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, id, _)| id.clone())
            .collect()
    }

    /// Get the routes, in delivery order.
    pub fn routes(&self) -> Vec<Route> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(route, _, _)| route.clone())
            .collect()
    }

    /// Get the number of recorded payloads.
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl<P: Clone> Clone for RecordingSink<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            records: self.records.clone(),
        }
    }
}

impl<P: Message + Clone> Sink<P> for RecordingSink<P> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, ctx: &RequestContext, route: &Route, payload: &P) -> Result<(), BoxError> {
        self.records.lock().unwrap().push((
            route.clone(),
            ctx.request_id().to_string(),
            payload.clone(),
        ));
        Ok(())
    }
}

// ============================================================================
// Counting Sink
// ============================================================================

/// A sink that counts invocations for any payload type.
///
/// # Example
///
/// ```rust,ignore
/// let failing = CountingSink::failing("b", "boom");
/// let counter = failing.clone();
///
/// registry.dispatch(&ctx, &request).await;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone)]
pub struct CountingSink {
    name: String,
    count: Arc<AtomicUsize>,
    error: Option<String>,
    invalid: Option<String>,
}

impl CountingSink {
    /// Create a sink that always succeeds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: Arc::new(AtomicUsize::new(0)),
            error: None,
            invalid: None,
        }
    }

    /// Create a sink that always fails with `error`.
    pub fn failing(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(name)
        }
    }

    /// Fail validation with `message` when mounted.
    pub fn with_invalid_config(mut self, message: impl Into<String>) -> Self {
        self.invalid = Some(message.into());
        self
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<P: Message> Sink<P> for CountingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match &self.invalid {
            Some(message) => Err(ConfigError::new(self.name.clone(), message.clone())),
            None => Ok(()),
        }
    }

    async fn process(&self, _ctx: &RequestContext, _route: &Route, _payload: &P) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::Method;

    #[tokio::test]
    async fn test_static_hook_counts_calls() {
        let hook = StaticHook::forward(7u32);
        let calls = hook.clone();
        let request = InboundRequest::new(Method::POST, "/x", "");
        assert_eq!(hook.handle(&request).await, DispatchOutcome::Forward(7));
        assert_eq!(calls.calls(), 1);
    }

    #[tokio::test]
    async fn test_counting_sink_fails_on_demand() {
        let sink = CountingSink::failing("b", "boom");
        let err = Sink::<u32>::process(&sink, &RequestContext::default(), &Route::post("/x"), &1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_recording_sink_keeps_request_ids() {
        let sink: RecordingSink<String> = RecordingSink::new("rec");
        sink.process(&RequestContext::new("req-1"), &Route::post("/x"), &"hello".to_string())
            .await
            .unwrap();
        assert_eq!(sink.payloads(), vec!["hello".to_string()]);
        assert_eq!(sink.request_ids(), vec!["req-1".to_string()]);
        assert_eq!(sink.routes(), vec![Route::post("/x")]);
    }
}
