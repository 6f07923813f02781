#![allow(dead_code)]

use relay::{BoxError, InboundRequest, Method, RequestContext, Route, Sink};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

// ============================================================================
// Test Payload Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct TestEvent {
    pub content: String,
}

impl TestEvent {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

// ============================================================================
// Test Sinks
// ============================================================================

/// Sleeps before succeeding.
pub struct SlowSink {
    pub name: &'static str,
    pub delay: Duration,
}

impl<P: relay::Message> Sink<P> for SlowSink {
    fn name(&self) -> &str {
        self.name
    }

    async fn process(&self, _ctx: &RequestContext, _route: &Route, _payload: &P) -> Result<(), BoxError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Records the order sinks were invoked in.
pub struct OrderRecordingSink {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
}

impl<P: relay::Message> Sink<P> for OrderRecordingSink {
    fn name(&self) -> &str {
        "order"
    }

    async fn process(&self, _ctx: &RequestContext, _route: &Route, _payload: &P) -> Result<(), BoxError> {
        self.order.lock().unwrap().push(self.id);
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn post(path: &str, body: &str) -> InboundRequest {
    InboundRequest::new(Method::POST, path, body.to_string())
}

pub fn ctx() -> RequestContext {
    RequestContext::new("test-request")
}
