//! Error types for the relay.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RegistryError`] - Errors while mounting routes at startup
//! - [`ConfigError`] - A hook or sink rejected its configuration
//! - [`DeliveryFailure`] - One sink failed for one request
//! - [`DeliveryReport`] - All sink failures of one dispatch

use crate::route::Route;
use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A hook or sink is missing required configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{component}: {message}")]
pub struct ConfigError {
    component: String,
    message: String,
}

impl ConfigError {
    /// Create a configuration error for the named component.
    pub fn new(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            message: message.into(),
        }
    }

    /// The component that rejected its configuration.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// What is wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while mounting routes.
///
/// All of them are fatal: the process must not start serving traffic.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A hook is already mounted on this route.
    #[error("a hook is already mounted on {0}")]
    DuplicateRoute(Route),

    /// The route's hook failed validation.
    #[error("hook `{hook}` on {route} is misconfigured")]
    InvalidHook {
        /// Route being mounted.
        route: Route,
        /// Hook name.
        hook: String,
        /// Validation failure.
        #[source]
        source: ConfigError,
    },

    /// An essential sink failed validation.
    #[error("sink `{sink}` on {route} is misconfigured")]
    InvalidSink {
        /// Route being mounted.
        route: Route,
        /// Sink name.
        sink: String,
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
}

/// A sink did not finish before the request deadline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// One sink failed while processing one payload.
#[derive(Debug)]
pub struct DeliveryFailure {
    sink: String,
    error: BoxError,
}

impl DeliveryFailure {
    /// Record a failure of the named sink.
    pub fn new(sink: impl Into<String>, error: BoxError) -> Self {
        Self {
            sink: sink.into(),
            error,
        }
    }

    /// The failing sink.
    pub fn sink(&self) -> &str {
        &self.sink
    }

    /// The underlying error.
    pub fn error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.error
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sink, self.error)
    }
}

impl std::error::Error for DeliveryFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.error)
    }
}

/// The collected result of fanning one payload out to a route's sinks.
///
/// Failures are kept as structured records; they are joined into a single
/// line only by [`Display`](fmt::Display), at the reply boundary.
#[derive(Debug)]
pub struct DeliveryReport {
    route: Route,
    attempted: usize,
    failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    /// Create an empty report.
    pub fn new(route: Route) -> Self {
        Self {
            route,
            attempted: 0,
            failures: Vec::new(),
        }
    }

    /// Record the result of one sink invocation.
    pub fn record(&mut self, result: Result<(), DeliveryFailure>) {
        self.attempted += 1;
        if let Err(failure) = result {
            self.failures.push(failure);
        }
    }

    /// The route the payload was forwarded on.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Number of sinks invoked.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Every failure, in sink order.
    pub fn failures(&self) -> &[DeliveryFailure] {
        &self.failures
    }

    /// Returns `true` if no sink failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok(())` when every sink succeeded, the report itself otherwise.
    pub fn into_result(self) -> Result<(), DeliveryReport> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }
}

impl Extend<Result<(), DeliveryFailure>> for DeliveryReport {
    fn extend<I: IntoIterator<Item = Result<(), DeliveryFailure>>>(&mut self, iter: I) {
        for result in iter {
            self.record(result);
        }
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "delivered to {} sink(s) on {}", self.attempted, self.route);
        }
        write!(
            f,
            "failed to deliver to {} of {} sink(s) on {}: ",
            self.failures.len(),
            self.attempted,
            self.route
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DeliveryReport {}
