//! # relay-core
//!
//! Core contracts for the webhook relay.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! hook and sink implementations that don't need the HTTP server or the
//! registry from the `relay` crate.
//!
//! # Three-Stage Pipeline
//!
//! Every inbound webhook travels through three stages:
//!
//! ## Stage 1: Classification ([`Hook`])
//!
//! A Hook is the adapter for one kind of inbound event source. It decodes the
//! raw [`InboundRequest`] and returns a [`DispatchOutcome`]:
//!
//! - **Forward**: the payload is handed to every bound sink
//! - **ShortCircuit**: nothing to do, but not an error (e.g. a ping event)
//! - **Reject**: malformed input
//!
//! ## Stage 2: Fan-out ([`Sink`])
//!
//! Sinks consume the decoded payload. Each sink decides on its own whether to
//! act, and its failure never prevents the other sinks of the route from
//! running.
//!
//! ## Stage 3: Reply ([`Reply`])
//!
//! The outcome of the hook and the aggregated [`DeliveryReport`] of the sinks
//! are folded into one status code and a short human-readable detail.
//!
//! # Error Types
//!
//! - [`RegistryError`] - Startup errors while mounting routes
//! - [`ConfigError`] - A hook or sink rejected its configuration
//! - [`DeliveryReport`] - Every sink failure of a single dispatch

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod hook;
mod message;
mod outcome;
mod request;
mod route;
mod sink;

// Re-exports
pub use context::RequestContext;
pub use error::{BoxError, ConfigError, DeadlineExceeded, DeliveryFailure, DeliveryReport, RegistryError};
pub use hook::Hook;
pub use message::Message;
pub use outcome::{DispatchOutcome, Reply};
pub use request::InboundRequest;
pub use route::Route;
pub use sink::{BoxSink, DynSink, Requirement, Sink, SinkBinding};

/// HTTP types used across the public API.
pub use http::{HeaderMap, Method, StatusCode};
