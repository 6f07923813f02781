//! # relay
//!
//! A webhook relay: receives webhooks from code-hosting systems and fans
//! each accepted event out to a set of downstream sinks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay::{RegistryBuilder, Route};
//! use relay_std::{hooks::GitHubPushHook, sinks::LarkSink};
//!
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .route(Route::post("/github"), GitHubPushHook::default())
//!     .sink(LarkSink::new(urls, client))
//!     .mount()?;
//! let registry = Arc::new(builder.build());
//!
//! relay::server::serve(listener, registry, ServerOptions::default(), shutdown).await;
//! ```
//!
//! ## Layout
//!
//! - `relay-core`: the Hook/Sink contracts, request and reply types, errors
//! - `relay-std`: GitHub and Gerrit hooks, Lark and Bytebase sinks
//! - `relay` (this crate): route table, registry, delivery strategies,
//!   HTTP server, configuration and logging

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod logging;
mod orchestrator;
pub mod routing;
pub mod server;

pub use orchestrator::{
    ConcurrentDelivery, DeliveryStrategy, Fanout, Registry, RegistryBuilder, RouteBuilder,
    SequentialDelivery,
};
pub use relay_core::{
    BoxError, ConfigError, DeliveryFailure, DeliveryReport, DispatchOutcome, Hook, InboundRequest,
    Message, Method, RegistryError, Reply, RequestContext, Requirement, Route, Sink, SinkBinding,
    StatusCode,
};
