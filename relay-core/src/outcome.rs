//! Hook outcomes and the final reply.

use http::StatusCode;
use std::fmt;

/// What a [`Hook`] hands back to the dispatcher.
///
/// - `Forward` sends the payload to every bound sink; the reply is `200` unless
///   a sink fails.
/// - `ShortCircuit` terminates without invoking sinks and is **not** an error.
///   Use it for "nothing to do" cases such as ping events or ignored
///   branches, so the sender's webhook dashboard does not show failures.
/// - `Reject` terminates without invoking sinks and reports malformed input.
///
/// [`Hook`]: crate::Hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome<P> {
    /// Hand the payload to every bound sink.
    Forward(P),
    /// Stop successfully without invoking sinks.
    ShortCircuit {
        /// Status to reply with, usually `202 Accepted`.
        status: StatusCode,
        /// Reason shown to the sender.
        detail: String,
    },
    /// Stop because the input could not be used.
    Reject {
        /// Status to reply with.
        status: StatusCode,
        /// Reason shown to the sender.
        detail: String,
    },
}

impl<P> DispatchOutcome<P> {
    /// Short-circuit with `202 Accepted`.
    pub fn accepted(detail: impl Into<String>) -> Self {
        DispatchOutcome::ShortCircuit {
            status: StatusCode::ACCEPTED,
            detail: detail.into(),
        }
    }

    /// Reject with the given status.
    pub fn reject(status: StatusCode, detail: impl Into<String>) -> Self {
        DispatchOutcome::Reject {
            status,
            detail: detail.into(),
        }
    }

    /// Returns `true` for `Forward`.
    pub fn is_forward(&self) -> bool {
        matches!(self, DispatchOutcome::Forward(_))
    }

    /// The forwarded payload, if any.
    pub fn payload(&self) -> Option<&P> {
        match self {
            DispatchOutcome::Forward(payload) => Some(payload),
            _ => None,
        }
    }
}

/// The status and detail line returned to the webhook sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status.
    pub status: StatusCode,
    /// Short human-readable detail.
    pub detail: String,
}

impl Reply {
    /// Create a reply.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// `200 OK`.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK, "OK")
    }

    /// Returns `true` for 2xx statuses, short-circuits included.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.detail)
    }
}
