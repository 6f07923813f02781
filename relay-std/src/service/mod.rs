//! Outbound clients for third-party REST APIs.
//!
//! Clients share one `reqwest::Client`, never retry, and cap every request to
//! the time left on the inbound request's [`RequestContext`].

mod bytebase;
mod gerrit;
mod lark;

pub use bytebase::BytebaseService;
pub use gerrit::GerritService;
pub use lark::LarkService;

use relay_core::RequestContext;
use reqwest::{RequestBuilder, Response};
use thiserror::Error;

/// Errors returned by outbound clients.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport failure. The URL is stripped so secrets in it never leak.
    #[error("request failed: {0}")]
    Http(reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("unexpected status code {status} with body: {body}")]
    Status {
        /// HTTP status.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The service answered 2xx with a body we cannot use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No time left on the inbound request.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Http(err.without_url())
    }
}

/// Limit `builder` to the time left on `ctx`.
pub(crate) fn bounded(
    builder: RequestBuilder,
    ctx: &RequestContext,
) -> Result<RequestBuilder, ServiceError> {
    match ctx.remaining() {
        Some(remaining) if remaining.is_zero() => Err(ServiceError::DeadlineExceeded),
        Some(remaining) => Ok(builder.timeout(remaining)),
        None => Ok(builder),
    }
}

/// Read the body of a 2xx response, or turn anything else into [`ServiceError::Status`].
pub(crate) async fn read_success(response: Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Join a configured base URL and an API path.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("http://bb:8080/", "/v1/issue"), "http://bb:8080/v1/issue");
        assert_eq!(endpoint("http://bb:8080", "v1/issue"), "http://bb:8080/v1/issue");
    }

    #[test]
    fn test_expired_context_is_refused() {
        let client = reqwest::Client::new();
        let ctx = RequestContext::default().with_deadline(Instant::now());
        std::thread::sleep(Duration::from_millis(2));
        let result = bounded(client.get("http://localhost/"), &ctx);
        assert!(matches!(result, Err(ServiceError::DeadlineExceeded)));
    }

    #[test]
    fn test_status_error_display() {
        let err = ServiceError::Status {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status code 403 with body: forbidden");
    }
}
