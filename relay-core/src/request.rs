//! The transport-independent view of an inbound webhook.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, header::HeaderName};

/// A fully buffered inbound request.
///
/// The transport collects the body before dispatching, so hooks can decode
/// it synchronously and never deal with streaming.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
}

impl InboundRequest {
    /// Create a request without headers.
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Replace all headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Add a single header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, without query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Look up a header as UTF-8 text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = InboundRequest::new(Method::POST, "/github", "{}")
            .with_header("X-GitHub-Event", "push");
        assert_eq!(req.header("x-github-event"), Some("push"));
        assert_eq!(req.header("X-Missing"), None);
    }

    #[test]
    fn test_invalid_header_is_ignored() {
        let req = InboundRequest::new(Method::POST, "/", "").with_header("bad header", "x");
        assert!(req.headers().is_empty());
    }
}
