//! Route identity.

use http::Method;
use std::fmt;

/// A `(method, path)` pair identifying where a hook is mounted.
///
/// Two routes are equal only if both the method and the exact path are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    method: Method,
    path: String,
}

impl Route {
    /// Create a route for the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Shorthand for a `POST` route.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_mount_key() {
        assert_eq!(Route::post("/github").to_string(), "[POST] /github");
    }

    #[test]
    fn test_method_is_part_of_identity() {
        assert_ne!(Route::post("/gerrit"), Route::new(Method::GET, "/gerrit"));
        assert_eq!(Route::post("/gerrit"), Route::new(Method::POST, "/gerrit"));
    }
}
