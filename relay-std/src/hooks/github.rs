//! GitHub push hook.

use crate::payload::GitHubPushEvent;
use relay_core::{DispatchOutcome, Hook, InboundRequest, StatusCode};
use tracing::debug;

/// Header carrying the GitHub event type.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Forwards `push` events whose ref starts with a configured prefix.
///
/// - `ping` replies `202 Pong`
/// - other event types are rejected with `400`
/// - pushes to refs outside the prefix reply `202`
#[derive(Debug, Clone)]
pub struct GitHubPushHook {
    ref_prefix: String,
}

impl GitHubPushHook {
    /// Forward pushes to refs starting with `ref_prefix`, e.g. `refs/heads/`.
    pub fn new(ref_prefix: impl Into<String>) -> Self {
        Self {
            ref_prefix: ref_prefix.into(),
        }
    }
}

impl Default for GitHubPushHook {
    fn default() -> Self {
        Self::new("refs/heads/")
    }
}

impl Hook for GitHubPushHook {
    type Payload = GitHubPushEvent;

    fn name(&self) -> &'static str {
        "github-push"
    }

    async fn handle(&self, request: &InboundRequest) -> DispatchOutcome<GitHubPushEvent> {
        match request.header(EVENT_HEADER) {
            Some("ping") => return DispatchOutcome::accepted("Pong"),
            Some("push") => {}
            _ => return DispatchOutcome::reject(StatusCode::BAD_REQUEST, "Not a push event"),
        }

        let event: GitHubPushEvent = match serde_json::from_slice(request.body()) {
            Ok(event) => event,
            Err(err) => {
                return DispatchOutcome::reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to decode request body: {err}"),
                );
            }
        };

        if !event.git_ref.starts_with(&self.ref_prefix) {
            debug!(git_ref = %event.git_ref, prefix = %self.ref_prefix, "ref outside prefix");
            return DispatchOutcome::accepted(format!(
                "The ref {:?} does not have the required prefix {:?}",
                event.git_ref, self.ref_prefix
            ));
        }

        DispatchOutcome::Forward(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::Method;

    fn request(event: &str, body: &str) -> InboundRequest {
        InboundRequest::new(Method::POST, "/github", body.to_string()).with_header(EVENT_HEADER, event)
    }

    #[tokio::test]
    async fn test_ping_is_pong() {
        let outcome = GitHubPushHook::default().handle(&request("ping", "not json")).await;
        assert_eq!(outcome, DispatchOutcome::accepted("Pong"));
    }

    #[tokio::test]
    async fn test_non_push_is_rejected() {
        let outcome = GitHubPushHook::default().handle(&request("issues", "{}")).await;
        assert_eq!(
            outcome,
            DispatchOutcome::reject(StatusCode::BAD_REQUEST, "Not a push event")
        );
    }

    #[tokio::test]
    async fn test_missing_event_header_is_rejected() {
        let req = InboundRequest::new(Method::POST, "/github", "{}");
        let outcome = GitHubPushHook::default().handle(&req).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Reject { status: StatusCode::BAD_REQUEST, .. }
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_server_error() {
        let outcome = GitHubPushHook::default().handle(&request("push", "{")).await;
        match outcome {
            DispatchOutcome::Reject { status, detail } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert!(detail.starts_with("Failed to decode request body: "));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ref_outside_prefix_is_skipped() {
        let outcome = GitHubPushHook::default()
            .handle(&request("push", r#"{"ref":"refs/tags/v1.0.0"}"#))
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::accepted(
                r#"The ref "refs/tags/v1.0.0" does not have the required prefix "refs/heads/""#
            )
        );
    }

    #[tokio::test]
    async fn test_empty_push_body_is_skipped() {
        let outcome = GitHubPushHook::default().handle(&request("push", "{}")).await;
        assert_eq!(
            outcome,
            DispatchOutcome::accepted(r#"The ref "" does not have the required prefix "refs/heads/""#)
        );
    }

    #[tokio::test]
    async fn test_matching_push_is_forwarded() {
        let body = r#"{
            "ref": "refs/heads/main",
            "compare": "https://github.com/acme/app/compare/a...b",
            "head_commit": {"message": "Fix it\n\nDetails", "timestamp": "2024-05-01T10:00:00Z",
                            "author": {"name": "Ada", "email": "ada@example.com"}}
        }"#;
        let outcome = GitHubPushHook::default().handle(&request("push", body)).await;
        let event = outcome.payload().unwrap();
        assert_eq!(event.short_ref(), "main");
        assert_eq!(event.head_commit.as_ref().unwrap().title(), "Fix it");
    }
}
