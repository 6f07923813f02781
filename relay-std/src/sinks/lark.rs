//! Lark chat notifications for GitHub pushes.

use super::PartialFailure;
use crate::{payload::GitHubPushEvent, redact::redact_url, service::LarkService};
use relay_core::{BoxError, ConfigError, RequestContext, Route, Sink};
use tracing::{debug, warn};

/// Render the one-line notification for a push.
pub fn render_push(event: &GitHubPushEvent) -> String {
    if event.deleted {
        return match &event.pusher {
            Some(pusher) if !pusher.name.is_empty() => {
                format!("The ref {:?} has been deleted by {}", event.git_ref, pusher.name)
            }
            _ => format!("The ref {:?} has been deleted", event.git_ref),
        };
    }

    match &event.head_commit {
        Some(commit) => format!(
            "New commits have been pushed to {:?} by {} at {}: {} ({})",
            event.git_ref,
            commit.author.name,
            commit.timestamp,
            commit.title(),
            event.compare
        ),
        None => format!(
            "New commits have been pushed to {:?}: {}",
            event.git_ref, event.compare
        ),
    }
}

/// Posts every forwarded push to each configured Lark bot.
///
/// Destinations are independent. A failing destination is reported without
/// stopping the ones after it. Destination URLs embed the bot token, so they
/// only ever appear redacted.
pub struct LarkSink {
    urls: Vec<String>,
    lark: LarkService,
}

impl LarkSink {
    /// Post to every URL in `urls`.
    pub fn new(urls: Vec<String>, client: reqwest::Client) -> Self {
        Self {
            urls,
            lark: LarkService::new(client),
        }
    }
}

impl Sink<GitHubPushEvent> for LarkSink {
    fn name(&self) -> &str {
        "lark"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.urls.is_empty() {
            return Err(ConfigError::new(
                "lark",
                r#"the "--lark-urls" or "LARK_URLS" is required"#,
            ));
        }
        for url in &self.urls {
            if let Err(err) = url::Url::parse(url) {
                return Err(ConfigError::new(
                    "lark",
                    format!("invalid destination URL {:?}: {err}", redact_url(url)),
                ));
            }
        }
        Ok(())
    }

    async fn process(
        &self,
        ctx: &RequestContext,
        route: &Route,
        payload: &GitHubPushEvent,
    ) -> Result<(), BoxError> {
        let text = render_push(payload);
        let mut failures = PartialFailure::default();
        for url in &self.urls {
            let redacted = redact_url(url);
            match self.lark.send_text(ctx, url, &text).await {
                Ok(()) => debug!(%route, url = %redacted, "sent to Lark"),
                Err(err) => {
                    warn!(%route, url = %redacted, error = %err, "failed to send to Lark");
                    failures.push(format!("failed to send to Lark {redacted:?}: {err}"));
                }
            }
        }
        failures.into_result()?;
        Ok(())
    }
}
