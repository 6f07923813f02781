//! Gerrit merge hook.

use crate::payload::GerritEvent;
use relay_core::{ConfigError, DispatchOutcome, Hook, InboundRequest, StatusCode};
use tracing::debug;

/// Forwards `change-merged` events for one project and branch.
#[derive(Debug, Clone)]
pub struct GerritMergeHook {
    project: String,
    branch: String,
}

impl GerritMergeHook {
    /// Forward merges into `branch` of `project`.
    pub fn new(project: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            branch: branch.into(),
        }
    }
}

impl Hook for GerritMergeHook {
    type Payload = GerritEvent;

    fn name(&self) -> &'static str {
        "gerrit-merge"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.project.is_empty() {
            return Err(ConfigError::new(
                self.name(),
                r#"the "--gerrit-repository" is required"#,
            ));
        }
        if self.branch.is_empty() {
            return Err(ConfigError::new(self.name(), r#"the "--gerrit-branch" is required"#));
        }
        Ok(())
    }

    async fn handle(&self, request: &InboundRequest) -> DispatchOutcome<GerritEvent> {
        let event: GerritEvent = match serde_json::from_slice(request.body()) {
            Ok(event) => event,
            Err(err) => {
                return DispatchOutcome::reject(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to decode request body: {err}"),
                );
            }
        };

        if !event.is_change_merged() {
            return DispatchOutcome::accepted(format!("Skip {} event", event.event_type));
        }

        let (project, branch) = event
            .change
            .as_ref()
            .map(|change| (change.project.as_str(), change.branch.as_str()))
            .unwrap_or_default();
        if project != self.project || branch != self.branch {
            debug!(project, branch, "merge outside the watched branch");
            return DispatchOutcome::accepted(format!(
                "Skip the message for {branch} branch in {project} project"
            ));
        }

        DispatchOutcome::Forward(event)
    }
}
