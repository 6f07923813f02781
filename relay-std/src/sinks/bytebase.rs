//! Bytebase issues for merged migration files.

use super::PartialFailure;
use crate::{
    payload::{GerritEvent, IssueCreate, MigrationDetail},
    service::{BytebaseService, GerritService},
    template::PlaceholderTemplate,
};
use relay_core::{BoxError, ConfigError, RequestContext, Route, Sink};
use tracing::{debug, info, warn};

/// Connection settings of [`BytebaseIssueSink`].
#[derive(Clone, Default)]
pub struct BytebaseSinkConfig {
    /// Gerrit base URL.
    pub gerrit_url: String,
    /// Gerrit account name.
    pub gerrit_account: String,
    /// Gerrit HTTP password.
    pub gerrit_password: String,
    /// Gerrit project whose merges are turned into issues.
    pub project: String,
    /// Branch of `project`.
    pub branch: String,
    /// Bytebase base URL.
    pub bytebase_url: String,
    /// Bytebase service account.
    pub bytebase_service_account: String,
    /// Bytebase service key.
    pub bytebase_service_key: String,
}

impl BytebaseSinkConfig {
    fn check(&self) -> Result<(), ConfigError> {
        let missing = |values: &[&String]| values.iter().any(|v| v.is_empty());
        if missing(&[&self.gerrit_url, &self.gerrit_account, &self.gerrit_password]) {
            return Err(ConfigError::new(
                "bytebase",
                r#"the "--gerrit-url, --gerrit-account and --gerrit-password" is required"#,
            ));
        }
        if missing(&[&self.project, &self.branch]) {
            return Err(ConfigError::new(
                "bytebase",
                r#"the "--gerrit-repository and --gerrit-branch" is required"#,
            ));
        }
        if missing(&[
            &self.bytebase_url,
            &self.bytebase_service_account,
            &self.bytebase_service_key,
        ]) {
            return Err(ConfigError::new(
                "bytebase",
                r#"the "--bytebase-url, --bytebase-service-account and --bytebase-service-key" is required"#,
            ));
        }
        Ok(())
    }
}

/// Opens one Bytebase issue per migration file of a merged Gerrit change.
///
/// Files are matched against the path template; Gerrit's magic entries, non
/// `.sql` files and paths outside the template are skipped. A file that fails
/// is reported without stopping the remaining files.
pub struct BytebaseIssueSink {
    config: BytebaseSinkConfig,
    template: PlaceholderTemplate,
    gerrit: GerritService,
    bytebase: BytebaseService,
}

impl BytebaseIssueSink {
    /// Create the sink. Credentials are checked by [`Sink::validate`].
    pub fn new(
        config: BytebaseSinkConfig,
        template: PlaceholderTemplate,
        client: reqwest::Client,
    ) -> Self {
        let gerrit = GerritService::new(
            client.clone(),
            config.gerrit_url.clone(),
            config.gerrit_account.clone(),
            config.gerrit_password.clone(),
        );
        let bytebase = BytebaseService::new(
            client,
            config.bytebase_url.clone(),
            config.bytebase_service_account.clone(),
            config.bytebase_service_key.clone(),
        );
        Self {
            config,
            template,
            gerrit,
            bytebase,
        }
    }

    async fn create_issue(
        &self,
        ctx: &RequestContext,
        change: &str,
        revision: &str,
        file: &str,
    ) -> Result<bool, BoxError> {
        let Some(info) = self.template.extract(file)? else {
            debug!(file, template = self.template.as_str(), "file outside the path template");
            return Ok(false);
        };

        let statement = self
            .gerrit
            .get_file_content(ctx, change, revision, file)
            .await?;

        let name = format!("[{}] {}", info.title(), file);
        info!(issue = %name, "creating issue");
        let issue = IssueCreate {
            project_key: info.project_key.unwrap_or_default(),
            name,
            issue_type: info.migration_type.into(),
            description: info.description,
            migration_list: vec![MigrationDetail {
                migration_type: info.migration_type,
                database_name: info.database,
                environment_name: info.environment.unwrap_or_default(),
                statement,
                schema_version: info.version,
            }],
        };
        self.bytebase.create_issue(ctx, &issue).await?;
        Ok(true)
    }
}

fn is_migration_file(file: &str) -> bool {
    !file.starts_with('/') && file.ends_with(".sql")
}

impl Sink<GerritEvent> for BytebaseIssueSink {
    fn name(&self) -> &str {
        "bytebase"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.config.check()
    }

    async fn process(
        &self,
        ctx: &RequestContext,
        route: &Route,
        payload: &GerritEvent,
    ) -> Result<(), BoxError> {
        let (Some(change), Some(patch_set)) = (&payload.change, &payload.patch_set) else {
            debug!(%route, "event without change or patch set");
            return Ok(());
        };
        if change.project != self.config.project || change.branch != self.config.branch {
            debug!(
                %route,
                project = %change.project,
                branch = %change.branch,
                "ignore event outside the configured branch"
            );
            return Ok(());
        }

        let files = self
            .gerrit
            .list_files_in_change(ctx, &change.id, &patch_set.revision)
            .await?;

        let mut failures = PartialFailure::default();
        let mut created = 0usize;
        for file in files.keys().filter(|f| is_migration_file(f)) {
            match self
                .create_issue(ctx, &change.id, &patch_set.revision, file)
                .await
            {
                Ok(true) => created += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(%route, file, error = %err, "failed to create issue");
                    failures.push(format!("{file}: {err}"));
                }
            }
        }
        info!(%route, change = %change.id, created, failed = failures.failures().len(), "processed merged change");
        failures.into_result()?;
        Ok(())
    }
}
