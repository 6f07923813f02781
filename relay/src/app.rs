//! Startup wiring: turns a [`Config`] into a [`Registry`].

use crate::{
    config::Config,
    orchestrator::{Fanout, Registry, RegistryBuilder},
};
use relay_core::{RegistryError, Route};
use relay_std::{
    hooks::{GerritMergeHook, GitHubPushHook},
    sinks::{BytebaseIssueSink, BytebaseSinkConfig, LarkSink},
    template::{PlaceholderTemplate, TemplateError},
};
use thiserror::Error;

/// Errors that keep the relay from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The outbound HTTP client could not be built.
    #[error("failed to build the HTTP client")]
    Client(#[source] reqwest::Error),
    /// The file path template does not compile.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// A route could not be mounted.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Build the shared outbound HTTP client.
pub fn http_client() -> Result<reqwest::Client, StartupError> {
    reqwest::Client::builder()
        .user_agent(concat!("relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(StartupError::Client)
}

/// Mount every configured route.
///
/// - the GitHub route is always mounted, with the Lark sink as essential
/// - the Gerrit route is mounted when a repository is configured, with the
///   Bytebase sink as optional
pub fn build_registry(config: &Config, client: reqwest::Client) -> Result<Registry, StartupError> {
    let mut builder = RegistryBuilder::with_delivery(Fanout::from(config.fanout));

    builder
        .route(
            Route::post(&config.github_path),
            GitHubPushHook::new(&config.github_ref_prefix),
        )
        .sink(LarkSink::new(config.lark_urls(), client.clone()))
        .mount()?;

    if let Some(repository) = config.gerrit_repository() {
        let template = PlaceholderTemplate::compile(&config.file_path_template)?;
        let sink_config = BytebaseSinkConfig {
            gerrit_url: config.gerrit_url.clone().unwrap_or_default(),
            gerrit_account: config.gerrit_account.clone().unwrap_or_default(),
            gerrit_password: config.gerrit_password.clone().unwrap_or_default(),
            project: repository.to_string(),
            branch: config.gerrit_branch.clone(),
            bytebase_url: config.bytebase_url.clone(),
            bytebase_service_account: config.bytebase_service_account.clone().unwrap_or_default(),
            bytebase_service_key: config.bytebase_service_key.clone().unwrap_or_default(),
        };
        builder
            .route(
                Route::post(&config.gerrit_path),
                GerritMergeHook::new(repository, &config.gerrit_branch),
            )
            .optional_sink(BytebaseIssueSink::new(sink_config, template, client))
            .mount()?;
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("relay").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_github_route_requires_lark_urls() {
        let err = build_registry(&config(&[]), reqwest::Client::new()).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Registry(RegistryError::InvalidSink { ref sink, .. }) if sink == "lark"
        ));
    }

    #[test]
    fn test_gerrit_route_is_opt_in() {
        let registry = build_registry(
            &config(&["--lark-urls", "https://open.feishu.cn/hook/abc"]),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(registry.len(), 1);

        let registry = build_registry(
            &config(&[
                "--lark-urls",
                "https://open.feishu.cn/hook/abc",
                "--gerrit-repository",
                "db",
            ]),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(registry.len(), 2);

        // Without credentials the Bytebase sink is dropped, the route stays.
        let (_, hook, sinks) = registry
            .routes()
            .find(|(route, _, _)| route.path() == "/gerrit")
            .unwrap();
        assert_eq!(hook, "gerrit-merge");
        assert!(sinks.is_empty());
    }

    #[test]
    fn test_concurrent_fanout_builds() {
        let registry = build_registry(
            &config(&[
                "--lark-urls",
                "https://open.feishu.cn/hook/abc",
                "--fanout",
                "concurrent",
            ]),
            reqwest::Client::new(),
        )
        .unwrap();
        let debug = format!("{registry:?}");
        assert!(debug.starts_with("Registry { routes: ["), "{debug}");
        assert!(debug.contains("/github"), "{debug}");
    }

    #[test]
    fn test_invalid_template_fails_startup() {
        let err = build_registry(
            &config(&[
                "--lark-urls",
                "https://open.feishu.cn/hook/abc",
                "--gerrit-repository",
                "db",
                "--file-path-template",
                "{{NOPE}}.sql",
            ]),
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, StartupError::Template(_)));
    }
}
