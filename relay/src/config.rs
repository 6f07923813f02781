//! Command line and environment configuration.
//!
//! Every flag can also be set through the environment variable named next to
//! it. Values are read once at startup.

use crate::{logging::LogFormat, orchestrator::Fanout, server::ServerOptions};
use clap::{Parser, ValueEnum};
use std::{net::SocketAddr, time::Duration};

/// Default file path template for migration files.
pub const DEFAULT_FILE_PATH_TEMPLATE: &str =
    "{{PROJECT_KEY}}/{{ENV_NAME}}/{{DB_NAME}}##{{VERSION}}##{{TYPE}}##{{DESCRIPTION}}.sql";

/// How a route fans a payload out to its sinks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FanoutMode {
    /// One sink after the other, in binding order.
    #[default]
    Sequential,
    /// All sinks at once.
    Concurrent,
}

impl From<FanoutMode> for Fanout {
    fn from(mode: FanoutMode) -> Self {
        match mode {
            FanoutMode::Sequential => Fanout::Sequential,
            FanoutMode::Concurrent => Fanout::Concurrent,
        }
    }
}

/// Relay configuration.
#[derive(Clone, Parser)]
#[command(
    name = "relay",
    version,
    about = "Receives webhooks and relays them to chat and issue trackers"
)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "RELAY_ADDR", default_value = "0.0.0.0:2830")]
    pub addr: SocketAddr,

    /// Path of the GitHub push webhook.
    #[arg(long, env = "RELAY_GITHUB_PATH", default_value = "/github")]
    pub github_path: String,

    /// Only pushes to refs with this prefix are relayed.
    #[arg(long, env = "GITHUB_REF_PREFIX", default_value = "refs/heads/")]
    pub github_ref_prefix: String,

    /// A comma separated list of Lark webhook URLs.
    #[arg(long, env = "LARK_URLS", value_delimiter = ',', hide_env_values = true)]
    pub lark_urls: Vec<String>,

    /// Path of the Gerrit webhook.
    #[arg(long, env = "RELAY_GERRIT_PATH", default_value = "/gerrit")]
    pub gerrit_path: String,

    /// The Gerrit service URL.
    #[arg(long, env = "GERRIT_URL")]
    pub gerrit_url: Option<String>,

    /// The Gerrit service account name.
    #[arg(long, env = "GERRIT_ACCOUNT")]
    pub gerrit_account: Option<String>,

    /// The Gerrit service account password.
    #[arg(long, env = "GERRIT_PASSWORD", hide_env_values = true)]
    pub gerrit_password: Option<String>,

    /// The Gerrit repository name. The Gerrit route is mounted only when set.
    #[arg(long, env = "GERRIT_REPOSITORY")]
    pub gerrit_repository: Option<String>,

    /// The branch name in the Gerrit repository.
    #[arg(long, env = "GERRIT_BRANCH", default_value = "main")]
    pub gerrit_branch: String,

    /// The Bytebase service URL.
    #[arg(long, env = "BYTEBASE_URL", default_value = "http://localhost:8080")]
    pub bytebase_url: String,

    /// The Bytebase service account name.
    #[arg(long, env = "BYTEBASE_SERVICE_ACCOUNT")]
    pub bytebase_service_account: Option<String>,

    /// The Bytebase service account key.
    #[arg(long, env = "BYTEBASE_SERVICE_KEY", hide_env_values = true)]
    pub bytebase_service_key: Option<String>,

    /// Template migration file paths are matched against.
    #[arg(long, env = "FILE_PATH_TEMPLATE", default_value = DEFAULT_FILE_PATH_TEMPLATE)]
    pub file_path_template: String,

    /// Time budget of one inbound request, sinks included. 0 disables it.
    #[arg(long, env = "RELAY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "RELAY_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    /// How payloads are fanned out to sinks.
    #[arg(long, env = "RELAY_FANOUT", value_enum, default_value_t = FanoutMode::Sequential)]
    pub fanout: FanoutMode,

    /// Log filter, e.g. `info` or `relay=debug`.
    ///
    /// An explicit `--log-level` wins over `RELAY_LOG`, which wins over the
    /// default.
    #[arg(long, env = "RELAY_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, env = "RELAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    /// Lark destinations with blanks removed.
    pub fn lark_urls(&self) -> Vec<String> {
        self.lark_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The Gerrit repository, if the Gerrit route should be mounted.
    pub fn gerrit_repository(&self) -> Option<&str> {
        self.gerrit_repository
            .as_deref()
            .map(str::trim)
            .filter(|repository| !repository.is_empty())
    }

    /// Request time budget, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Options of the HTTP server.
    pub fn server_options(&self) -> ServerOptions {
        ServerOptions {
            request_timeout: self.request_timeout(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}
