//! Gerrit REST API client.

use super::{ServiceError, bounded, endpoint, read_success};
use base64::{Engine, engine::general_purpose::STANDARD};
use relay_core::RequestContext;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Every JSON response of the Gerrit REST API starts with this line.
const XSSI_PREFIX: &str = ")]}'\n";

/// Gerrit's description of one file in a revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    /// Single-letter status (`A`, `D`, `R`, `C`, `W`). Absent means modified.
    #[serde(default)]
    pub status: Option<String>,
    /// Lines added.
    #[serde(default)]
    pub lines_inserted: Option<u64>,
    /// Lines removed.
    #[serde(default)]
    pub lines_deleted: Option<u64>,
}

/// Client for the authenticated (`/a/`) Gerrit REST endpoints.
pub struct GerritService {
    client: reqwest::Client,
    url: String,
    username: String,
    password: String,
}

impl GerritService {
    /// Create a client for the Gerrit instance at `url`.
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// List the files touched by `revision` of `change`, keyed by path.
    ///
    /// The map includes Gerrit's magic entries such as `/COMMIT_MSG`.
    pub async fn list_files_in_change(
        &self,
        ctx: &RequestContext,
        change: &str,
        revision: &str,
    ) -> Result<BTreeMap<String, FileInfo>, ServiceError> {
        let url = endpoint(
            &self.url,
            &format!("a/changes/{change}/revisions/{revision}/files"),
        );
        let body = self.get(ctx, &url).await?;
        let json = strip_xssi_prefix(&body)?;
        serde_json::from_str(json)
            .map_err(|err| ServiceError::InvalidResponse(format!("failed to decode file list: {err}")))
    }

    /// Fetch the content of `filename` as of `revision` of `change`.
    pub async fn get_file_content(
        &self,
        ctx: &RequestContext,
        change: &str,
        revision: &str,
        filename: &str,
    ) -> Result<String, ServiceError> {
        let escaped: String = url::form_urlencoded::byte_serialize(filename.as_bytes()).collect();
        let url = endpoint(
            &self.url,
            &format!("a/changes/{change}/revisions/{revision}/files/{escaped}/content"),
        );
        let body = self.get(ctx, &url).await?;
        decode_content(&body)
    }

    async fn get(&self, ctx: &RequestContext, url: &str) -> Result<String, ServiceError> {
        let request = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password));
        let response = bounded(request, ctx)?.send().await?;
        read_success(response).await
    }
}

fn strip_xssi_prefix(body: &str) -> Result<&str, ServiceError> {
    body.strip_prefix(XSSI_PREFIX).ok_or_else(|| {
        ServiceError::InvalidResponse(format!(
            "response is missing the {XSSI_PREFIX:?} prefix"
        ))
    })
}

fn decode_content(body: &str) -> Result<String, ServiceError> {
    let bytes = STANDARD
        .decode(body.trim())
        .map_err(|err| ServiceError::InvalidResponse(format!("file content is not base64: {err}")))?;
    String::from_utf8(bytes)
        .map_err(|err| ServiceError::InvalidResponse(format!("file content is not UTF-8: {err}")))
}
