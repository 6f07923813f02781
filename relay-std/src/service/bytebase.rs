//! Bytebase API client.

use super::{ServiceError, bounded, endpoint, read_success};
use crate::payload::IssueCreate;
use relay_core::RequestContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Client for a Bytebase instance, authenticated as a service account.
pub struct BytebaseService {
    client: reqwest::Client,
    url: String,
    service_account: String,
    service_key: String,
}

impl BytebaseService {
    /// Create a client for the Bytebase instance at `url`.
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        service_account: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            service_account: service_account.into(),
            service_key: service_key.into(),
        }
    }

    /// Exchange the service account credentials for an access token.
    pub async fn login(&self, ctx: &RequestContext) -> Result<String, ServiceError> {
        let request = self
            .client
            .post(endpoint(&self.url, "v1/auth/login"))
            .json(&LoginRequest {
                email: &self.service_account,
                password: &self.service_key,
            });
        let response = bounded(request, ctx)?.send().await?;
        let body = read_success(response).await?;
        let login: LoginResponse = serde_json::from_str(&body)
            .map_err(|err| ServiceError::InvalidResponse(format!("failed to decode login response: {err}")))?;
        Ok(login.token)
    }

    /// Log in and create one issue.
    pub async fn create_issue(
        &self,
        ctx: &RequestContext,
        issue: &IssueCreate,
    ) -> Result<(), ServiceError> {
        let token = self.login(ctx).await?;
        let request = self
            .client
            .post(endpoint(&self.url, "v1/issue"))
            .bearer_auth(token)
            .json(issue);
        let response = bounded(request, ctx)?.send().await?;
        read_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{payload::MigrationDetail, template::MigrationType};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn issue() -> IssueCreate {
        IssueCreate {
            project_key: "team-a".to_string(),
            name: "[Change data] team-a/prod/orders##v13##dml##backfill.sql".to_string(),
            issue_type: MigrationType::Data.into(),
            description: "Backfill".to_string(),
            migration_list: vec![MigrationDetail {
                migration_type: MigrationType::Data,
                database_name: "orders".to_string(),
                environment_name: "prod".to_string(),
                statement: "UPDATE t SET c = 1;".to_string(),
                schema_version: "v13".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_issue_logs_in_first() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .and(body_partial_json(serde_json::json!({
                "email": "relay@service.bytebase.com",
                "password": "bbs_key"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t0k"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/issue"))
            .and(header("authorization", "Bearer t0k"))
            .and(body_partial_json(serde_json::json!({
                "projectKey": "team-a",
                "type": "bb.issue.database.data.update"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let bytebase = BytebaseService::new(
            reqwest::Client::new(),
            server.uri(),
            "relay@service.bytebase.com",
            "bbs_key",
        );
        bytebase
            .create_issue(&RequestContext::default(), &issue())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_login_stops_before_issue() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/issue"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let bytebase = BytebaseService::new(reqwest::Client::new(), server.uri(), "a", "b");
        let err = bytebase
            .create_issue(&RequestContext::default(), &issue())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 401, .. }));
    }
}
