//! Lark (Feishu) custom bot webhooks.

use super::{ServiceError, bounded, read_success};
use relay_core::RequestContext;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    msg_type: &'static str,
    content: TextContent<'a>,
}

/// Client posting text messages to Lark bot webhook URLs.
#[derive(Debug, Clone)]
pub struct LarkService {
    client: reqwest::Client,
}

impl LarkService {
    /// Create a client on top of a shared HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Post `text` to the bot behind `url`.
    pub async fn send_text(
        &self,
        ctx: &RequestContext,
        url: &str,
        text: &str,
    ) -> Result<(), ServiceError> {
        let message = TextMessage {
            msg_type: "text",
            content: TextContent { text },
        };
        let request = bounded(self.client.post(url).json(&message), ctx)?;
        let response = request.send().await?;
        read_success(response).await?;
        Ok(())
    }
}
