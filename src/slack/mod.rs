use crate::error::{slack_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Slack Web API endpoint for posting a message
const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Outbound chat dispatch seam
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Post a prepared message payload, authorized by a workspace bot token
    async fn send(&self, bot_token: &str, payload: &Value) -> AppResult<()>;
}

/// Slack Web API client over a shared HTTP client
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
}

impl SlackClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for SlackClient {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl MessageSender for SlackClient {
    async fn send(&self, bot_token: &str, payload: &Value) -> AppResult<()> {
        let response = self
            .client
            .post(POST_MESSAGE_URL)
            .bearer_auth(bot_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| slack_error(&format!("Failed to post message: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(slack_error(&format!(
                "Failed to post message: HTTP {} - {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| slack_error(&format!("Failed to parse post response: {}", e)))?;

        // chat.postMessage reports failures with HTTP 200 and ok=false
        if !body.get("ok").and_then(|v| v.as_bool()).unwrap_or(false) {
            let reason = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return Err(slack_error(&format!("chat.postMessage failed: {}", reason)));
        }

        Ok(())
    }
}
