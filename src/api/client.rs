use super::types::{AgentStatus, HealthStatus, PromptRequest};
use super::utils::{self, HEALTH_TIMEOUT};
use super::AgentBackend;
use crate::error::{LogSearchError, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

const QUERY_PATH: &str = "/get_prompt";
const RESET_PATH: &str = "/reset_conversation";
const HEALTH_PATH: &str = "/health";
const AGENT_STATUS_PATH: &str = "/agent_status";

const RESET_FAILED: &str = "Failed to reset conversation";

/// HTTP client for the log search backend
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LogSearchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        let response = utils::check_response_status(response, |status| {
            format!("Health check failed: {}", status)
        })
        .await?;

        Ok(response.json::<HealthStatus>().await?)
    }

    pub async fn agent_status(&self) -> Result<AgentStatus> {
        let response = self
            .client
            .get(self.url(AGENT_STATUS_PATH))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        let response = utils::check_response_status(response, |status| {
            format!("Failed to fetch agent status: {}", status)
        })
        .await?;

        Ok(response.json::<AgentStatus>().await?)
    }
}

impl AgentBackend for BackendClient {
    async fn query(&self, prompt: &str) -> Result<serde_json::Value> {
        tracing::debug!(prompt_len = prompt.len(), "Sending prompt to agent");

        let response = self
            .client
            .post(self.url(QUERY_PATH))
            .json(&PromptRequest::new(prompt))
            .send()
            .await?;
        let response =
            utils::check_response_status(response, |status| format!("Failed to fetch: {}", status))
                .await?;

        let body = utils::read_json_body(response).await?;
        tracing::debug!(response = %body, "Agent response");
        Ok(body)
    }

    async fn reset(&self) -> Result<()> {
        let response = self.client.post(self.url(RESET_PATH)).send().await?;
        utils::check_response_status(response, |_| RESET_FAILED.to_string()).await?;

        tracing::info!("Conversation reset on backend");
        Ok(())
    }
}
