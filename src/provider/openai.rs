// OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::{header, Client as HttpClient};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::provider::{CompletionParams, CompletionProvider};
use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Long-lived client for the OpenAI chat completions endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: SecureApiKey,
    pub base_url: String,
}

impl OpenAiClient {
    /// Create a client with the default endpoint and timeout
    pub fn new(api_key: SecureApiKey) -> InsightsResult<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client whose calls are aborted after `timeout`
    pub fn with_timeout(api_key: SecureApiKey, timeout: Duration) -> InsightsResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                InsightsError::ConfigError(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root, e.g. a proxy or a test server
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Turn non-success statuses into `ProviderError`s
    async fn handle_error_response(
        &self,
        response: reqwest::Response,
    ) -> InsightsResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        let sanitized_error = sanitize_error_message(&error_text);

        if status == 429 {
            let retry_after = headers
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(InsightsError::rate_limited(
                format!("rate limited by provider: {}", sanitized_error),
                retry_after,
            ));
        }

        Err(InsightsError::provider_error(
            format!("provider returned {}: {}", status, sanitized_error),
            Some(status),
            None::<reqwest::Error>,
        ))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> InsightsResult<String> {
        let endpoint = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &params.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            response_format: params.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request to provider timed out".to_string()
                } else {
                    format!("request to provider failed: {}", e)
                };
                InsightsError::provider_error(message, None, Some(e))
            })?;

        let response = self.handle_error_response(response).await?;

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            InsightsError::provider_error(
                format!("unreadable provider response: {}", e),
                None,
                Some(e),
            )
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                InsightsError::simple_provider_error("provider response has no message content")
            })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
