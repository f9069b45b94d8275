// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! One POST per call. Retries are the caller's decision, so a transient
//! status is reported like any other failure.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use switchyard_core::SwitchyardError;
use tracing::debug;

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Authenticated client with connection pooling and a request timeout.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: &str, api_version: &str, timeout: Duration) -> Result<Self, SwitchyardError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| SwitchyardError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                SwitchyardError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SwitchyardError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Point the client at a mock server.
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Send `request` and return the full response.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, SwitchyardError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| SwitchyardError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let body = response.text().await.map_err(|e| SwitchyardError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Anthropic API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(SwitchyardError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| SwitchyardError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::ApiMessage;

    fn test_client(base_url: &str) -> AnthropicClient {
        AnthropicClient::new("test-api-key", "2023-06-01", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_request() -> MessageRequest {
        MessageRequest {
            model: "claude-haiku-4-5-20251001".into(),
            messages: vec![ApiMessage::user("Hello")],
            system: Some("Be brief.".into()),
            max_tokens: 256,
        }
    }

    fn ok_body(id: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": "claude-haiku-4-5-20251001",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        })
    }

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "model": "claude-haiku-4-5-20251001",
                "system": "Be brief.",
                "max_tokens": 256,
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("msg_ok", "Hi")))
            .expect(1)
            .mount(&server)
            .await;

        let resp = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap();
        assert_eq!(resp.id, "msg_ok");
        assert_eq!(resp.text(), "Hi");
        assert_eq!(resp.usage.output_tokens, 5);
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "rate_limit_error", "message": "Rate limited"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchyardError::Provider { .. }));
        assert!(err.to_string().contains("rate_limit_error"), "got: {err}");
    }

    #[tokio::test]
    async fn unstructured_error_body_is_reported_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("502"), "got: {err}");
        assert!(err.contains("bad gateway"), "got: {err}");
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse API response"));
    }

    #[test]
    fn rejects_unprintable_api_key() {
        let err = AnthropicClient::new("bad\nkey", "2023-06-01", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SwitchyardError::Config(_)));
    }
}
