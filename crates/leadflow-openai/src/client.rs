// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions gateways.
//!
//! Handles request construction, bearer authentication, status
//! classification, and transient error retry. Rate-limit (429) and
//! payment-required (402) responses are never retried: they must surface to
//! the caller as distinct typed failures.

use std::time::Duration;

use leadflow_core::LeadflowError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for chat-completions communication.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient errors (500, 502, 503, 529).
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ChatClient {
    /// Creates a new chat-completions client.
    ///
    /// # Arguments
    /// * `api_key` - bearer token for the gateway
    /// * `base_url` - endpoint base, e.g. `https://api.openai.com/v1`
    /// * `timeout` - whole-request timeout
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, LeadflowError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                LeadflowError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LeadflowError::BackendUnavailable {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Sends a completion request and returns the parsed response.
    ///
    /// On transient errors (500, 502, 503, 529), retries once after a
    /// 1-second delay. 429 and 402 surface immediately as their own error
    /// variants; a 2xx body with no usable completion text counts as an
    /// unavailable backend, never as an empty reply.
    pub async fn complete_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LeadflowError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| LeadflowError::BackendUnavailable {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| {
                    LeadflowError::BackendUnavailable {
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
                let parsed: ChatCompletionResponse =
                    serde_json::from_str(&body).map_err(|e| {
                        LeadflowError::BackendUnavailable {
                            message: format!("failed to parse backend response: {e}"),
                            source: Some(Box::new(e)),
                        }
                    })?;
                return Ok(parsed);
            }

            // Distinct user-distinguishable failures, surfaced immediately.
            match status.as_u16() {
                429 => return Err(LeadflowError::BackendRateLimited),
                402 => return Err(LeadflowError::BackendPaymentRequired),
                _ => {}
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(LeadflowError::BackendUnavailable {
                    message: format!("backend returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "backend error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                )
            } else {
                format!("backend returned {status}: {body}")
            };
            return Err(LeadflowError::BackendUnavailable {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| LeadflowError::BackendUnavailable {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }

    /// Sends a request and extracts the single completion text.
    ///
    /// A response with no choices or empty content is a malformed backend
    /// response, reported as unavailability.
    pub async fn complete_text(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<String, LeadflowError> {
        let response = self.complete_chat(request).await?;
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(String::from)
            .ok_or_else(|| LeadflowError::BackendUnavailable {
                message: "backend response contained no completion text".into(),
                source: None,
            })
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth
/// retrying. 429 is deliberately absent: over-quota must surface unchanged.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 500 | 502 | 503 | 529)
}
