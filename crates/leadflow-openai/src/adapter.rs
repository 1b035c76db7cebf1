// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GenerativeBackend adapter over the chat-completions client.

use std::time::Duration;

use async_trait::async_trait;

use leadflow_config::model::ProviderConfig;
use leadflow_core::types::{
    AdapterKind, BackendMessage, CompletionReply, CompletionRequest, HealthStatus,
};
use leadflow_core::{Adapter, GenerativeBackend, LeadflowError};

use crate::client::ChatClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Generative backend speaking the OpenAI chat-completions format.
#[derive(Debug)]
pub struct OpenAiBackend {
    client: ChatClient,
    model: String,
}

impl OpenAiBackend {
    /// Build a backend from provider configuration.
    ///
    /// The API key must be present (config file or `LEADFLOW_PROVIDER_API_KEY`).
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LeadflowError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            LeadflowError::Config(
                "provider.api_key is not configured (set LEADFLOW_PROVIDER_API_KEY)".into(),
            )
        })?;
        let client = ChatClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Build a backend against an explicit endpoint (used by tests).
    pub fn new(client: ChatClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl Adapter for OpenAiBackend {
    fn name(&self) -> &str {
        "openai-chat"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        // No side-effect-free ping exists on chat-completions gateways; a
        // constructed client with credentials is as healthy as we can claim.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionReply, LeadflowError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m: &BackendMessage| ApiMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        }));

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let wire_request = ChatCompletionRequest {
            model: model.clone(),
            messages,
            max_tokens: Some(request.max_tokens),
        };

        let content = self.client.complete_text(&wire_request).await?;
        Ok(CompletionReply { content, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server_uri: &str) -> OpenAiBackend {
        let client =
            ChatClient::new("test-key", server_uri, Duration::from_secs(5)).unwrap();
        OpenAiBackend::new(client, "gpt-4o-mini".to_string())
    }

    fn completion_request(system: Option<&str>) -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            system: system.map(String::from),
            messages: vec![BackendMessage {
                role: "user".into(),
                content: "I need help with scaling".into(),
            }],
            max_tokens: 512,
        }
    }

    #[tokio::test]
    async fn system_preamble_leads_the_message_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "Be helpful."},
                    {"role": "user", "content": "I need help with scaling"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Sure, tell me more"}}]
            })))
            .mount(&server)
            .await;

        let backend = backend_for(&server.uri());
        let reply = backend
            .complete(completion_request(Some("Be helpful.")))
            .await
            .unwrap();
        assert_eq!(reply.content, "Sure, tell me more");
        assert_eq!(reply.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn missing_api_key_is_a_config_error() {
        let config = ProviderConfig {
            api_key: None,
            ..Default::default()
        };
        let err = OpenAiBackend::from_config(&config).unwrap_err();
        assert!(matches!(err, LeadflowError::Config(_)));
    }

    #[tokio::test]
    async fn adapter_identity() {
        let server = MockServer::start().await;
        let backend = backend_for(&server.uri());
        assert_eq!(backend.name(), "openai-chat");
        assert_eq!(backend.kind(), AdapterKind::Backend);
        assert_eq!(
            backend.health_check().await.unwrap(),
            HealthStatus::Healthy
        );
    }
}
