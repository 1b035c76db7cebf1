// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generative backend for deterministic testing.
//!
//! `MockBackend` implements `GenerativeBackend` with pre-configured results,
//! enabling fast, CI-runnable tests without external API calls. Queued
//! errors let tests script rate-limit and outage scenarios.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadflow_core::types::{
    AdapterKind, CompletionReply, CompletionRequest, HealthStatus,
};
use leadflow_core::{Adapter, GenerativeBackend, LeadflowError};

/// A mock backend that returns pre-configured results.
///
/// Results are popped from a FIFO queue. When the queue is empty, a default
/// "mock reply" text is returned. Every request is recorded for assertions.
pub struct MockBackend {
    results: Arc<Mutex<VecDeque<Result<String, LeadflowError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend with an empty result queue.
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock backend pre-loaded with successful replies.
    pub fn with_replies(replies: Vec<&str>) -> Self {
        let backend = Self::new();
        {
            let results = Arc::clone(&backend.results);
            let mut queue = results.try_lock().expect("fresh mutex");
            queue.extend(replies.into_iter().map(|r| Ok(r.to_string())));
        }
        backend
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, text: &str) {
        self.results.lock().await.push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, error: LeadflowError) {
        self.results.lock().await.push_back(Err(error));
    }

    /// Requests the backend has received so far.
    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        Ok(())
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionReply, LeadflowError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        match self.results.lock().await.pop_front() {
            Some(Ok(content)) => Ok(CompletionReply { content, model }),
            Some(Err(e)) => Err(e),
            None => Ok(CompletionReply {
                content: "mock reply".to_string(),
                model,
            }),
        }
    }
}
