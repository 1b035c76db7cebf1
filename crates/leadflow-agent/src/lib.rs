// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for the Leadflow engine.
//!
//! [`ChatEngine`] is the request/response pipeline that:
//! - validates and persists the inbound visitor turn
//! - assembles grounded context (catalog + history)
//! - invokes the generative backend under a timeout
//! - persists the assistant reply
//! - selects product recommendations
//! - refreshes derived state (engagement summary, lead score, eager lead)
//!
//! The backend call is the only suspension point; everything else is
//! sequential reads/writes against the Signal Store.

pub mod context;
pub mod recommend;
pub mod signal;

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use leadflow_config::model::{AgentConfig, LeadflowConfig, ProviderConfig};
use leadflow_core::types::{
    Conversation, EngagementReading, EngagementSample, Lead, Product, TurnRole, now_iso,
};
use leadflow_core::{GenerativeBackend, LeadflowError, SignalStore};
use leadflow_scoring::{extract_contact, extract_interest, score_lead, summarize};

/// Fallback lead display name when contact info arrives before a name does.
const UNNAMED_LEAD: &str = "Unknown";

/// Result of a successfully handled message.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub conversation_id: String,
    pub reply: String,
    pub recommended_products: Vec<Product>,
}

/// The conversation orchestrator.
pub struct ChatEngine {
    store: Arc<dyn SignalStore>,
    backend: Arc<dyn GenerativeBackend>,
    agent: AgentConfig,
    provider: ProviderConfig,
    /// Per-conversation locks: a double-submit against the same conversation
    /// serializes here instead of interleaving its turn appends. Different
    /// conversations never contend.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ChatEngine {
    pub fn new(
        store: Arc<dyn SignalStore>,
        backend: Arc<dyn GenerativeBackend>,
        config: &LeadflowConfig,
    ) -> Self {
        info!(agent = config.agent.name.as_str(), "chat engine initialized");
        Self {
            store,
            backend,
            agent: config.agent.clone(),
            provider: config.provider.clone(),
            locks: DashMap::new(),
        }
    }

    /// The store behind this engine, for read-only viewer surfaces.
    pub fn store(&self) -> Arc<dyn SignalStore> {
        Arc::clone(&self.store)
    }

    /// Handle one inbound visitor message end to end.
    ///
    /// With no `conversation_id`, a new conversation is created for
    /// `visitor_name`. On a backend failure the inbound turn remains
    /// persisted and the typed error is returned unchanged -- no reply is
    /// ever fabricated.
    pub async fn handle_message(
        &self,
        conversation_id: Option<&str>,
        message: &str,
        visitor_name: &str,
    ) -> Result<ChatOutcome, LeadflowError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(LeadflowError::Validation(
                "message must not be empty".to_string(),
            ));
        }

        let conversation = self.resolve_conversation(conversation_id, visitor_name).await?;

        let lock = self
            .locks
            .entry(conversation.id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        debug!(conversation_id = %conversation.id, "visitor message received");
        self.store
            .append_turn(&conversation.id, TurnRole::Visitor, message)
            .await?;

        let turns = self.store.list_turns(&conversation.id).await?;
        let catalog = self.store.list_products().await?;
        let preamble = context::load_preamble(&self.agent).await;
        let request = context::assemble_context(
            &preamble,
            &catalog,
            conversation.visitor_name.as_deref(),
            &turns,
            &self.provider.model,
            self.provider.max_tokens,
        );
        debug!(
            conversation_id = %conversation.id,
            turns = turns.len(),
            products = catalog.len(),
            "context assembled"
        );

        let timeout = Duration::from_secs(self.provider.timeout_secs);
        let reply = match tokio::time::timeout(timeout, self.backend.complete(request)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(
                    conversation_id = %conversation.id,
                    error = %e,
                    "generative backend failed; inbound turn remains persisted"
                );
                self.try_refresh(&conversation.id).await;
                return Err(e);
            }
            Err(_) => {
                warn!(
                    conversation_id = %conversation.id,
                    timeout_secs = self.provider.timeout_secs,
                    "generative backend timed out; inbound turn remains persisted"
                );
                self.try_refresh(&conversation.id).await;
                return Err(LeadflowError::BackendUnavailable {
                    message: format!(
                        "generative backend timed out after {}s",
                        self.provider.timeout_secs
                    ),
                    source: None,
                });
            }
        };

        self.store
            .append_turn(&conversation.id, TurnRole::Assistant, &reply.content)
            .await?;

        let recommended_products =
            recommend::select(&turns, &catalog, self.agent.max_recommendations);

        // Derived state is recomputable at any time; its failure must never
        // fail a reply that is already durable.
        self.try_refresh(&conversation.id).await;

        info!(conversation_id = %conversation.id, "reply delivered");
        Ok(ChatOutcome {
            conversation_id: conversation.id,
            reply: reply.content,
            recommended_products,
        })
    }

    /// Ingest one engagement reading: persist the sample, then refresh
    /// derived state.
    pub async fn ingest_sample(
        &self,
        conversation_id: &str,
        reading: EngagementReading,
        metadata: Option<&str>,
    ) -> Result<EngagementSample, LeadflowError> {
        let sample = self
            .store
            .append_engagement_sample(
                conversation_id,
                reading.emotion,
                reading.confidence,
                reading.engagement_score,
                metadata,
            )
            .await?;
        self.try_refresh(conversation_id).await;
        Ok(sample)
    }

    /// Recompute engagement and lead score from stored history.
    ///
    /// The lead materializes eagerly on the first captured email or phone; a
    /// visitor display name alone never creates one. Returns the lead as
    /// stored, or `None` while no reachable contact exists.
    pub async fn refresh_derived(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Lead>, LeadflowError> {
        let conversation = self
            .store
            .get_conversation(conversation_id)
            .await?
            .ok_or_else(|| {
                LeadflowError::Internal(format!(
                    "conversation vanished during rescore: {conversation_id}"
                ))
            })?;

        let turns = self.store.list_turns(conversation_id).await?;
        let samples = self.store.list_engagement_samples(conversation_id).await?;

        let summary = summarize(&samples);
        let contact = extract_contact(&turns, conversation.visitor_name.as_deref());
        if !contact.has_reachable_contact() {
            return Ok(None);
        }

        let (lead_score, score_category) =
            score_lead(&turns, summary.engagement_score, &contact);

        let existing = self.store.get_lead_for_conversation(conversation_id).await?;
        let lead = Lead {
            id: existing
                .as_ref()
                .map(|l| l.id.clone())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            conversation_id: conversation_id.to_string(),
            name: contact
                .name
                .clone()
                .unwrap_or_else(|| UNNAMED_LEAD.to_string()),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            lead_score,
            score_category,
            interest: extract_interest(&turns),
            status: existing
                .as_ref()
                .map(|l| l.status.clone())
                .unwrap_or_else(|| "new".to_string()),
            created_at: existing
                .as_ref()
                .map(|l| l.created_at.clone())
                .unwrap_or_else(now_iso),
        };
        self.store.upsert_lead(&lead).await?;
        debug!(
            conversation_id,
            lead_score,
            category = %lead.score_category,
            "lead rescored"
        );
        Ok(Some(lead))
    }

    async fn resolve_conversation(
        &self,
        conversation_id: Option<&str>,
        visitor_name: &str,
    ) -> Result<Conversation, LeadflowError> {
        match conversation_id {
            Some(id) => self
                .store
                .get_conversation(id)
                .await?
                .ok_or_else(|| {
                    LeadflowError::Validation(format!("unknown conversation id: {id}"))
                }),
            None => {
                let visitor_name = visitor_name.trim();
                if visitor_name.is_empty() {
                    return Err(LeadflowError::Validation(
                        "visitor name is required to start a conversation".to_string(),
                    ));
                }
                let conversation = self.store.create_conversation(Some(visitor_name)).await?;
                info!(conversation_id = %conversation.id, "conversation created");
                Ok(conversation)
            }
        }
    }

    async fn try_refresh(&self, conversation_id: &str) {
        if let Err(e) = self.refresh_derived(conversation_id).await {
            warn!(conversation_id, error = %e, "derived-state refresh failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use leadflow_core::Adapter;
    use leadflow_core::types::{
        AdapterKind, CompletionReply, CompletionRequest, Emotion, HealthStatus, ScoreCategory,
    };
    use leadflow_storage::SqliteSignalStore;

    /// Backend test double returning queued results.
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, LeadflowError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedBackend {
        fn with(replies: Vec<Result<String, LeadflowError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Adapter for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
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
    impl GenerativeBackend for ScriptedBackend {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionReply, LeadflowError> {
            self.requests.lock().await.push(request.clone());
            match self.replies.lock().await.pop_front() {
                Some(Ok(content)) => Ok(CompletionReply {
                    content,
                    model: request.model,
                }),
                Some(Err(e)) => Err(e),
                None => Ok(CompletionReply {
                    content: "scripted reply".to_string(),
                    model: request.model,
                }),
            }
        }
    }

    async fn build_engine(
        replies: Vec<Result<String, LeadflowError>>,
    ) -> (Arc<ChatEngine>, Arc<ScriptedBackend>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("engine.db");

        let mut config = LeadflowConfig::default();
        config.storage.database_path = db_path.to_string_lossy().into_owned();

        let store = Arc::new(SqliteSignalStore::new(config.storage.clone()));
        store.initialize().await.unwrap();

        let backend = Arc::new(ScriptedBackend::with(replies));
        let engine = Arc::new(ChatEngine::new(
            store,
            Arc::clone(&backend) as Arc<dyn GenerativeBackend>,
            &config,
        ));
        (engine, backend, dir)
    }

    async fn seed_catalog(engine: &ChatEngine, count: usize) {
        for i in 0..count {
            engine
                .store()
                .upsert_product(&Product {
                    id: format!("p{i}"),
                    name: format!("Product {i}"),
                    description: "desc".to_string(),
                    price: 10.0 * (i as f64 + 1.0),
                    features: vec![],
                    category: None,
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn new_conversation_persists_visitor_then_assistant() {
        let (engine, _backend, _dir) =
            build_engine(vec![Ok("Sure, tell me more".to_string())]).await;
        seed_catalog(&engine, 5).await;

        let outcome = engine
            .handle_message(None, "I need help with scaling", "Ada")
            .await
            .unwrap();

        assert!(!outcome.conversation_id.is_empty());
        assert_eq!(outcome.reply, "Sure, tell me more");
        assert_eq!(outcome.recommended_products.len(), 3);

        let turns = engine.store().list_turns(&outcome.conversation_id).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::Visitor);
        assert_eq!(turns[0].content, "I need help with scaling");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].content, "Sure, tell me more");
    }

    #[tokio::test]
    async fn recommendations_never_exceed_catalog() {
        let (engine, _backend, _dir) = build_engine(vec![Ok("ok".to_string())]).await;
        seed_catalog(&engine, 2).await;

        let outcome = engine
            .handle_message(None, "what do you sell", "Ada")
            .await
            .unwrap();
        assert_eq!(outcome.recommended_products.len(), 2);
    }

    #[tokio::test]
    async fn rate_limited_backend_leaves_exactly_the_visitor_turn() {
        let (engine, _backend, _dir) =
            build_engine(vec![Err(LeadflowError::BackendRateLimited)]).await;

        let conversation = engine.store().create_conversation(Some("Ada")).await.unwrap();
        let err = engine
            .handle_message(Some(&conversation.id), "I need help with scaling", "Ada")
            .await
            .unwrap_err();
        assert!(matches!(err, LeadflowError::BackendRateLimited));

        let turns = engine.store().list_turns(&conversation.id).await.unwrap();
        assert_eq!(turns.len(), 1, "only the visitor turn is persisted");
        assert_eq!(turns[0].role, TurnRole::Visitor);
    }

    #[tokio::test]
    async fn failed_then_retried_message_keeps_history_consistent() {
        let (engine, _backend, _dir) = build_engine(vec![
            Err(LeadflowError::BackendUnavailable {
                message: "down".into(),
                source: None,
            }),
            Ok("recovered".to_string()),
        ])
        .await;

        let conversation = engine.store().create_conversation(Some("Ada")).await.unwrap();
        let first = engine
            .handle_message(Some(&conversation.id), "hello there assistant", "Ada")
            .await;
        assert!(first.is_err());

        let retried = engine
            .handle_message(Some(&conversation.id), "hello there assistant", "Ada")
            .await
            .unwrap();
        assert_eq!(retried.reply, "recovered");

        // Failed attempt left one visitor turn; the retry adds its own
        // visitor turn plus the reply. Nothing is rolled back or duplicated.
        let turns = engine.store().list_turns(&conversation.id).await.unwrap();
        let roles: Vec<TurnRole> = turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::Visitor, TurnRole::Visitor, TurnRole::Assistant]
        );
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_any_write() {
        let (engine, _backend, _dir) = build_engine(vec![]).await;

        let err = engine.handle_message(None, "   ", "Ada").await.unwrap_err();
        assert!(matches!(err, LeadflowError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_visitor_name_is_rejected_for_new_conversations() {
        let (engine, _backend, _dir) = build_engine(vec![]).await;

        let err = engine.handle_message(None, "hello", "").await.unwrap_err();
        assert!(matches!(err, LeadflowError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_conversation_id_is_rejected() {
        let (engine, _backend, _dir) = build_engine(vec![]).await;

        let err = engine
            .handle_message(Some("no-such-id"), "hello", "Ada")
            .await
            .unwrap_err();
        assert!(matches!(err, LeadflowError::Validation(_)));
    }

    #[tokio::test]
    async fn continuing_a_conversation_reuses_its_id() {
        let (engine, _backend, _dir) = build_engine(vec![
            Ok("first reply".to_string()),
            Ok("second reply".to_string()),
        ])
        .await;

        let first = engine
            .handle_message(None, "I need help with scaling", "Ada")
            .await
            .unwrap();
        let second = engine
            .handle_message(Some(&first.conversation_id), "tell me about pricing", "Ada")
            .await
            .unwrap();

        assert_eq!(first.conversation_id, second.conversation_id);
        let turns = engine.store().list_turns(&first.conversation_id).await.unwrap();
        assert_eq!(turns.len(), 4);
    }

    #[tokio::test]
    async fn grounding_context_includes_catalog_and_history() {
        let (engine, backend, _dir) = build_engine(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ])
        .await;
        seed_catalog(&engine, 1).await;

        let outcome = engine
            .handle_message(None, "I need help with scaling", "Ada")
            .await
            .unwrap();
        engine
            .handle_message(Some(&outcome.conversation_id), "and with reporting", "Ada")
            .await
            .unwrap();

        let requests = backend.requests.lock().await;
        assert_eq!(requests.len(), 2);
        let system = requests[1].system.as_deref().unwrap();
        assert!(system.contains("Product 0"));
        assert!(system.contains("Customer's name: Ada"));
        // Second request carries the full ordered history including the reply.
        let roles: Vec<&str> = requests[1].messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
    }

    #[tokio::test]
    async fn lead_materializes_eagerly_on_captured_email() {
        let (engine, _backend, _dir) = build_engine(vec![
            Ok("nice to meet you".to_string()),
            Ok("noted!".to_string()),
        ])
        .await;

        let outcome = engine
            .handle_message(None, "I need help with scaling", "Ada")
            .await
            .unwrap();
        assert!(
            engine
                .store()
                .get_lead_for_conversation(&outcome.conversation_id)
                .await
                .unwrap()
                .is_none(),
            "no lead before contact info is captured"
        );

        engine
            .handle_message(
                Some(&outcome.conversation_id),
                "you can reach me at ada@example.com",
                "Ada",
            )
            .await
            .unwrap();

        let lead = engine
            .store()
            .get_lead_for_conversation(&outcome.conversation_id)
            .await
            .unwrap()
            .expect("lead should materialize once the email is captured");
        assert_eq!(lead.name, "Ada");
        assert_eq!(lead.email.as_deref(), Some("ada@example.com"));
        assert!(lead.lead_score > 0);
        assert_eq!(
            lead.interest.as_deref(),
            Some("I need help with scaling")
        );
    }

    #[tokio::test]
    async fn rescoring_updates_the_same_lead() {
        let (engine, _backend, _dir) = build_engine(vec![
            Ok("got it".to_string()),
            Ok("thanks!".to_string()),
        ])
        .await;

        let outcome = engine
            .handle_message(None, "contact me at ada@example.com about analytics", "Ada")
            .await
            .unwrap();
        let first = engine
            .store()
            .get_lead_for_conversation(&outcome.conversation_id)
            .await
            .unwrap()
            .unwrap();

        engine
            .handle_message(
                Some(&outcome.conversation_id),
                "my phone is +1 555 010 0100 as well",
                "Ada",
            )
            .await
            .unwrap();
        let second = engine
            .store()
            .get_lead_for_conversation(&outcome.conversation_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.lead_score > first.lead_score);
        assert!(second.phone.is_some());
    }

    #[tokio::test]
    async fn ingested_samples_raise_the_lead_score() {
        let (engine, _backend, _dir) =
            build_engine(vec![Ok("hello Ada".to_string())]).await;

        let outcome = engine
            .handle_message(None, "reach me at ada@example.com please", "Ada")
            .await
            .unwrap();
        let before = engine
            .store()
            .get_lead_for_conversation(&outcome.conversation_id)
            .await
            .unwrap()
            .unwrap();

        for _ in 0..3 {
            engine
                .ingest_sample(
                    &outcome.conversation_id,
                    EngagementReading {
                        emotion: Emotion::Joy,
                        confidence: 0.9,
                        engagement_score: 90,
                    },
                    Some(signal::SIMULATED_METADATA),
                )
                .await
                .unwrap();
        }

        let after = engine
            .store()
            .get_lead_for_conversation(&outcome.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert!(after.lead_score > before.lead_score);
        assert_ne!(after.score_category, ScoreCategory::Cold);
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let (engine, _backend, _dir) =
            build_engine(vec![Ok("sure".to_string())]).await;

        let outcome = engine
            .handle_message(None, "email me at ada@example.com about pricing", "Ada")
            .await
            .unwrap();

        let first = engine.refresh_derived(&outcome.conversation_id).await.unwrap();
        let second = engine.refresh_derived(&outcome.conversation_id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_messages_to_one_conversation_serialize() {
        // Known boundary: without the per-conversation lock a double submit
        // could interleave its visitor/assistant appends. The lock makes the
        // two requests run back to back.
        let (engine, _backend, _dir) = build_engine(vec![
            Ok("reply one".to_string()),
            Ok("reply two".to_string()),
        ])
        .await;

        let conversation = engine.store().create_conversation(Some("Ada")).await.unwrap();
        let engine_a = Arc::clone(&engine);
        let engine_b = Arc::clone(&engine);
        let id_a = conversation.id.clone();
        let id_b = conversation.id.clone();

        let (a, b) = tokio::join!(
            tokio::spawn(async move {
                engine_a.handle_message(Some(&id_a), "first double submit", "Ada").await
            }),
            tokio::spawn(async move {
                engine_b.handle_message(Some(&id_b), "second double submit", "Ada").await
            }),
        );
        a.unwrap().unwrap();
        b.unwrap().unwrap();

        let turns = engine.store().list_turns(&conversation.id).await.unwrap();
        assert_eq!(turns.len(), 4);
        // Strict visitor/assistant alternation proves the requests did not
        // interleave.
        let roles: Vec<TurnRole> = turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TurnRole::Visitor,
                TurnRole::Assistant,
                TurnRole::Visitor,
                TurnRole::Assistant
            ]
        );
    }
}
