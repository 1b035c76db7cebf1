// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal Store trait: durable append-only records for conversations, turns,
//! engagement samples, plus the derived lead and read-only catalog surfaces.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::LeadflowError;
use crate::traits::adapter::Adapter;
use crate::types::{
    ChangeEvent, Conversation, Emotion, EngagementSample, Lead, Product, Turn, TurnRole,
};

/// Durable source of truth for everything the engine persists.
///
/// All writes are durable before the call returns. Concurrent appends to the
/// same conversation preserve per-conversation creation-time order. Each
/// successful write publishes a [`ChangeEvent`] to subscribers; delivery is
/// best-effort and never gates the write itself.
#[async_trait]
pub trait SignalStore: Adapter {
    /// Opens the durable backend and runs pending migrations.
    async fn initialize(&self) -> Result<(), LeadflowError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), LeadflowError>;

    // --- Conversations ---

    async fn create_conversation(
        &self,
        visitor_name: Option<&str>,
    ) -> Result<Conversation, LeadflowError>;

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, LeadflowError>;

    // --- Turns (append-only) ---

    /// Appends a turn. Fails if the conversation does not exist.
    async fn append_turn(
        &self,
        conversation_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn, LeadflowError>;

    /// Full turn history, ascending by creation time.
    async fn list_turns(&self, conversation_id: &str) -> Result<Vec<Turn>, LeadflowError>;

    // --- Engagement samples (append-only) ---

    async fn append_engagement_sample(
        &self,
        conversation_id: &str,
        emotion: Emotion,
        confidence: f64,
        engagement_score: i64,
        metadata: Option<&str>,
    ) -> Result<EngagementSample, LeadflowError>;

    /// Full sample history, ascending by capture time.
    async fn list_engagement_samples(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<EngagementSample>, LeadflowError>;

    // --- Catalog (read-only input; upsert exists for the external catalog
    //     collaborator and demo seeding) ---

    async fn list_products(&self) -> Result<Vec<Product>, LeadflowError>;

    async fn upsert_product(&self, product: &Product) -> Result<(), LeadflowError>;

    // --- Leads (derived; one per conversation) ---

    async fn upsert_lead(&self, lead: &Lead) -> Result<(), LeadflowError>;

    async fn get_lead_for_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Lead>, LeadflowError>;

    /// All leads, descending by lead score.
    async fn list_leads(&self) -> Result<Vec<Lead>, LeadflowError>;

    // --- Change notifications ---

    /// Registers a viewer for change notifications. Slow consumers may miss
    /// events (lagged receiver); they must re-read the store to catch up.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
