// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SignalStore trait.

use async_trait::async_trait;
use tokio::sync::{OnceCell, broadcast};
use tracing::debug;

use leadflow_config::model::StorageConfig;
use leadflow_core::types::{
    AdapterKind, ChangeEvent, ChangeKind, Conversation, Emotion, EngagementSample, HealthStatus,
    Lead, Product, Turn, TurnRole,
};
use leadflow_core::{Adapter, LeadflowError, SignalStore};

use crate::database::Database;
use crate::notify::ChangeHub;
use crate::queries;

/// SQLite-backed Signal Store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first call
/// to [`SignalStore::initialize`]. Every durable write publishes a
/// [`ChangeEvent`] to subscribed viewers after it returns from the database.
pub struct SqliteSignalStore {
    config: StorageConfig,
    db: OnceCell<Database>,
    hub: ChangeHub,
}

impl SqliteSignalStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
            hub: ChangeHub::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not
    /// initialized.
    fn db(&self) -> Result<&Database, LeadflowError> {
        self.db.get().ok_or_else(|| LeadflowError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Adapter for SqliteSignalStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadflowError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadflowError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SignalStore for SqliteSignalStore {
    async fn initialize(&self) -> Result<(), LeadflowError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| LeadflowError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite signal store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), LeadflowError> {
        self.db()?.close().await
    }

    async fn create_conversation(
        &self,
        visitor_name: Option<&str>,
    ) -> Result<Conversation, LeadflowError> {
        let conversation = queries::conversations::create_conversation(self.db()?, visitor_name)
            .await?;
        self.hub
            .publish(ChangeKind::ConversationCreated, &conversation.id);
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, LeadflowError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    async fn append_turn(
        &self,
        conversation_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn, LeadflowError> {
        let turn = queries::turns::append_turn(self.db()?, conversation_id, role, content).await?;
        self.hub.publish(ChangeKind::TurnAppended, conversation_id);
        Ok(turn)
    }

    async fn list_turns(&self, conversation_id: &str) -> Result<Vec<Turn>, LeadflowError> {
        queries::turns::list_turns(self.db()?, conversation_id).await
    }

    async fn append_engagement_sample(
        &self,
        conversation_id: &str,
        emotion: Emotion,
        confidence: f64,
        engagement_score: i64,
        metadata: Option<&str>,
    ) -> Result<EngagementSample, LeadflowError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(LeadflowError::Validation(format!(
                "confidence must be within [0, 1], got {confidence}"
            )));
        }
        if !(0..=100).contains(&engagement_score) {
            return Err(LeadflowError::Validation(format!(
                "engagement_score must be within [0, 100], got {engagement_score}"
            )));
        }

        let sample = queries::engagement::append_sample(
            self.db()?,
            conversation_id,
            emotion,
            confidence,
            engagement_score,
            metadata,
        )
        .await?;
        self.hub.publish(ChangeKind::SampleAppended, conversation_id);
        Ok(sample)
    }

    async fn list_engagement_samples(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<EngagementSample>, LeadflowError> {
        queries::engagement::list_samples(self.db()?, conversation_id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, LeadflowError> {
        queries::products::list_products(self.db()?).await
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), LeadflowError> {
        queries::products::upsert_product(self.db()?, product).await
    }

    async fn upsert_lead(&self, lead: &Lead) -> Result<(), LeadflowError> {
        queries::leads::upsert_lead(self.db()?, lead).await?;
        self.hub
            .publish(ChangeKind::LeadUpserted, &lead.conversation_id);
        Ok(())
    }

    async fn get_lead_for_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Lead>, LeadflowError> {
        queries::leads::get_lead_for_conversation(self.db()?, conversation_id).await
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, LeadflowError> {
        queries::leads::list_leads(self.db()?).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.hub.subscribe()
    }
}
