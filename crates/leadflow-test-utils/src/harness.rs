// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end test harness: a real SQLite store on a temp directory wired to
//! a mock generative backend and a chat engine.

use std::sync::Arc;

use leadflow_agent::ChatEngine;
use leadflow_config::model::LeadflowConfig;
use leadflow_core::types::Product;
use leadflow_core::{GenerativeBackend, SignalStore};
use leadflow_storage::SqliteSignalStore;

use crate::mock_backend::MockBackend;

/// A fully wired engine over temp storage.
///
/// Holds the TempDir so the database lives as long as the harness.
pub struct TestHarness {
    pub engine: Arc<ChatEngine>,
    pub store: Arc<SqliteSignalStore>,
    pub backend: Arc<MockBackend>,
    pub config: LeadflowConfig,
    _dir: tempfile::TempDir,
}

impl TestHarness {
    /// Build a harness with default configuration and an empty backend queue.
    pub async fn new() -> Self {
        Self::with_config(LeadflowConfig::default()).await
    }

    /// Build a harness with custom configuration (storage path is always
    /// overridden to the temp directory).
    pub async fn with_config(mut config: LeadflowConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        config.storage.database_path = dir
            .path()
            .join("harness.db")
            .to_string_lossy()
            .into_owned();

        let store = Arc::new(SqliteSignalStore::new(config.storage.clone()));
        store.initialize().await.expect("initialize store");

        let backend = Arc::new(MockBackend::new());
        let engine = Arc::new(ChatEngine::new(
            Arc::clone(&store) as Arc<dyn SignalStore>,
            Arc::clone(&backend) as Arc<dyn GenerativeBackend>,
            &config,
        ));

        Self {
            engine,
            store,
            backend,
            config,
            _dir: dir,
        }
    }

    /// Seed a small demo catalog and return it in catalog order.
    pub async fn seed_catalog(&self) -> Vec<Product> {
        let products = vec![
            Product {
                id: "starter".to_string(),
                name: "Starter".to_string(),
                description: "Entry analytics for small teams".to_string(),
                price: 49.0,
                features: vec!["Dashboards".to_string(), "Email reports".to_string()],
                category: Some("analytics".to_string()),
            },
            Product {
                id: "growth".to_string(),
                name: "Growth".to_string(),
                description: "Full analytics suite with forecasting".to_string(),
                price: 199.0,
                features: vec!["Forecasting".to_string(), "API access".to_string()],
                category: Some("analytics".to_string()),
            },
            Product {
                id: "scale".to_string(),
                name: "Scale".to_string(),
                description: "Multi-region deployment with SLAs".to_string(),
                price: 499.0,
                features: vec!["SLA".to_string(), "Dedicated support".to_string()],
                category: Some("platform".to_string()),
            },
            Product {
                id: "addon-alerts".to_string(),
                name: "Alerting Add-on".to_string(),
                description: "Realtime alerting channels".to_string(),
                price: 29.0,
                features: vec![],
                category: Some("addon".to_string()),
            },
        ];
        for product in &products {
            self.store.upsert_product(product).await.expect("seed product");
        }
        products
    }
}
