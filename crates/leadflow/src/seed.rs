// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `seed-demo` subcommand: loads a small demo catalog into the
//! configured store so the assistant has something to recommend.

use leadflow_config::model::LeadflowConfig;
use leadflow_core::types::Product;
use leadflow_core::{LeadflowError, SignalStore};
use leadflow_storage::SqliteSignalStore;
use tracing::info;

fn demo_catalog() -> Vec<Product> {
    vec![
        Product {
            id: "starter".to_string(),
            name: "Starter".to_string(),
            description: "Entry analytics for small teams".to_string(),
            price: 49.0,
            features: vec![
                "Realtime dashboards".to_string(),
                "Weekly email reports".to_string(),
            ],
            category: Some("analytics".to_string()),
        },
        Product {
            id: "growth".to_string(),
            name: "Growth".to_string(),
            description: "Full analytics suite with forecasting".to_string(),
            price: 199.0,
            features: vec![
                "Everything in Starter".to_string(),
                "Forecasting".to_string(),
                "API access".to_string(),
            ],
            category: Some("analytics".to_string()),
        },
        Product {
            id: "scale".to_string(),
            name: "Scale".to_string(),
            description: "Multi-region deployment with SLAs and dedicated support".to_string(),
            price: 499.0,
            features: vec![
                "99.9% SLA".to_string(),
                "Dedicated support engineer".to_string(),
                "SSO".to_string(),
            ],
            category: Some("platform".to_string()),
        },
        Product {
            id: "alerting".to_string(),
            name: "Alerting Add-on".to_string(),
            description: "Realtime alerting to chat and pager channels".to_string(),
            price: 29.0,
            features: vec!["Slack and pager integrations".to_string()],
            category: Some("addon".to_string()),
        },
    ]
}

pub async fn run(config: LeadflowConfig) -> Result<(), LeadflowError> {
    let store = SqliteSignalStore::new(config.storage.clone());
    store.initialize().await?;

    let catalog = demo_catalog();
    for product in &catalog {
        store.upsert_product(product).await?;
    }
    info!(products = catalog.len(), "demo catalog seeded");
    println!("Seeded {} demo products.", catalog.len());

    store.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_is_well_formed() {
        let catalog = demo_catalog();
        assert!(catalog.len() >= 3, "enough products for a recommendation set");
        for product in &catalog {
            assert!(!product.name.is_empty());
            assert!(product.price >= 0.0);
        }
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LeadflowConfig::default();
        config.storage.database_path = dir
            .path()
            .join("seed.db")
            .to_string_lossy()
            .into_owned();

        run(config.clone()).await.unwrap();
        run(config.clone()).await.unwrap();

        let store = SqliteSignalStore::new(config.storage.clone());
        store.initialize().await.unwrap();
        let products = store.list_products().await.unwrap();
        assert_eq!(products.len(), demo_catalog().len());
    }
}
