// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product catalog operations.
//!
//! The catalog is managed by an external collaborator; the engine reads it
//! as recommendation and prompt input. Catalog order is insertion order
//! (rowid), which the upsert preserves across updates.

use leadflow_core::LeadflowError;
use leadflow_core::types::Product;
use rusqlite::params;

use crate::database::Database;

/// Insert or update a catalog entry, keeping its original catalog position.
pub async fn upsert_product(db: &Database, product: &Product) -> Result<(), LeadflowError> {
    let product = product.clone();
    let features = serde_json::to_string(&product.features).map_err(|e| {
        LeadflowError::Storage {
            source: Box::new(e),
        }
    })?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products (id, name, description, price, features, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     description = excluded.description,
                     price = excluded.price,
                     features = excluded.features,
                     category = excluded.category",
                params![
                    product.id,
                    product.name,
                    product.description,
                    product.price,
                    features,
                    product.category,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Full catalog in catalog order.
pub async fn list_products(db: &Database) -> Result<Vec<Product>, LeadflowError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, price, features, category
                 FROM products ORDER BY rowid ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let features: String = row.get(4)?;
                let features: Vec<String> =
                    serde_json::from_str(&features).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(Product {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    price: row.get(3)?,
                    features,
                    category: row.get(5)?,
                })
            })?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
