// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD operations.

use leadflow_core::LeadflowError;
use leadflow_core::types::{Conversation, now_iso};
use rusqlite::params;

use crate::database::Database;

/// Create a new conversation, returning the stored record.
pub async fn create_conversation(
    db: &Database,
    visitor_name: Option<&str>,
) -> Result<Conversation, LeadflowError> {
    let conversation = Conversation {
        id: uuid::Uuid::new_v4().to_string(),
        visitor_name: visitor_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        created_at: now_iso(),
    };

    let stored = conversation.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, visitor_name, created_at) VALUES (?1, ?2, ?3)",
                params![stored.id, stored.visitor_name, stored.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(conversation)
}

/// Get a conversation by ID.
pub async fn get_conversation(
    db: &Database,
    id: &str,
) -> Result<Option<Conversation>, LeadflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, visitor_name, created_at FROM conversations WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(Conversation {
                    id: row.get(0)?,
                    visitor_name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            });
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
