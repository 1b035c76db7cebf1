// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn append/list operations. Turns are append-only: no update or delete
//! exists at this layer by design.

use leadflow_core::LeadflowError;
use leadflow_core::types::{Turn, TurnRole, now_iso};
use rusqlite::params;

use crate::database::Database;
use crate::queries::parse_text_col;

/// Append a turn to a conversation, returning the stored record.
///
/// Fails (foreign key) if the conversation does not exist.
pub async fn append_turn(
    db: &Database,
    conversation_id: &str,
    role: TurnRole,
    content: &str,
) -> Result<Turn, LeadflowError> {
    let turn = Turn {
        id: uuid::Uuid::new_v4().to_string(),
        conversation_id: conversation_id.to_string(),
        role,
        content: content.to_string(),
        created_at: now_iso(),
    };

    let stored = turn.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO turns (id, conversation_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    stored.id,
                    stored.conversation_id,
                    stored.role.to_string(),
                    stored.content,
                    stored.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(turn)
}

/// Full turn history for a conversation, ascending by creation time.
///
/// rowid is the tie-break for same-millisecond appends; it follows insert
/// order because all writes go through the single background connection.
pub async fn list_turns(
    db: &Database,
    conversation_id: &str,
) -> Result<Vec<Turn>, LeadflowError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, role, content, created_at
                 FROM turns WHERE conversation_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], |row| {
                let role: String = row.get(2)?;
                Ok(Turn {
                    id: row.get(0)?,
                    conversation_id: row.get(1)?,
                    role: parse_text_col(2, role)?,
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut turns = Vec::new();
            for row in rows {
                turns.push(row?);
            }
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
