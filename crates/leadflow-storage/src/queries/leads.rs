// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead upsert/read operations. One lead per conversation; the upsert keeps
//! the original id and creation time when rescoring updates a lead.

use leadflow_core::LeadflowError;
use leadflow_core::types::Lead;
use rusqlite::params;

use crate::database::Database;
use crate::queries::parse_text_col;

const LEAD_COLUMNS: &str =
    "id, conversation_id, name, email, phone, lead_score, score_category, interest, status, created_at";

fn lead_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lead> {
    let category: String = row.get(6)?;
    Ok(Lead {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        lead_score: row.get(5)?,
        score_category: parse_text_col(6, category)?,
        interest: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Insert a lead, or update the existing lead for the same conversation.
pub async fn upsert_lead(db: &Database, lead: &Lead) -> Result<(), LeadflowError> {
    let lead = lead.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO leads
                     (id, conversation_id, name, email, phone, lead_score, score_category,
                      interest, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(conversation_id) DO UPDATE SET
                     name = excluded.name,
                     email = excluded.email,
                     phone = excluded.phone,
                     lead_score = excluded.lead_score,
                     score_category = excluded.score_category,
                     interest = excluded.interest,
                     status = excluded.status",
                params![
                    lead.id,
                    lead.conversation_id,
                    lead.name,
                    lead.email,
                    lead.phone,
                    lead.lead_score,
                    lead.score_category.to_string(),
                    lead.interest,
                    lead.status,
                    lead.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the lead derived from a conversation, if one has materialized.
pub async fn get_lead_for_conversation(
    db: &Database,
    conversation_id: &str,
) -> Result<Option<Lead>, LeadflowError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads WHERE conversation_id = ?1"
            ))?;
            let result = stmt.query_row(params![conversation_id], lead_from_row);
            match result {
                Ok(lead) => Ok(Some(lead)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All leads, best first.
pub async fn list_leads(db: &Database) -> Result<Vec<Lead>, LeadflowError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads ORDER BY lead_score DESC, created_at ASC"
            ))?;
            let rows = stmt.query_map([], lead_from_row)?;
            let mut leads = Vec::new();
            for row in rows {
                leads.push(row?);
            }
            Ok(leads)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
