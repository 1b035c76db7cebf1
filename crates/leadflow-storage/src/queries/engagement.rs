// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engagement sample append/list operations. Samples are append-only
//! telemetry produced at a bounded rate per conversation.

use leadflow_core::LeadflowError;
use leadflow_core::types::{Emotion, EngagementSample, now_iso};
use rusqlite::params;

use crate::database::Database;
use crate::queries::parse_text_col;

/// Append an engagement sample, returning the stored record.
pub async fn append_sample(
    db: &Database,
    conversation_id: &str,
    emotion: Emotion,
    confidence: f64,
    engagement_score: i64,
    metadata: Option<&str>,
) -> Result<EngagementSample, LeadflowError> {
    let sample = EngagementSample {
        id: uuid::Uuid::new_v4().to_string(),
        conversation_id: conversation_id.to_string(),
        emotion,
        confidence,
        engagement_score,
        metadata: metadata.map(String::from),
        created_at: now_iso(),
    };

    let stored = sample.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO engagement_samples
                     (id, conversation_id, emotion, confidence, engagement_score, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    stored.id,
                    stored.conversation_id,
                    stored.emotion.to_string(),
                    stored.confidence,
                    stored.engagement_score,
                    stored.metadata,
                    stored.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(sample)
}

/// Full sample history for a conversation, ascending by capture time.
pub async fn list_samples(
    db: &Database,
    conversation_id: &str,
) -> Result<Vec<EngagementSample>, LeadflowError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, emotion, confidence, engagement_score, metadata, created_at
                 FROM engagement_samples WHERE conversation_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id], |row| {
                let emotion: String = row.get(2)?;
                Ok(EngagementSample {
                    id: row.get(0)?,
                    conversation_id: row.get(1)?,
                    emotion: parse_text_col(2, emotion)?,
                    confidence: row.get(3)?,
                    engagement_score: row.get(4)?,
                    metadata: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?;
            let mut samples = Vec::new();
            for row in rows {
                samples.push(row?);
            }
            Ok(samples)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations::create_conversation;
    use tempfile::tempdir;

    async fn setup_db_with_conversation() -> (Database, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        let conversation = create_conversation(&db, None).await.unwrap();
        (db, conversation.id, dir)
    }

    #[tokio::test]
    async fn append_and_list_samples_in_order() {
        let (db, conv_id, _dir) = setup_db_with_conversation().await;

        append_sample(&db, &conv_id, Emotion::Joy, 0.91, 55, None)
            .await
            .unwrap();
        append_sample(&db, &conv_id, Emotion::Neutral, 0.72, 52, None)
            .await
            .unwrap();

        let samples = list_samples(&db, &conv_id).await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].emotion, Emotion::Joy);
        assert_eq!(samples[0].engagement_score, 55);
        assert_eq!(samples[1].emotion, Emotion::Neutral);
        assert!(samples[0].created_at <= samples[1].created_at);
    }

    #[tokio::test]
    async fn metadata_is_stored_verbatim() {
        let (db, conv_id, _dir) = setup_db_with_conversation().await;

        let meta = r#"{"analysis_method":"simulated"}"#;
        let stored = append_sample(&db, &conv_id, Emotion::Surprise, 0.8, 60, Some(meta))
            .await
            .unwrap();
        assert_eq!(stored.metadata.as_deref(), Some(meta));

        let samples = list_samples(&db, &conv_id).await.unwrap();
        assert_eq!(samples[0].metadata.as_deref(), Some(meta));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected_by_schema() {
        let (db, conv_id, _dir) = setup_db_with_conversation().await;
        let result = append_sample(&db, &conv_id, Emotion::Joy, 0.9, 250, None).await;
        assert!(matches!(result, Err(LeadflowError::Storage { .. })));
    }

    #[tokio::test]
    async fn empty_conversation_has_no_samples() {
        let (db, conv_id, _dir) = setup_db_with_conversation().await;
        let samples = list_samples(&db, &conv_id).await.unwrap();
        assert!(samples.is_empty());
    }
}
