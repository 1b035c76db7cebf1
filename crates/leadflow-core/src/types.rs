// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Leadflow workspace.
//!
//! Timestamps are ISO-8601 UTC strings with millisecond precision; their
//! lexicographic order equals their chronological order, which the storage
//! layer relies on for turn ordering.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Returns the current UTC time as an ISO-8601 string with millisecond precision.
pub fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Identifies the kind of adapter behind the base [`crate::Adapter`] trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterKind {
    Store,
    Backend,
    SignalProducer,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A single visitor chat session holding an ordered sequence of turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Display name of the visitor; may be filled mid-session.
    pub visitor_name: Option<String>,
    pub created_at: String,
}

/// Who authored a turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Visitor,
    Assistant,
}

/// One message exchange unit. Append-only: never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub conversation_id: String,
    pub role: TurnRole,
    pub content: String,
    pub created_at: String,
}

/// The closed set of emotion labels a signal producer may report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Neutral,
}

/// One periodic emotion/engagement measurement tied to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSample {
    pub id: String,
    pub conversation_id: String,
    pub emotion: Emotion,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    /// Engagement level in [0, 100].
    pub engagement_score: i64,
    /// Opaque provenance metadata (JSON), e.g. the analysis method.
    pub metadata: Option<String>,
    pub created_at: String,
}

/// One reading from a signal producer, before it is persisted as a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementReading {
    pub emotion: Emotion,
    pub confidence: f64,
    pub engagement_score: i64,
}

/// A catalog entry. Read-only from the engine's perspective; the catalog is
/// managed by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Lead quality bucket, a deterministic function of the lead score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Hot,
    Warm,
    Cold,
}

/// A qualified contact derived from a conversation. Outlives the chat session
/// once materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub conversation_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lead_score: i64,
    pub score_category: ScoreCategory,
    pub interest: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Which record type a store mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ChangeKind {
    ConversationCreated,
    TurnAppended,
    SampleAppended,
    LeadUpserted,
}

/// Notification fanned out to subscribed viewers after a durable write.
/// Delivery is best-effort and eventually consistent with the store.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub conversation_id: String,
}

/// One message in a completion request, in the role/content shape the
/// generative backend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendMessage {
    pub role: String,
    pub content: String,
}

/// A request to the generative backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    /// Instruction preamble sent ahead of the conversation history.
    pub system: Option<String>,
    pub messages: Vec<BackendMessage>,
    pub max_tokens: u32,
}

/// A completed reply from the generative backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReply {
    pub content: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn emotion_round_trips_through_strings() {
        for emotion in [
            Emotion::Joy,
            Emotion::Sadness,
            Emotion::Anger,
            Emotion::Fear,
            Emotion::Surprise,
            Emotion::Neutral,
        ] {
            let s = emotion.to_string();
            assert_eq!(Emotion::from_str(&s).unwrap(), emotion);
        }
        assert_eq!(Emotion::Joy.to_string(), "joy");
    }

    #[test]
    fn turn_role_serializes_lowercase() {
        assert_eq!(TurnRole::Visitor.to_string(), "visitor");
        assert_eq!(TurnRole::Assistant.to_string(), "assistant");
        let json = serde_json::to_string(&TurnRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn score_category_parses_from_stored_text() {
        assert_eq!(ScoreCategory::from_str("hot").unwrap(), ScoreCategory::Hot);
        assert_eq!(
            ScoreCategory::from_str("cold").unwrap(),
            ScoreCategory::Cold
        );
        assert!(ScoreCategory::from_str("lukewarm").is_err());
    }

    #[test]
    fn now_iso_is_lexicographically_ordered() {
        let a = now_iso();
        let b = now_iso();
        assert!(a <= b);
        assert!(a.ends_with('Z'));
    }

    #[test]
    fn product_features_default_to_empty() {
        let json = r#"{"id":"p1","name":"Widget","description":"A widget","price":9.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.features.is_empty());
        assert!(product.category.is_none());
    }
}
