// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/chat, GET /health, GET /v1/leads,
//! GET /v1/conversations/{id}/turns, POST /v1/conversations/{id}/engagement.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use leadflow_core::LeadflowError;
use leadflow_core::types::{Emotion, EngagementReading, EngagementSample, Lead, Product, Turn};

use crate::server::GatewayState;

/// Request body for POST /v1/chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Existing conversation to continue, or null to start a new one.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// The visitor's message text.
    pub message: String,
    /// The visitor's display name.
    #[serde(default)]
    pub visitor_name: String,
}

/// Response body for POST /v1/chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub conversation_id: String,
    /// The assistant's reply text.
    pub message: String,
    pub recommended_products: Vec<Product>,
}

/// Request body for POST /v1/conversations/{id}/engagement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRequest {
    pub emotion: String,
    pub confidence: f64,
    pub engagement_score: i64,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Response body for GET /v1/leads.
#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
}

/// Response body for GET /v1/conversations/{id}/turns.
#[derive(Debug, Serialize)]
pub struct TurnListResponse {
    pub turns: Vec<Turn>,
}

/// Response body for GET /v1/conversations/{id}/engagement.
///
/// The summary fields are recomputed from the stored samples on every read,
/// so this endpoint and the lead scorer always agree.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummaryResponse {
    pub engagement_score: i64,
    pub dominant_emotion: Emotion,
    pub samples: Vec<EngagementSample>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an engine error onto its wire status and user-facing message.
///
/// Rate-limit and payment-required failures keep their distinguishing status
/// codes; everything else that is not a validation problem is a generic 500.
pub fn error_to_response(err: &LeadflowError) -> (StatusCode, ErrorResponse) {
    match err {
        LeadflowError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: message.clone(),
            },
        ),
        LeadflowError::BackendRateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse {
                error: "Rate limit exceeded. Please try again in a moment.".to_string(),
            },
        ),
        LeadflowError::BackendPaymentRequired => (
            StatusCode::PAYMENT_REQUIRED,
            ErrorResponse {
                error: "AI service requires additional credits.".to_string(),
            },
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse {
                error: other.to_string(),
            },
        ),
    }
}

/// POST /v1/chat
///
/// Runs one visitor message through the orchestration pipeline and returns
/// the reply with recommendations.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    debug!(
        conversation_id = body.conversation_id.as_deref().unwrap_or("<new>"),
        "chat request received"
    );

    match state
        .engine
        .handle_message(body.conversation_id.as_deref(), &body.message, &body.visitor_name)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ChatResponse {
                conversation_id: outcome.conversation_id,
                message: outcome.reply,
                recommended_products: outcome.recommended_products,
            }),
        )
            .into_response(),
        Err(err) => {
            let (status, body) = error_to_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// GET /v1/leads
///
/// Leads ordered best first, for the lead-list viewer.
pub async fn get_leads(State(state): State<GatewayState>) -> Response {
    match state.engine.store().list_leads().await {
        Ok(leads) => (StatusCode::OK, Json(LeadListResponse { leads })).into_response(),
        Err(err) => {
            let (status, body) = error_to_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// GET /v1/conversations/{id}/turns
///
/// Full ordered history for one conversation, for dashboard viewers.
pub async fn get_turns(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
) -> Response {
    let store = state.engine.store();
    match store.get_conversation(&conversation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("unknown conversation id: {conversation_id}"),
                }),
            )
                .into_response();
        }
        Err(err) => {
            let (status, body) = error_to_response(&err);
            return (status, Json(body)).into_response();
        }
    }

    match store.list_turns(&conversation_id).await {
        Ok(turns) => (StatusCode::OK, Json(TurnListResponse { turns })).into_response(),
        Err(err) => {
            let (status, body) = error_to_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// GET /v1/conversations/{id}/engagement
///
/// Aggregated engagement for one conversation, plus the raw samples, for
/// dashboard viewers.
pub async fn get_engagement(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
) -> Response {
    let store = state.engine.store();
    match store.get_conversation(&conversation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("unknown conversation id: {conversation_id}"),
                }),
            )
                .into_response();
        }
        Err(err) => {
            let (status, body) = error_to_response(&err);
            return (status, Json(body)).into_response();
        }
    }

    match store.list_engagement_samples(&conversation_id).await {
        Ok(samples) => {
            let summary = leadflow_scoring::summarize(&samples);
            (
                StatusCode::OK,
                Json(EngagementSummaryResponse {
                    engagement_score: summary.engagement_score,
                    dominant_emotion: summary.dominant_emotion,
                    samples,
                }),
            )
                .into_response()
        }
        Err(err) => {
            let (status, body) = error_to_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// POST /v1/conversations/{id}/engagement
///
/// External signal-producer ingestion. Accepts one sample and persists it;
/// the derived lead state refreshes as a side effect.
pub async fn post_engagement(
    State(state): State<GatewayState>,
    Path(conversation_id): Path<String>,
    Json(body): Json<EngagementRequest>,
) -> Response {
    let emotion = match Emotion::from_str(&body.emotion) {
        Ok(emotion) => emotion,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("unknown emotion label: {}", body.emotion),
                }),
            )
                .into_response();
        }
    };

    match state.engine.store().get_conversation(&conversation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("unknown conversation id: {conversation_id}"),
                }),
            )
                .into_response();
        }
        Err(err) => {
            let (status, body) = error_to_response(&err);
            return (status, Json(body)).into_response();
        }
    }

    let metadata = body.metadata.as_ref().map(|v| v.to_string());
    let reading = EngagementReading {
        emotion,
        confidence: body.confidence,
        engagement_score: body.engagement_score,
    };

    match state
        .engine
        .ingest_sample(&conversation_id, reading, metadata.as_deref())
        .await
    {
        Ok(sample) => (StatusCode::OK, Json(StoredSampleResponse { sample })).into_response(),
        Err(err) => {
            let (status, body) = error_to_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// Response body for POST /v1/conversations/{id}/engagement.
#[derive(Debug, Serialize)]
pub struct StoredSampleResponse {
    pub sample: EngagementSample,
}
