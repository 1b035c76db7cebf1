// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadflow lead-qualification engine.

use thiserror::Error;

/// The primary error type used across all Leadflow adapter traits and core operations.
#[derive(Debug, Error)]
pub enum LeadflowError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request rejected before any write (empty message, missing visitor identity,
    /// unknown conversation id).
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend errors (database connection, query failure, serialization).
    /// Fatal to the current request; chat history integrity depends on every
    /// turn being durable before the next one is computed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The generative backend signalled over-quota (HTTP 429).
    #[error("generative backend rate limited")]
    BackendRateLimited,

    /// The generative backend signalled exhausted credits (HTTP 402).
    #[error("generative backend requires payment")]
    BackendPaymentRequired,

    /// Any other generative backend failure: transport errors, non-2xx statuses,
    /// timeouts, or a malformed/empty completion.
    #[error("generative backend unavailable: {message}")]
    BackendUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP surface errors (bind failure, serve failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
