// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generative backend trait for reply generation.

use async_trait::async_trait;

use crate::error::LeadflowError;
use crate::traits::adapter::Adapter;
use crate::types::{CompletionReply, CompletionRequest};

/// The external service that produces assistant reply text given grounding
/// context (catalog + history).
///
/// Implementations must map over-quota to [`LeadflowError::BackendRateLimited`],
/// exhausted credits to [`LeadflowError::BackendPaymentRequired`], and every
/// other failure (including a missing or empty completion) to
/// [`LeadflowError::BackendUnavailable`].
///
/// [`LeadflowError::BackendRateLimited`]: crate::error::LeadflowError::BackendRateLimited
/// [`LeadflowError::BackendPaymentRequired`]: crate::error::LeadflowError::BackendPaymentRequired
/// [`LeadflowError::BackendUnavailable`]: crate::error::LeadflowError::BackendUnavailable
#[async_trait]
pub trait GenerativeBackend: Adapter {
    /// Sends a completion request and returns the full reply.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionReply, LeadflowError>;
}
