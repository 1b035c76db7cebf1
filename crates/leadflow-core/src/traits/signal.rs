// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal producer trait for engagement telemetry sources.

use async_trait::async_trait;

use crate::error::LeadflowError;
use crate::types::EngagementReading;

/// A bounded-rate source of (emotion, confidence, engagement) readings for
/// one conversation.
///
/// The shipped implementation simulates readings; a vision-based producer can
/// be substituted without changing the aggregator or scorer contracts.
#[async_trait]
pub trait SignalProducer: Send + 'static {
    /// Produces the next reading. Called once per sampling interval.
    async fn next_reading(&mut self) -> Result<EngagementReading, LeadflowError>;
}
