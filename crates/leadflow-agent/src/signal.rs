// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated engagement signal production.
//!
//! The simulator stands in for a vision pipeline: it emits a random emotion
//! with a confidence in [0.7, 1.0) once per interval and walks a running
//! engagement counter (+5 for joy/surprise, -3 for sadness/anger, clamped to
//! [0, 100]). Only the producer is stateful; all downstream scoring
//! recomputes from the stored sample history.
//!
//! Sample ingestion is best-effort telemetry: failures are logged and never
//! abort an in-flight chat request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use leadflow_core::types::{ChangeKind, Emotion, EngagementReading};
use leadflow_core::{LeadflowError, SignalProducer, SignalStore};

use crate::ChatEngine;

/// Engagement counter starting point for a fresh conversation.
const INITIAL_ENGAGEMENT: i64 = 50;
/// Counter delta for positive emotions (joy, surprise).
const POSITIVE_DELTA: i64 = 5;
/// Counter delta for negative emotions (sadness, anger).
const NEGATIVE_DELTA: i64 = -3;

const EMOTIONS: [Emotion; 6] = [
    Emotion::Joy,
    Emotion::Sadness,
    Emotion::Anger,
    Emotion::Fear,
    Emotion::Surprise,
    Emotion::Neutral,
];

/// Provenance metadata attached to every simulated sample.
pub const SIMULATED_METADATA: &str = r#"{"analysis_method":"simulated"}"#;

/// Random-walk emotion simulator implementing [`SignalProducer`].
pub struct EmotionSimulator {
    rng: StdRng,
    engagement: i64,
}

impl EmotionSimulator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            engagement: INITIAL_ENGAGEMENT,
        }
    }

    /// Deterministic simulator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            engagement: INITIAL_ENGAGEMENT,
        }
    }
}

impl Default for EmotionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalProducer for EmotionSimulator {
    async fn next_reading(&mut self) -> Result<EngagementReading, LeadflowError> {
        let emotion = EMOTIONS[self.rng.gen_range(0..EMOTIONS.len())];
        let confidence = 0.7 + self.rng.r#gen::<f64>() * 0.3;

        let delta = match emotion {
            Emotion::Joy | Emotion::Surprise => POSITIVE_DELTA,
            Emotion::Sadness | Emotion::Anger => NEGATIVE_DELTA,
            Emotion::Fear | Emotion::Neutral => 0,
        };
        self.engagement = (self.engagement + delta).clamp(0, 100);

        Ok(EngagementReading {
            emotion,
            confidence,
            engagement_score: self.engagement,
        })
    }
}

/// Drives one producer against one conversation until cancelled.
pub fn spawn_sampler(
    engine: Arc<ChatEngine>,
    mut producer: Box<dyn SignalProducer>,
    conversation_id: String,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so sampling starts one
        // interval after the conversation opens.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(conversation_id, "sampler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let reading = match producer.next_reading().await {
                        Ok(reading) => reading,
                        Err(e) => {
                            warn!(conversation_id, error = %e, "signal producer failed");
                            continue;
                        }
                    };
                    if let Err(e) = engine
                        .ingest_sample(&conversation_id, reading, Some(SIMULATED_METADATA))
                        .await
                    {
                        warn!(conversation_id, error = %e, "engagement sample dropped");
                    }
                }
            }
        }
    })
}

/// Watches the store for new conversations and attaches a simulated producer
/// to each until cancelled.
pub fn spawn_simulated_producers(
    engine: Arc<ChatEngine>,
    store: Arc<dyn SignalStore>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = store.subscribe();
        info!(interval_secs = interval.as_secs(), "simulated signal producers active");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => {
                    match event {
                        Ok(event) if event.kind == ChangeKind::ConversationCreated => {
                            debug!(conversation_id = %event.conversation_id, "attaching simulated producer");
                            spawn_sampler(
                                Arc::clone(&engine),
                                Box::new(EmotionSimulator::new()),
                                event.conversation_id,
                                interval,
                                cancel.child_token(),
                            );
                        }
                        Ok(_) => {}
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "change events lagged; some conversations may go unsampled");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    })
}
