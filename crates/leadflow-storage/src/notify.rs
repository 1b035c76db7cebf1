// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-notification fan-out for downstream viewers.
//!
//! Viewers (dashboards, lead lists) register via `subscribe` and refresh on
//! events instead of polling. Delivery is best-effort: a lagged receiver
//! misses events and must re-read the store; publishing never blocks or
//! fails a write.

use leadflow_core::types::{ChangeEvent, ChangeKind};
use tokio::sync::broadcast;

/// Buffered events per subscriber before lag kicks in.
const HUB_CAPACITY: usize = 256;

/// Broadcast hub for store mutation events.
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    /// Register a new viewer.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. A send error only means no viewer is currently
    /// subscribed, which is fine.
    pub fn publish(&self, kind: ChangeKind, conversation_id: &str) {
        let _ = self.tx.send(ChangeEvent {
            kind,
            conversation_id: conversation_id.to_string(),
        });
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}
