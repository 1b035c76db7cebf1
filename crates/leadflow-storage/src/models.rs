// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `leadflow-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use leadflow_core::types::{
    Conversation, Emotion, EngagementSample, Lead, Product, ScoreCategory, Turn, TurnRole,
};
