// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engagement aggregation: reduces a conversation's sample stream to one
//! score and a dominant emotion.
//!
//! This is a pure recomputation over the full stored history -- no running
//! state -- so the dashboard and the lead scorer always agree, including
//! across restarts.

use leadflow_core::types::{Emotion, EngagementSample};

/// Aggregated engagement signal for one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementSummary {
    /// Arithmetic mean of sample scores, rounded to nearest integer.
    /// 0 when no samples exist.
    pub engagement_score: i64,
    /// Most frequent emotion label; ties break toward the label that first
    /// appeared earliest in the stream. Neutral when no samples exist.
    pub dominant_emotion: Emotion,
}

/// Reduce an ordered sample sequence to its summary.
pub fn summarize(samples: &[EngagementSample]) -> EngagementSummary {
    if samples.is_empty() {
        return EngagementSummary {
            engagement_score: 0,
            dominant_emotion: Emotion::Neutral,
        };
    }

    let sum: i64 = samples.iter().map(|s| s.engagement_score).sum();
    let engagement_score = (sum as f64 / samples.len() as f64).round() as i64;

    // Count occurrences, remembering first-appearance order for tie-breaks.
    let mut seen: Vec<(Emotion, usize)> = Vec::new();
    for sample in samples {
        match seen.iter_mut().find(|(e, _)| *e == sample.emotion) {
            Some((_, count)) => *count += 1,
            None => seen.push((sample.emotion, 1)),
        }
    }
    // `seen` is in first-appearance order, so the first entry hitting the top
    // count wins ties. (max_by_key would return the last max instead.)
    let top_count = seen.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let dominant_emotion = seen
        .iter()
        .find(|(_, count)| *count == top_count)
        .map(|(emotion, _)| *emotion)
        .unwrap_or(Emotion::Neutral);

    EngagementSummary {
        engagement_score,
        dominant_emotion,
    }
}
