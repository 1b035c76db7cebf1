// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engagement aggregation and lead scoring for the Leadflow engine.
//!
//! Everything in this crate is a pure function over stored records, so
//! scores are reproducible across callers and restarts.

pub mod engagement;
pub mod lead;

pub use engagement::{EngagementSummary, summarize};
pub use lead::{ContactFields, categorize, extract_contact, extract_interest, score_lead};
