// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead scoring: turns a conversation's history, captured contact fields,
//! and engagement signal into a score and a hot/warm/cold category.
//!
//! The formula is additive and clamped, so the score is deterministic,
//! idempotent under recomputation, and monotonically non-decreasing in each
//! input. Nothing here accumulates across invocations.

use std::sync::LazyLock;

use leadflow_core::types::{ScoreCategory, Turn, TurnRole};
use regex::Regex;

/// Points for a captured visitor display name.
pub const NAME_POINTS: i64 = 10;
/// Points for a captured email address.
pub const EMAIL_POINTS: i64 = 20;
/// Points for a captured phone number.
pub const PHONE_POINTS: i64 = 15;
/// Points per substantive visitor turn.
pub const SUBSTANTIVE_TURN_POINTS: i64 = 5;
/// Cap on the substantive-turn contribution.
pub const SUBSTANTIVE_TURN_CAP: i64 = 30;
/// Share of the engagement score (0-100) that flows into the lead score.
pub const ENGAGEMENT_WEIGHT_PCT: i64 = 30;
/// Scores clamp here; the category cut points live below it.
pub const MAX_SCORE: i64 = 100;

/// Scores at or above this are warm (inclusive lower bound).
pub const WARM_THRESHOLD: i64 = 40;
/// Scores at or above this are hot (inclusive lower bound).
pub const HOT_THRESHOLD: i64 = 70;

/// A visitor turn needs at least this many words to count as substantive.
const SUBSTANTIVE_MIN_WORDS: usize = 3;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

// At least 7 digits overall keeps short quantities ("we have 40 stores")
// from being read as phone numbers.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d[\d\s().-]{5,}\d").unwrap()
});

/// Contact fields captured so far for a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactFields {
    /// True once the visitor has shared a way to reach them. A display name
    /// alone is not contact info.
    pub fn has_reachable_contact(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }
}

/// Extract contact fields from the visitor's side of the conversation.
///
/// The earliest match wins for each field; later mentions never overwrite an
/// already-captured value, keeping extraction stable as history grows.
pub fn extract_contact(turns: &[Turn], visitor_name: Option<&str>) -> ContactFields {
    let mut contact = ContactFields {
        name: visitor_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        ..Default::default()
    };

    for turn in turns.iter().filter(|t| t.role == TurnRole::Visitor) {
        if contact.email.is_none()
            && let Some(m) = EMAIL_RE.find(&turn.content)
        {
            contact.email = Some(m.as_str().to_string());
        }
        if contact.phone.is_none()
            && let Some(m) = PHONE_RE.find(&turn.content)
        {
            let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
            if digits >= 7 {
                contact.phone = Some(m.as_str().trim().to_string());
            }
        }
        if contact.email.is_some() && contact.phone.is_some() {
            break;
        }
    }

    contact
}

/// The visitor's stated interest: the first substantive thing they said.
pub fn extract_interest(turns: &[Turn]) -> Option<String> {
    turns
        .iter()
        .find(|t| t.role == TurnRole::Visitor && is_substantive(&t.content))
        .map(|t| {
            let content = t.content.trim();
            if content.len() > 120 {
                let mut cut = 120;
                while !content.is_char_boundary(cut) {
                    cut -= 1;
                }
                format!("{}...", &content[..cut])
            } else {
                content.to_string()
            }
        })
}

/// Compute the lead score and its category.
///
/// Identical inputs always produce identical output; the contributions are
/// all non-negative and independently capped, so adding a contact field, a
/// substantive turn, or engagement can only raise the score.
pub fn score_lead(
    turns: &[Turn],
    engagement_score: i64,
    contact: &ContactFields,
) -> (i64, ScoreCategory) {
    let mut score = 0i64;

    if contact.name.is_some() {
        score += NAME_POINTS;
    }
    if contact.email.is_some() {
        score += EMAIL_POINTS;
    }
    if contact.phone.is_some() {
        score += PHONE_POINTS;
    }

    let substantive = turns
        .iter()
        .filter(|t| t.role == TurnRole::Visitor && is_substantive(&t.content))
        .count() as i64;
    score += (substantive * SUBSTANTIVE_TURN_POINTS).min(SUBSTANTIVE_TURN_CAP);

    score += engagement_score.clamp(0, 100) * ENGAGEMENT_WEIGHT_PCT / 100;

    let score = score.min(MAX_SCORE);
    (score, categorize(score))
}

/// Map a score onto its category. Cut points are inclusive lower bounds.
pub fn categorize(score: i64) -> ScoreCategory {
    if score >= HOT_THRESHOLD {
        ScoreCategory::Hot
    } else if score >= WARM_THRESHOLD {
        ScoreCategory::Warm
    } else {
        ScoreCategory::Cold
    }
}

fn is_substantive(content: &str) -> bool {
    content.split_whitespace().count() >= SUBSTANTIVE_MIN_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::types::now_iso;
    use proptest::prelude::*;

    fn visitor_turn(content: &str) -> Turn {
        Turn {
            id: uuid_like(content),
            conversation_id: "conv-1".to_string(),
            role: TurnRole::Visitor,
            content: content.to_string(),
            created_at: now_iso(),
        }
    }

    fn assistant_turn(content: &str) -> Turn {
        Turn {
            id: uuid_like(content),
            conversation_id: "conv-1".to_string(),
            role: TurnRole::Assistant,
            content: content.to_string(),
            created_at: now_iso(),
        }
    }

    fn uuid_like(seed: &str) -> String {
        format!("t-{}", seed.len())
    }

    #[test]
    fn category_boundaries_match_named_constants() {
        assert_eq!(categorize(WARM_THRESHOLD - 1), ScoreCategory::Cold);
        assert_eq!(categorize(WARM_THRESHOLD), ScoreCategory::Warm);
        assert_eq!(categorize(HOT_THRESHOLD - 1), ScoreCategory::Warm);
        assert_eq!(categorize(HOT_THRESHOLD), ScoreCategory::Hot);
        assert_eq!(categorize(0), ScoreCategory::Cold);
        assert_eq!(categorize(MAX_SCORE), ScoreCategory::Hot);
    }

    #[test]
    fn scoring_is_idempotent() {
        let turns = vec![
            visitor_turn("I need help with scaling our analytics"),
            assistant_turn("Sure, tell me more"),
            visitor_turn("Reach me at ada@example.com please"),
        ];
        let contact = extract_contact(&turns, Some("Ada"));
        let first = score_lead(&turns, 57, &contact);
        let second = score_lead(&turns, 57, &contact);
        assert_eq!(first, second);
    }

    #[test]
    fn captured_email_never_lowers_the_score() {
        let turns_without = vec![visitor_turn("I need help with scaling")];
        let turns_with = vec![
            visitor_turn("I need help with scaling"),
            visitor_turn("My email is ada@example.com if useful"),
        ];
        let contact_without = extract_contact(&turns_without, Some("Ada"));
        let contact_with = extract_contact(&turns_with, Some("Ada"));
        assert!(contact_with.email.is_some());

        let (without, _) = score_lead(&turns_without, 50, &contact_without);
        let (with, _) = score_lead(&turns_with, 50, &contact_with);
        assert!(with >= without);
    }

    #[test]
    fn substantive_turn_contribution_is_capped() {
        let many: Vec<Turn> = (0..50)
            .map(|i| visitor_turn(&format!("message number {i} with plenty of words")))
            .collect();
        let contact = ContactFields::default();
        let (score, _) = score_lead(&many, 0, &contact);
        assert_eq!(score, SUBSTANTIVE_TURN_CAP);
    }

    #[test]
    fn short_acknowledgements_are_not_substantive() {
        let turns = vec![visitor_turn("ok"), visitor_turn("thanks")];
        let contact = ContactFields::default();
        let (score, category) = score_lead(&turns, 0, &contact);
        assert_eq!(score, 0);
        assert_eq!(category, ScoreCategory::Cold);
    }

    #[test]
    fn full_house_clamps_at_max_score() {
        let turns: Vec<Turn> = (0..10)
            .map(|i| visitor_turn(&format!("substantive message number {i} right here")))
            .collect();
        let contact = ContactFields {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            phone: Some("+1 555 010 0199".into()),
        };
        let (score, category) = score_lead(&turns, 100, &contact);
        assert_eq!(score, MAX_SCORE);
        assert_eq!(category, ScoreCategory::Hot);
    }

    #[test]
    fn email_is_extracted_from_visitor_turns_only() {
        let turns = vec![
            assistant_turn("You can reach support at help@vendor.example"),
            visitor_turn("Sure, mine is ada@example.com"),
        ];
        let contact = extract_contact(&turns, None);
        assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn phone_extraction_needs_seven_digits() {
        let turns = vec![visitor_turn("We have 40 stores and 1200 employees")];
        let contact = extract_contact(&turns, None);
        assert!(contact.phone.is_none());

        let turns = vec![visitor_turn("Call me on +44 20 7946 0958 tomorrow")];
        let contact = extract_contact(&turns, None);
        assert_eq!(contact.phone.as_deref(), Some("+44 20 7946 0958"));
    }

    #[test]
    fn earliest_email_wins() {
        let turns = vec![
            visitor_turn("first@example.com is mine"),
            visitor_turn("or use second@example.com"),
        ];
        let contact = extract_contact(&turns, None);
        assert_eq!(contact.email.as_deref(), Some("first@example.com"));
    }

    #[test]
    fn name_alone_is_not_reachable_contact() {
        let contact = ContactFields {
            name: Some("Ada".into()),
            ..Default::default()
        };
        assert!(!contact.has_reachable_contact());
        let contact = ContactFields {
            phone: Some("+1 555 010 0100".into()),
            ..Default::default()
        };
        assert!(contact.has_reachable_contact());
    }

    #[test]
    fn interest_is_first_substantive_visitor_turn() {
        let turns = vec![
            visitor_turn("hi"),
            visitor_turn("I need help with scaling our analytics"),
            visitor_turn("also pricing"),
        ];
        assert_eq!(
            extract_interest(&turns).as_deref(),
            Some("I need help with scaling our analytics")
        );
    }

    #[test]
    fn long_interest_is_truncated() {
        let long = "word ".repeat(60);
        let turns = vec![visitor_turn(&long)];
        let interest = extract_interest(&turns).unwrap();
        assert!(interest.len() <= 123);
        assert!(interest.ends_with("..."));
    }

    proptest! {
        #[test]
        fn score_is_monotone_in_engagement(low in 0i64..=100, high in 0i64..=100) {
            prop_assume!(low <= high);
            let turns = vec![visitor_turn("I need help with scaling")];
            let contact = ContactFields::default();
            let (score_low, _) = score_lead(&turns, low, &contact);
            let (score_high, _) = score_lead(&turns, high, &contact);
            prop_assert!(score_low <= score_high);
        }

        #[test]
        fn score_is_monotone_in_turn_count(n in 0usize..20, m in 0usize..20) {
            prop_assume!(n <= m);
            let make = |count: usize| -> Vec<Turn> {
                (0..count)
                    .map(|i| visitor_turn(&format!("substantive visitor message {i}")))
                    .collect()
            };
            let contact = ContactFields::default();
            let (score_n, _) = score_lead(&make(n), 30, &contact);
            let (score_m, _) = score_lead(&make(m), 30, &contact);
            prop_assert!(score_n <= score_m);
        }

        #[test]
        fn score_never_exceeds_max(engagement in 0i64..=100, n in 0usize..40) {
            let turns: Vec<Turn> = (0..n)
                .map(|i| visitor_turn(&format!("substantive visitor message {i}")))
                .collect();
            let contact = ContactFields {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                phone: Some("+1 555 010 0100".into()),
            };
            let (score, _) = score_lead(&turns, engagement, &contact);
            prop_assert!(score >= 0 && score <= MAX_SCORE);
        }
    }
}
