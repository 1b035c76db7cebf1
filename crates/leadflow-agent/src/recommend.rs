// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recommendation selection.
//!
//! Current policy: a fixed-size prefix of the catalog in catalog order. The
//! signature receives the conversation so a content-matching strategy can
//! replace the policy without touching the orchestrator.

use leadflow_core::types::{Product, Turn};

/// Choose which catalog items to surface for this conversation.
pub fn select(turns: &[Turn], catalog: &[Product], max: usize) -> Vec<Product> {
    let _ = turns; // reserved for content-matching strategies
    catalog.iter().take(max).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: "desc".to_string(),
            price: 10.0,
            features: vec![],
            category: None,
        }
    }

    #[test]
    fn selects_a_catalog_prefix() {
        let catalog = vec![product("a"), product("b"), product("c"), product("d")];
        let selected = select(&[], &catalog, 3);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].id, "a");
        assert_eq!(selected[2].id, "c");
    }

    #[test]
    fn never_exceeds_catalog_size() {
        let catalog = vec![product("a")];
        let selected = select(&[], &catalog, 3);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        assert!(select(&[], &[], 3).is_empty());
    }
}
