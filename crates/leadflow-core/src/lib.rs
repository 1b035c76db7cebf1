// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadflow lead-qualification engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Leadflow workspace. Adapter
//! implementations (storage, generative backend, signal producers) implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeadflowError;
pub use types::{AdapterKind, Emotion, HealthStatus, ScoreCategory, TurnRole};

// Re-export all adapter traits at crate root.
pub use traits::{Adapter, GenerativeBackend, SignalProducer, SignalStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = LeadflowError::Config("test".into());
        let _validation = LeadflowError::Validation("test".into());
        let _storage = LeadflowError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _rate = LeadflowError::BackendRateLimited;
        let _pay = LeadflowError::BackendPaymentRequired;
        let _down = LeadflowError::BackendUnavailable {
            message: "test".into(),
            source: None,
        };
        let _channel = LeadflowError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = LeadflowError::Internal("test".into());
    }

    #[test]
    fn adapter_kind_round_trips() {
        use std::str::FromStr;

        for kind in [
            AdapterKind::Store,
            AdapterKind::Backend,
            AdapterKind::SignalProducer,
        ] {
            let s = kind.to_string();
            assert_eq!(AdapterKind::from_str(&s).unwrap(), kind);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any trait module is missing or fails to compile, this test
        // won't compile.
        fn _assert_adapter<T: Adapter>() {}
        fn _assert_store<T: SignalStore>() {}
        fn _assert_backend<T: GenerativeBackend>() {}
        fn _assert_signal<T: SignalProducer>() {}
    }
}
