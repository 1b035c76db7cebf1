// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Leadflow integration tests.
//!
//! Provides a mock generative backend and an end-to-end harness over real
//! temp-directory SQLite storage.

pub mod harness;
pub mod mock_backend;

pub use harness::TestHarness;
pub use mock_backend::MockBackend;
