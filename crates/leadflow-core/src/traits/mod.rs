// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for pluggable Leadflow components.

pub mod adapter;
pub mod backend;
pub mod signal;
pub mod store;

pub use adapter::Adapter;
pub use backend::GenerativeBackend;
pub use signal::SignalProducer;
pub use store::SignalStore;
