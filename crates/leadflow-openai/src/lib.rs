// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions backend adapter for Leadflow.
//!
//! Any gateway speaking the chat-completions wire format works here; the
//! endpoint is selected by `provider.base_url`.

pub mod adapter;
pub mod client;
pub mod types;

pub use adapter::OpenAiBackend;
pub use client::ChatClient;
