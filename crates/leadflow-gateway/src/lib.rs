// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Leadflow engine.
//!
//! Exposes the chat entry point, viewer read surfaces (leads, turns), and an
//! engagement ingestion endpoint for external signal producers. Cross-origin
//! access is permitted from any origin.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};
