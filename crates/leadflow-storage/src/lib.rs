// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer (Signal Store) for the Leadflow engine.
//!
//! Durable append-only records for conversation turns and engagement samples
//! plus the derived lead and read-only catalog tables. All writes go through
//! a single tokio-rusqlite background connection, which is what makes the
//! per-conversation append order total.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod notify;
pub mod queries;

pub use adapter::SqliteSignalStore;
pub use database::Database;
pub use notify::ChangeHub;
