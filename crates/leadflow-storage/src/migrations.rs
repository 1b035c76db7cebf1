// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use leadflow_core::LeadflowError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history`
/// table, so reruns are no-ops.
pub async fn run_migrations(conn: &tokio_rusqlite::Connection) -> Result<(), LeadflowError> {
    let report = conn
        .call(|conn| Ok(embedded::migrations::runner().run(conn)))
        .await
        .map_err(crate::database::map_tr_err)?;

    report.map_err(|e| LeadflowError::Storage {
        source: Box::new(e),
    })?;
    Ok(())
}
