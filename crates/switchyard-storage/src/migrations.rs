// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations.
//!
//! The SQL files under `migrations/` are compiled in with refinery's
//! `embed_migrations!` and applied every time a database is opened.

use switchyard_core::SwitchyardError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Applied versions are tracked in
/// `refinery_schema_history`, so this is safe to run on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), SwitchyardError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| SwitchyardError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(())
}
