// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migrations embedded at build time with refinery.

use ideabot_core::IdeabotError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies pending migrations. Refinery records what ran in
/// `refinery_schema_history`, so calling this on every open is safe.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), IdeabotError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(IdeabotError::storage)?;
    Ok(())
}
