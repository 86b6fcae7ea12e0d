// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! [`open`] is the only way a `SQLite` connection reaches the adapter.
//! Each one gets the connection pragmas before migrations run, and is
//! refused unless foreign keys are enforced and every fleet table exists.

use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use super::require_fleet_tables;
use crate::error::PersistenceError;

/// SQLite-specific migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a statement waits on a locked database before failing.
///
/// Rentals of the same vehicle race on one row, so a second writer should
/// queue behind the first rather than fail with `SQLITE_BUSY`.
pub const BUSY_TIMEOUT_MS: i32 = 5_000;

/// Where a `SQLite` database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// A shared in-memory database, gone when its last connection closes.
    Memory,
    /// A database file, journaled in WAL mode.
    File,
}

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct BusyTimeoutRow {
    #[diesel(sql_type = Integer)]
    timeout: i32,
}

#[derive(QueryableByName)]
struct TableRow {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Opens a database, applies connection pragmas, and brings the schema up
/// to date.
///
/// `database_url` may be a file path, `:memory:`, or a shared in-memory URI.
///
/// # Errors
///
/// Returns an error if the connection, a pragma, or a migration fails, or
/// if the migrated database fails the foreign key or schema checks.
pub fn open(database_url: &str, storage: Storage) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?storage, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    // Diesel has no PRAGMA DSL.
    conn.batch_execute(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
    ))
    .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    if storage == Storage::File {
        conn.batch_execute("PRAGMA journal_mode = WAL;")
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    verify_foreign_key_enforcement(&mut conn)?;
    verify_fleet_schema(&mut conn)?;
    debug!(timeout_ms = busy_timeout(&mut conn)?, "SQLite connection ready");
    Ok(conn)
}

/// Returns the ID of the row most recently inserted on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is active.
///
/// Vehicles, rentals, and sessions rely on it to reject dangling ids.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(
    conn: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Verifies that every fleet table is present.
///
/// # Errors
///
/// Returns `InitializationError` naming the missing tables.
pub fn verify_fleet_schema(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let tables: Vec<String> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type = 'table'")
            .load::<TableRow>(conn)?
            .into_iter()
            .map(|row| row.name)
            .collect();
    require_fleet_tables(&tables)
}

/// Reads the busy timeout in effect on this connection, in milliseconds.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn busy_timeout(conn: &mut SqliteConnection) -> Result<i32, PersistenceError> {
    let row: BusyTimeoutRow = diesel::sql_query("PRAGMA busy_timeout").get_result(conn)?;
    Ok(row.timeout)
}
