// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates backend-specific initialization, migration,
//! and helper functions that cannot be expressed in backend-agnostic
//! Diesel DSL.
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! All fleet queries and mutations live in `queries/` and `mutations/`
//! and must work across both backends.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};
use fleetrent_audit::AuditEvent;

use crate::error::PersistenceError;
use crate::mutations::audit::{insert_audit_event_mysql, insert_audit_event_sqlite};

/// Tables both migration sets must create.
pub const FLEET_TABLES: [&str; 6] = [
    "users",
    "sessions",
    "location",
    "vehicle",
    "rent_requests",
    "audit_events",
];

/// Checks a backend's table listing against [`FLEET_TABLES`].
///
/// Names compare case-insensitively; `MySQL` may fold them.
///
/// # Errors
///
/// Returns `InitializationError` naming every missing table.
pub fn require_fleet_tables(present: &[String]) -> Result<(), PersistenceError> {
    let missing: Vec<&str> = FLEET_TABLES
        .iter()
        .copied()
        .filter(|table| !present.iter().any(|name| name.eq_ignore_ascii_case(table)))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(PersistenceError::InitializationError(format!(
        "Database is missing fleet tables: {}",
        missing.join(", ")
    )))
}

/// Trait for operations that differ per backend.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so the
/// bodies generated by `backend_fn!` can call these as methods on either
/// connection type.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Verifies that every table in [`FLEET_TABLES`] exists.
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing tables.
    fn verify_fleet_schema(&mut self) -> Result<(), PersistenceError>;

    /// Inserts an audit event and returns its ID.
    ///
    /// Exposed here so multi-step mutations can record their audit event
    /// inside the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    fn insert_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn verify_fleet_schema(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_fleet_schema(self)
    }

    fn insert_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        insert_audit_event_sqlite(self, event)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn verify_fleet_schema(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_fleet_schema(self)
    }

    fn insert_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        insert_audit_event_mysql(self, event)
    }
}
