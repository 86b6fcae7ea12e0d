// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the fleetrent backend.
//!
//! Stores users, sessions, locations, vehicles, rent requests and the
//! audit trail. Built on Diesel with two backends:
//!
//! - **`SQLite`** (default) for development and every standard test
//! - **`MariaDB`/`MySQL`** validated only by opt-in tests
//!
//! To run the `MySQL` validation tests:
//! ```bash
//! cargo xtask test-mariadb
//! ```
//!
//! Each backend has its own migration directory (`migrations/` and
//! `migrations_mysql/`) with the same schema semantics.
//!
//! Every mutation that changes a vehicle writes its audit event in the
//! same transaction, and every status change is conditional on the
//! status the caller read. Callers never hold a lock across the
//! read-decide-write cycle.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{MysqlConnection, SqliteConnection};
use fleetrent::{LocationCreation, VehicleRegistration};
use fleetrent_audit::AuditEvent;
use fleetrent_domain::{Location, RentalWindow, UserType, Vehicle, VehicleStatus};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Source of unique names for shared in-memory databases.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a `_sqlite` and a `_mysql` copy of a function body.
///
/// Diesel needs a concrete connection type per backend, so each query is
/// written once with `conn: &mut _` and stamped out twice. The macro only
/// substitutes the connection type; dispatch lives in `Persistence`.
///
/// ```ignore
/// backend_fn! {
///     pub fn count_locations(conn: &mut _) -> Result<i64, PersistenceError> {
///         Ok(location::table.count().get_result(conn)?)
///     }
/// }
/// ```
///
/// expands to `count_locations_sqlite` and `count_locations_mysql`.
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use data_models::{RentOutcome, RentalData, SessionData, UserData};
pub use error::PersistenceError;
pub use mutations::users::PASSWORD_HASH_COST;
pub use queries::users::verify_password;

use backend::PersistenceBackend;

/// Backend-specific database connection.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

/// Persistence adapter for the fleet.
///
/// Backend selection happens once at construction time and is transparent
/// to callers.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database so tests are isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open(&shared_memory_url, backend::sqlite::Storage::Memory)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection =
            backend::sqlite::open(path_str, backend::sqlite::Storage::File)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let conn: MysqlConnection = backend::mysql::open(database_url)?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    /// Verifies that every fleet table exists.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` naming the missing tables.
    pub fn verify_fleet_schema(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_fleet_schema(),
            BackendConnection::Mysql(conn) => conn.verify_fleet_schema(),
        }
    }

    // ========================================================================
    // Users & Sessions
    // ========================================================================

    /// Creates a user account and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is taken.
    pub fn register_user(
        &mut self,
        email: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::users::register_user_sqlite(conn, email, password, user_type)
            }
            BackendConnection::Mysql(conn) => {
                mutations::users::register_user_mysql(conn, email, password, user_type)
            }
        }
    }

    /// Checks whether an account exists for an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn does_user_exist(&mut self, email: &str) -> Result<bool, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::users::does_user_exist_sqlite(conn, email),
            BackendConnection::Mysql(conn) => queries::users::does_user_exist_mysql(conn, email),
        }
    }

    /// Retrieves a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::users::get_user_by_email_sqlite(conn, email)
            }
            BackendConnection::Mysql(conn) => queries::users::get_user_by_email_mysql(conn, email),
        }
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::users::get_user_by_id_sqlite(conn, user_id),
            BackendConnection::Mysql(conn) => queries::users::get_user_by_id_mysql(conn, user_id),
        }
    }

    /// Retrieves the email of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_email(&mut self, user_id: i64) -> Result<Option<String>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::users::get_user_email_sqlite(conn, user_id),
            BackendConnection::Mysql(conn) => queries::users::get_user_email_mysql(conn, user_id),
        }
    }

    /// Creates a session and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::users::create_session_sqlite(conn, session_token, user_id, expires_at)
            }
            BackendConnection::Mysql(conn) => {
                mutations::users::create_session_mysql(conn, session_token, user_id, expires_at)
            }
        }
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::users::get_session_by_token_sqlite(conn, session_token)
            }
            BackendConnection::Mysql(conn) => {
                queries::users::get_session_by_token_mysql(conn, session_token)
            }
        }
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::users::update_session_activity_sqlite(conn, session_id)
            }
            BackendConnection::Mysql(conn) => {
                mutations::users::update_session_activity_mysql(conn, session_id)
            }
        }
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::users::delete_session_sqlite(conn, session_token)
            }
            BackendConnection::Mysql(conn) => {
                mutations::users::delete_session_mysql(conn, session_token)
            }
        }
    }

    /// Deletes all expired sessions and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::users::delete_expired_sessions_sqlite(conn)
            }
            BackendConnection::Mysql(conn) => {
                mutations::users::delete_expired_sessions_mysql(conn)
            }
        }
    }

    // ========================================================================
    // Locations
    // ========================================================================

    /// Persists a validated location and its audit event.
    ///
    /// Returns `(location_id, event_id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_location(
        &mut self,
        creation: &LocationCreation,
    ) -> Result<(i64, i64), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::locations::create_location_sqlite(conn, creation)
            }
            BackendConnection::Mysql(conn) => {
                mutations::locations::create_location_mysql(conn, creation)
            }
        }
    }

    /// Retrieves a location by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_location(&mut self, location_id: i64) -> Result<Option<Location>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::locations::get_location_sqlite(conn, location_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::locations::get_location_mysql(conn, location_id)
            }
        }
    }

    /// Checks whether a location exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn location_exists(&mut self, location_id: i64) -> Result<bool, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::locations::location_exists_sqlite(conn, location_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::locations::location_exists_mysql(conn, location_id)
            }
        }
    }

    /// Lists all locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_locations(&mut self) -> Result<Vec<Location>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::locations::list_locations_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::locations::list_locations_mysql(conn),
        }
    }

    // ========================================================================
    // Vehicles
    // ========================================================================

    /// Persists a validated vehicle and its audit event.
    ///
    /// Returns `(vehicle_id, event_id)`.
    ///
    /// # Errors
    ///
    /// Returns `LocationNotFound` if the location does not exist.
    pub fn new_vehicle(
        &mut self,
        registration: &VehicleRegistration,
    ) -> Result<(i64, i64), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::vehicles::new_vehicle_sqlite(conn, registration)
            }
            BackendConnection::Mysql(conn) => {
                mutations::vehicles::new_vehicle_mysql(conn, registration)
            }
        }
    }

    /// Retrieves a vehicle by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn get_vehicle(&mut self, vehicle_id: i64) -> Result<Option<Vehicle>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::vehicles::get_vehicle_sqlite(conn, vehicle_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::vehicles::get_vehicle_mysql(conn, vehicle_id)
            }
        }
    }

    /// Lists vehicles parked at a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn get_location_vehicles(
        &mut self,
        location_id: i64,
        available_only: bool,
    ) -> Result<Vec<Vehicle>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::vehicles::get_location_vehicles_sqlite(conn, location_id, available_only)
            }
            BackendConnection::Mysql(conn) => {
                queries::vehicles::get_location_vehicles_mysql(conn, location_id, available_only)
            }
        }
    }

    /// Moves a parked vehicle to another location.
    ///
    /// # Errors
    ///
    /// Returns `LocationNotFound`, `VehicleNotFound`, or `VehicleUnavailable`.
    pub fn relocate_vehicle(
        &mut self,
        vehicle_id: i64,
        location_id: i64,
        event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::vehicles::relocate_vehicle_sqlite(conn, vehicle_id, location_id, event)
            }
            BackendConnection::Mysql(conn) => {
                mutations::vehicles::relocate_vehicle_mysql(conn, vehicle_id, location_id, event)
            }
        }
    }

    /// Moves a vehicle from status `from` to status `to`.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` if the vehicle is missing, or
    /// `VehicleUnavailable` if it is not in `from`.
    pub fn set_vehicle_status(
        &mut self,
        vehicle_id: i64,
        from: VehicleStatus,
        to: VehicleStatus,
        event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::vehicles::set_vehicle_status_sqlite(conn, vehicle_id, from, to, event)
            }
            BackendConnection::Mysql(conn) => {
                mutations::vehicles::set_vehicle_status_mysql(conn, vehicle_id, from, to, event)
            }
        }
    }

    // ========================================================================
    // Rentals
    // ========================================================================

    /// Rents an available vehicle.
    ///
    /// # Errors
    ///
    /// Returns `VehicleUnavailable` if the vehicle was not available.
    pub fn rent_vehicle(
        &mut self,
        vehicle_id: i64,
        renter_user_id: i64,
        window: &RentalWindow,
        event: &AuditEvent,
    ) -> Result<RentOutcome, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::rentals::rent_vehicle_sqlite(
                conn,
                vehicle_id,
                renter_user_id,
                window,
                event,
            ),
            BackendConnection::Mysql(conn) => mutations::rentals::rent_vehicle_mysql(
                conn,
                vehicle_id,
                renter_user_id,
                window,
                event,
            ),
        }
    }

    /// Returns a rented vehicle and closes its rent request.
    ///
    /// # Errors
    ///
    /// Returns `LocationNotFound`, `VehicleUnavailable`, or `RentalNotFound`.
    pub fn return_vehicle(
        &mut self,
        vehicle_id: i64,
        location_id: i64,
        returned_at: OffsetDateTime,
        late_fee_cents: i64,
        event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::rentals::return_vehicle_sqlite(
                conn,
                vehicle_id,
                location_id,
                returned_at,
                late_fee_cents,
                event,
            ),
            BackendConnection::Mysql(conn) => mutations::rentals::return_vehicle_mysql(
                conn,
                vehicle_id,
                location_id,
                returned_at,
                late_fee_cents,
                event,
            ),
        }
    }

    /// Retrieves the open rental for a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_active_rental(
        &mut self,
        vehicle_id: i64,
    ) -> Result<Option<RentalData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::rentals::get_active_rental_sqlite(conn, vehicle_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::rentals::get_active_rental_mysql(conn, vehicle_id)
            }
        }
    }

    /// Lists every rental made by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rentals_for_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<RentalData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::rentals::list_rentals_for_user_sqlite(conn, user_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::rentals::list_rentals_for_user_mysql(conn, user_id)
            }
        }
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.insert_audit_event(event),
            BackendConnection::Mysql(conn) => conn.insert_audit_event(event),
        }
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::audit::get_audit_event_sqlite(conn, event_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::audit::get_audit_event_mysql(conn, event_id)
            }
        }
    }

    /// Lists the audit trail of a vehicle, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an event cannot be deserialized.
    pub fn list_vehicle_audit_events(
        &mut self,
        vehicle_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::audit::list_vehicle_audit_events_sqlite(conn, vehicle_id)
            }
            BackendConnection::Mysql(conn) => {
                queries::audit::list_vehicle_audit_events_mysql(conn, vehicle_id)
            }
        }
    }
}
