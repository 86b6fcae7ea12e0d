// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session mutations.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_domain::UserType;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::timestamps::{format_timestamp, now_timestamp};

/// bcrypt work factor for stored password hashes.
pub const PASSWORD_HASH_COST: u32 = 10;

backend_fn! {
/// Creates a new user account.
///
/// The email must already be normalized. The password is hashed with
/// bcrypt before it is stored.
///
/// # Errors
///
/// Returns `DuplicateEmail` if the email is taken, or another error if
/// hashing or the insert fails.
pub fn register_user(
    conn: &mut _,
    email: &str,
    password: &str,
    user_type: UserType,
) -> Result<i64, PersistenceError> {
    info!(email, user_type = %user_type, "Registering user");

    let password_hash: String = bcrypt::hash(password, PASSWORD_HASH_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;
    let created_at: String = now_timestamp()?;

    diesel::insert_into(users::table)
        .values((
            users::email.eq(email),
            users::password_hash.eq(&password_hash),
            users::user_type.eq(user_type.as_str()),
            users::created_at.eq(&created_at),
        ))
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::DuplicateEmail(email.to_string())
            }
            other => PersistenceError::from(other),
        })?;

    let user_id: i64 = conn.get_last_insert_rowid()?;
    info!(user_id, "User registered");
    Ok(user_id)
}
}

backend_fn! {
/// Creates a new session for a user.
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    user_id: i64,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let now: String = now_timestamp()?;
    let expires: String = format_timestamp(expires_at)?;
    debug!(user_id, expires_at = %expires, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(&expires),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    let now: String = now_timestamp()?;

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(&now))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// Deleting a token that does not exist is not an error.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}
}

backend_fn! {
/// Deletes all expired sessions and returns how many were removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut _) -> Result<usize, PersistenceError> {
    let now: String = now_timestamp()?;

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(&now))
        .execute(conn)?;

    info!(rows_affected, "Deleted expired sessions");
    Ok(rows_affected)
}
}
