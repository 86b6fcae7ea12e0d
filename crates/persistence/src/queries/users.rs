// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_domain::UserType;
use tracing::debug;

use crate::data_models::{SessionData, UserData};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::timestamps::parse_timestamp;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    user_type: String,
    created_at: String,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type: UserType = row
            .user_type
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
        Ok(Self {
            user_id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            user_type,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl TryFrom<SessionRow> for SessionData {
    type Error = PersistenceError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            last_activity_at: parse_timestamp(&row.last_activity_at)?,
            expires_at: parse_timestamp(&row.expires_at)?,
        })
    }
}

backend_fn! {
/// Checks whether an account exists for a normalized email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn does_user_exist(conn: &mut _, email: &str) -> Result<bool, PersistenceError> {
    let exists: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::email.eq(email)),
    ))
    .get_result(conn)?;
    Ok(exists)
}
}

backend_fn! {
/// Retrieves a user by normalized email.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(conn: &mut _, email: &str) -> Result<Option<UserData>, PersistenceError> {
    debug!(email, "Looking up user by email");

    let row: Option<UserRow> = users::table
        .filter(users::email.eq(email))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserData::try_from).transpose()
}
}

backend_fn! {
/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(conn: &mut _, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    let row: Option<UserRow> = users::table
        .filter(users::id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserData::try_from).transpose()
}
}

backend_fn! {
/// Retrieves only the email of a user.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_email(conn: &mut _, user_id: i64) -> Result<Option<String>, PersistenceError> {
    let email: Option<String> = users::table
        .filter(users::id.eq(user_id))
        .select(users::email)
        .first(conn)
        .optional()?;
    Ok(email)
}
}

backend_fn! {
/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    row.map(SessionData::try_from).transpose()
}
}

/// Verifies a password against a bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
