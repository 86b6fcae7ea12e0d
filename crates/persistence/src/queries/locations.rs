// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_domain::Location;

use crate::diesel_schema::location;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a location by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the location is not found.
pub fn get_location(conn: &mut _, location_id: i64) -> Result<Option<Location>, PersistenceError> {
    let row: Option<(i64, String)> = location::table
        .filter(location::id.eq(location_id))
        .select((location::id, location::address))
        .first(conn)
        .optional()?;

    Ok(row.map(|(id, address)| Location::with_id(id, &address)))
}
}

backend_fn! {
/// Checks whether a location exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn location_exists(conn: &mut _, location_id: i64) -> Result<bool, PersistenceError> {
    let exists: bool = diesel::select(diesel::dsl::exists(
        location::table.filter(location::id.eq(location_id)),
    ))
    .get_result(conn)?;
    Ok(exists)
}
}

backend_fn! {
/// Lists all locations ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(conn: &mut _) -> Result<Vec<Location>, PersistenceError> {
    let rows: Vec<(i64, String)> = location::table
        .order(location::id.asc())
        .select((location::id, location::address))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, address)| Location::with_id(id, &address))
        .collect())
}
}
