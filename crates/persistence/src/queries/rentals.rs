// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rent request queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::RentalData;
use crate::diesel_schema::rent_requests;
use crate::error::PersistenceError;
use crate::timestamps::parse_timestamp;

/// Diesel Queryable struct for rent request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rent_requests)]
struct RentalRow {
    id: i64,
    vehicle_id: i64,
    renter_user_id: i64,
    start_date: String,
    length_days: i32,
    returned_at: Option<String>,
    late_fee_cents: Option<i64>,
}

impl TryFrom<RentalRow> for RentalData {
    type Error = PersistenceError;

    fn try_from(row: RentalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            rental_id: row.id,
            vehicle_id: row.vehicle_id,
            renter_user_id: row.renter_user_id,
            start_date: parse_timestamp(&row.start_date)?,
            length_days: i64::from(row.length_days),
            returned_at: row.returned_at.as_deref().map(parse_timestamp).transpose()?,
            late_fee_cents: row.late_fee_cents,
        })
    }
}

backend_fn! {
/// Retrieves the open rental for a vehicle.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
/// Returns `Ok(None)` if the vehicle is not out on a rental.
pub fn get_active_rental(
    conn: &mut _,
    vehicle_id: i64,
) -> Result<Option<RentalData>, PersistenceError> {
    let row: Option<RentalRow> = rent_requests::table
        .filter(rent_requests::vehicle_id.eq(vehicle_id))
        .filter(rent_requests::returned_at.is_null())
        .select(RentalRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RentalData::try_from).transpose()
}
}

backend_fn! {
/// Lists every rental a user has made, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_rentals_for_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Vec<RentalData>, PersistenceError> {
    let rows: Vec<RentalRow> = rent_requests::table
        .filter(rent_requests::renter_user_id.eq(user_id))
        .order(rent_requests::id.asc())
        .select(RentalRow::as_select())
        .load(conn)?;

    rows.into_iter().map(RentalData::try_from).collect()
}
}
