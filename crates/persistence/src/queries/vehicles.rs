// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_domain::{DailyRate, Vehicle, VehicleSpec, VehicleStatus};

use crate::diesel_schema::vehicle;
use crate::error::PersistenceError;

/// Diesel Queryable struct for vehicle rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = vehicle)]
pub(crate) struct VehicleRow {
    id: i64,
    location_id: Option<i64>,
    make: String,
    model: String,
    year: i16,
    doors: i16,
    axles: i16,
    body_type: String,
    rent_cost_per_day_cents: i64,
    color: String,
    status: String,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = PersistenceError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let status: VehicleStatus = row
            .status
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
        let rent_cost_per_day: DailyRate = DailyRate::from_cents(row.rent_cost_per_day_cents)
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;

        Ok(Self {
            vehicle_id: row.id,
            location_id: row.location_id,
            spec: VehicleSpec {
                make: row.make,
                model: row.model,
                year: row.year,
                doors: row.doors,
                axles: row.axles,
                body_type: row.body_type,
                rent_cost_per_day,
                color: row.color,
            },
            status,
        })
    }
}

backend_fn! {
/// Retrieves a vehicle by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
/// Returns `Ok(None)` if the vehicle is not found.
pub fn get_vehicle(conn: &mut _, vehicle_id: i64) -> Result<Option<Vehicle>, PersistenceError> {
    let row: Option<VehicleRow> = vehicle::table
        .filter(vehicle::id.eq(vehicle_id))
        .select(VehicleRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Vehicle::try_from).transpose()
}
}

backend_fn! {
/// Lists vehicles parked at a location, ordered by ID.
///
/// With `available_only`, vehicles under maintenance are left out.
/// Rented vehicles are never parked and so never appear.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn get_location_vehicles(
    conn: &mut _,
    location_id: i64,
    available_only: bool,
) -> Result<Vec<Vehicle>, PersistenceError> {
    let mut query = vehicle::table
        .filter(vehicle::location_id.eq(location_id))
        .order(vehicle::id.asc())
        .select(VehicleRow::as_select())
        .into_boxed();

    if available_only {
        query = query.filter(vehicle::status.eq(VehicleStatus::Available.as_str()));
    }

    let rows: Vec<VehicleRow> = query.load(conn)?;
    rows.into_iter().map(Vehicle::try_from).collect()
}
}
