// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rent and return mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_audit::AuditEvent;
use fleetrent_domain::{RentalWindow, VehicleStatus};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::RentOutcome;
use crate::diesel_schema::{location, rent_requests, vehicle};
use crate::error::PersistenceError;
use crate::timestamps::format_timestamp;

backend_fn! {
/// Rents an available vehicle to a user.
///
/// Marks the vehicle rented, takes it off its lot, opens a rent request
/// and records the audit event, all in one transaction.
///
/// # Errors
///
/// Returns `VehicleUnavailable` if the vehicle was not available at the
/// time of the update, or another error if a write fails.
pub fn rent_vehicle(
    conn: &mut _,
    vehicle_id: i64,
    renter_user_id: i64,
    window: &RentalWindow,
    event: &AuditEvent,
) -> Result<RentOutcome, PersistenceError> {
    let start_date: String = format_timestamp(window.start())?;
    let length_days: i32 = i32::try_from(window.length_days())
        .map_err(|e| PersistenceError::Other(format!("Rental length out of range: {e}")))?;

    conn.transaction::<_, PersistenceError, _>(|tx| {
        let updated: usize = diesel::update(vehicle::table)
            .filter(vehicle::id.eq(vehicle_id))
            .filter(vehicle::status.eq(VehicleStatus::Available.as_str()))
            .set((
                vehicle::status.eq(VehicleStatus::Rented.as_str()),
                vehicle::location_id.eq(None::<i64>),
            ))
            .execute(tx)?;
        if updated == 0 {
            return Err(PersistenceError::VehicleUnavailable { vehicle_id });
        }

        diesel::insert_into(rent_requests::table)
            .values((
                rent_requests::vehicle_id.eq(vehicle_id),
                rent_requests::renter_user_id.eq(renter_user_id),
                rent_requests::start_date.eq(&start_date),
                rent_requests::length_days.eq(length_days),
            ))
            .execute(tx)?;
        let rental_id: i64 = tx.get_last_insert_rowid()?;

        let event_id: i64 = tx.insert_audit_event(event)?;

        info!(vehicle_id, renter_user_id, rental_id, event_id, "Rented vehicle");
        Ok(RentOutcome {
            rental_id,
            event_id,
        })
    })
}
}

backend_fn! {
/// Returns a rented vehicle to a location and closes its rent request.
///
/// Returns the audit event ID.
///
/// # Errors
///
/// Returns `LocationNotFound` if the location does not exist,
/// `VehicleUnavailable` if the vehicle is not rented, or `RentalNotFound`
/// if no open rent request exists for it.
pub fn return_vehicle(
    conn: &mut _,
    vehicle_id: i64,
    location_id: i64,
    returned_at: OffsetDateTime,
    late_fee_cents: i64,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let returned: String = format_timestamp(returned_at)?;

    conn.transaction::<_, PersistenceError, _>(|tx| {
        let location_exists: bool = diesel::select(diesel::dsl::exists(
            location::table.filter(location::id.eq(location_id)),
        ))
        .get_result(tx)?;
        if !location_exists {
            return Err(PersistenceError::LocationNotFound(location_id));
        }

        let updated: usize = diesel::update(vehicle::table)
            .filter(vehicle::id.eq(vehicle_id))
            .filter(vehicle::status.eq(VehicleStatus::Rented.as_str()))
            .set((
                vehicle::status.eq(VehicleStatus::Available.as_str()),
                vehicle::location_id.eq(Some(location_id)),
            ))
            .execute(tx)?;
        if updated == 0 {
            return Err(PersistenceError::VehicleUnavailable { vehicle_id });
        }

        let closed: usize = diesel::update(rent_requests::table)
            .filter(rent_requests::vehicle_id.eq(vehicle_id))
            .filter(rent_requests::returned_at.is_null())
            .set((
                rent_requests::returned_at.eq(Some(&returned)),
                rent_requests::late_fee_cents.eq(Some(late_fee_cents)),
            ))
            .execute(tx)?;
        if closed == 0 {
            return Err(PersistenceError::RentalNotFound { vehicle_id });
        }

        let event_id: i64 = tx.insert_audit_event(event)?;
        info!(vehicle_id, location_id, late_fee_cents, event_id, "Returned vehicle");
        Ok(event_id)
    })
}
}
