// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet mutations.
//!
//! Every state change is a conditional update on the status the vehicle
//! was read in. Zero affected rows means another writer won, and the
//! whole transaction is abandoned with `VehicleUnavailable`, or with
//! `VehicleNotFound` when the row is gone altogether.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent::VehicleRegistration;
use fleetrent_audit::AuditEvent;
use fleetrent_domain::VehicleStatus;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{location, vehicle};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a vehicle at a location together with its audit event.
///
/// Returns `(vehicle_id, event_id)`.
///
/// # Errors
///
/// Returns `LocationNotFound` if the location does not exist, or another
/// error if an insert fails.
pub fn new_vehicle(
    conn: &mut _,
    registration: &VehicleRegistration,
) -> Result<(i64, i64), PersistenceError> {
    let location_id: i64 = registration.location_id;
    let spec = &registration.spec;

    conn.transaction::<_, PersistenceError, _>(|tx| {
        let location_exists: bool = diesel::select(diesel::dsl::exists(
            location::table.filter(location::id.eq(location_id)),
        ))
        .get_result(tx)?;
        if !location_exists {
            return Err(PersistenceError::LocationNotFound(location_id));
        }

        diesel::insert_into(vehicle::table)
            .values((
                vehicle::location_id.eq(Some(location_id)),
                vehicle::make.eq(&spec.make),
                vehicle::model.eq(&spec.model),
                vehicle::year.eq(spec.year),
                vehicle::doors.eq(spec.doors),
                vehicle::axles.eq(spec.axles),
                vehicle::body_type.eq(&spec.body_type),
                vehicle::rent_cost_per_day_cents.eq(spec.rent_cost_per_day.cents()),
                vehicle::color.eq(&spec.color),
                vehicle::status.eq(VehicleStatus::Available.as_str()),
            ))
            .execute(tx)?;
        let vehicle_id: i64 = tx.get_last_insert_rowid()?;

        let event: AuditEvent = registration.audit_event.clone().with_vehicle_id(vehicle_id);
        let event_id: i64 = tx.insert_audit_event(&event)?;

        info!(vehicle_id, location_id, event_id, "Added vehicle");
        Ok((vehicle_id, event_id))
    })
}
}

backend_fn! {
/// Moves a parked vehicle to another location.
///
/// Returns the audit event ID.
///
/// # Errors
///
/// Returns `LocationNotFound` if the target does not exist,
/// `VehicleNotFound` if the vehicle is missing, or `VehicleUnavailable`
/// if it was rented meanwhile.
pub fn relocate_vehicle(
    conn: &mut _,
    vehicle_id: i64,
    location_id: i64,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
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
            .filter(vehicle::status.ne(VehicleStatus::Rented.as_str()))
            .set(vehicle::location_id.eq(Some(location_id)))
            .execute(tx)?;
        if updated == 0 {
            let exists: bool = diesel::select(diesel::dsl::exists(
                vehicle::table.filter(vehicle::id.eq(vehicle_id)),
            ))
            .get_result(tx)?;
            return Err(if exists {
                PersistenceError::VehicleUnavailable { vehicle_id }
            } else {
                PersistenceError::VehicleNotFound(vehicle_id)
            });
        }

        let event_id: i64 = tx.insert_audit_event(event)?;
        info!(vehicle_id, location_id, event_id, "Relocated vehicle");
        Ok(event_id)
    })
}
}

backend_fn! {
/// Moves a vehicle between two non-rental states.
///
/// Used for taking vehicles in and out of maintenance. Returns the audit
/// event ID.
///
/// # Errors
///
/// Returns `VehicleNotFound` if the vehicle is missing, or
/// `VehicleUnavailable` if it is not currently in `from`.
pub fn set_vehicle_status(
    conn: &mut _,
    vehicle_id: i64,
    from: VehicleStatus,
    to: VehicleStatus,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|tx| {
        let updated: usize = diesel::update(vehicle::table)
            .filter(vehicle::id.eq(vehicle_id))
            .filter(vehicle::status.eq(from.as_str()))
            .set(vehicle::status.eq(to.as_str()))
            .execute(tx)?;
        if updated == 0 {
            let exists: bool = diesel::select(diesel::dsl::exists(
                vehicle::table.filter(vehicle::id.eq(vehicle_id)),
            ))
            .get_result(tx)?;
            return Err(if exists {
                PersistenceError::VehicleUnavailable { vehicle_id }
            } else {
                PersistenceError::VehicleNotFound(vehicle_id)
            });
        }

        let event_id: i64 = tx.insert_audit_event(event)?;
        debug!(vehicle_id, from = %from, to = %to, event_id, "Changed vehicle status");
        Ok(event_id)
    })
}
}
