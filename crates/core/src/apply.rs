// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{
    LocationCreation, ReturnSettlement, TransitionResult, VehicleRegistration, vehicle_snapshot,
};
use fleetrent_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetrent_domain::{
    DomainError, Location, Vehicle, VehicleSpec, VehicleStatus, format_cents, validate_address,
    validate_vehicle_spec,
};

/// Checks that `vehicle` may move to `target`, naming the blocking state.
fn ensure_transition(vehicle: &Vehicle, target: VehicleStatus) -> Result<(), DomainError> {
    if vehicle.status.can_transition_to(target) {
        return Ok(());
    }
    let vehicle_id: i64 = vehicle.vehicle_id;
    Err(match (vehicle.status, target) {
        (VehicleStatus::Rented, _) => DomainError::AlreadyRented { vehicle_id },
        (VehicleStatus::Maintenance, VehicleStatus::Rented) => {
            DomainError::UnderMaintenance { vehicle_id }
        }
        (from, to) => DomainError::InvalidStatusTransition { from, to },
    })
}

/// Applies a command to a vehicle, producing the new vehicle and an audit event.
///
/// This function is pure: persisting the result is the caller's job, and
/// the caller must make the write conditional on the vehicle still being
/// in the state it was read in.
///
/// # Errors
///
/// Returns an error if:
/// - `Rent` targets a vehicle that is rented or under maintenance
/// - `Return` targets a vehicle that is not rented
/// - `Relocate` targets a rented vehicle or its current location
/// - a maintenance command does not match the vehicle's status
pub fn apply(
    vehicle: &Vehicle,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.action_name();
    let before: StateSnapshot = vehicle_snapshot(vehicle);
    let mut new_vehicle: Vehicle = vehicle.clone();
    let mut settlement: Option<ReturnSettlement> = None;

    let details: String = match command {
        Command::Rent { renter_id, window } => {
            ensure_transition(vehicle, VehicleStatus::Rented)?;
            new_vehicle.status = VehicleStatus::Rented;
            // On the road until returned.
            new_vehicle.location_id = None;
            format!(
                "Rented to user {renter_id} for {} days, due {}",
                window.length_days(),
                window.due_at()
            )
        }
        Command::Return {
            location_id,
            at,
            window,
        } => {
            if !vehicle.is_rented() {
                return Err(DomainError::NotRented {
                    vehicle_id: vehicle.vehicle_id,
                }
                .into());
            }
            new_vehicle.status = VehicleStatus::Available;
            new_vehicle.location_id = Some(location_id);

            let rate = vehicle.spec.rent_cost_per_day;
            let base_cost_cents: i64 = window.base_cost(rate);
            let late_fee_cents: i64 = window.late_fee(rate, at);
            let returned: ReturnSettlement = ReturnSettlement {
                late: window.is_late(at),
                days_late: window.days_late(at),
                base_cost_cents,
                late_fee_cents,
                total_cost_cents: base_cost_cents.saturating_add(late_fee_cents),
            };
            settlement = Some(returned);

            if returned.late {
                format!(
                    "Returned to location {location_id}, {} days late, late fee {}",
                    returned.days_late,
                    format_cents(late_fee_cents)
                )
            } else {
                format!("Returned to location {location_id} on time")
            }
        }
        Command::Relocate { location_id } => {
            if vehicle.is_rented() {
                return Err(DomainError::AlreadyRented {
                    vehicle_id: vehicle.vehicle_id,
                }
                .into());
            }
            if vehicle.location_id == Some(location_id) {
                return Err(DomainError::AlreadyAtLocation {
                    vehicle_id: vehicle.vehicle_id,
                    location_id,
                }
                .into());
            }
            new_vehicle.location_id = Some(location_id);
            vehicle.location_id.map_or_else(
                || format!("Relocated to location {location_id}"),
                |from| format!("Relocated from location {from} to location {location_id}"),
            )
        }
        Command::StartMaintenance => {
            ensure_transition(vehicle, VehicleStatus::Maintenance)?;
            new_vehicle.status = VehicleStatus::Maintenance;
            String::from("Taken out of service")
        }
        Command::FinishMaintenance => {
            if vehicle.status != VehicleStatus::Maintenance {
                return Err(DomainError::InvalidStatusTransition {
                    from: vehicle.status,
                    to: VehicleStatus::Available,
                }
                .into());
            }
            new_vehicle.status = VehicleStatus::Available;
            String::from("Returned to service")
        }
    };

    let after: StateSnapshot = vehicle_snapshot(&new_vehicle);
    let action: Action = Action::new(String::from(action_name), Some(details));
    let audit_event: AuditEvent = AuditEvent::new(
        Some(vehicle.vehicle_id),
        actor,
        cause,
        action,
        before,
        after,
    );

    Ok(TransitionResult {
        new_vehicle,
        audit_event,
        settlement,
    })
}

/// Validates a new vehicle for a location and prepares its audit event.
///
/// # Errors
///
/// Returns an error if any vehicle field fails validation.
pub fn apply_vehicle_registration(
    location_id: i64,
    spec: VehicleSpec,
    actor: Actor,
    cause: Cause,
) -> Result<VehicleRegistration, CoreError> {
    validate_vehicle_spec(&spec)?;

    let before: StateSnapshot = StateSnapshot::new(String::new());
    let after: StateSnapshot = StateSnapshot::new(format!(
        "status={},location={location_id}",
        VehicleStatus::Available.as_str()
    ));
    let action: Action = Action::new(
        String::from("CreateVehicle"),
        Some(format!(
            "Added {} {} {} at {} per day to location {location_id}",
            spec.year, spec.make, spec.model, spec.rent_cost_per_day
        )),
    );

    Ok(VehicleRegistration {
        location_id,
        spec,
        audit_event: AuditEvent::new(None, actor, cause, action, before, after),
    })
}

/// Validates a new location and prepares its audit event.
///
/// # Errors
///
/// Returns an error if the address is blank or too long.
pub fn apply_location_creation(
    address: &str,
    actor: Actor,
    cause: Cause,
) -> Result<LocationCreation, CoreError> {
    validate_address(address)?;
    let location: Location = Location::new(address);

    let action: Action = Action::new(
        String::from("CreateLocation"),
        Some(format!("Created location at '{}'", location.address())),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        None,
        actor,
        cause,
        action,
        StateSnapshot::new(String::new()),
        StateSnapshot::new(format!("address={}", location.address())),
    );

    Ok(LocationCreation {
        location,
        audit_event,
    })
}
