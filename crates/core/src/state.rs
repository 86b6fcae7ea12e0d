// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent_audit::{AuditEvent, StateSnapshot};
use fleetrent_domain::{Location, Vehicle, VehicleSpec};

/// Converts a vehicle to a snapshot for audit purposes.
#[must_use]
pub fn vehicle_snapshot(vehicle: &Vehicle) -> StateSnapshot {
    let location: String = vehicle
        .location_id
        .map_or_else(|| String::from("none"), |id| id.to_string());
    StateSnapshot::new(format!(
        "status={},location={}",
        vehicle.status.as_str(),
        location
    ))
}

/// The charges settled when a rental is closed.
///
/// All amounts are in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnSettlement {
    /// Whether the vehicle came back after its due instant.
    pub late: bool,
    /// Started days past the due instant.
    pub days_late: i64,
    /// The booked price.
    pub base_cost_cents: i64,
    /// The charge for late days.
    pub late_fee_cents: i64,
    /// Booked price plus late charge.
    pub total_cost_cents: i64,
}

/// The result of a successful vehicle state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The vehicle after the transition.
    pub new_vehicle: Vehicle,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Charges computed for `Return`; `None` for every other command.
    pub settlement: Option<ReturnSettlement>,
}

/// A validated vehicle ready to be inserted.
///
/// The audit event carries no vehicle id until the insert assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRegistration {
    pub location_id: i64,
    pub spec: VehicleSpec,
    pub audit_event: AuditEvent,
}

/// A validated location ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCreation {
    pub location: Location,
    pub audit_event: AuditEvent,
}
