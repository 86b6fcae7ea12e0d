// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

#[cfg(test)]
mod tests;

use fleetrent_domain::UserType;

/// The signed-in user who performed an action.
///
/// Captured by value so audit history stays readable even if the
/// account is later changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's identifier.
    pub user_id: i64,
    /// The acting user's email at the time of the action.
    pub email: String,
    /// The acting user's account type at the time of the action.
    pub user_type: UserType,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(user_id: i64, email: String, user_type: UserType) -> Self {
        Self {
            user_id,
            email,
            user_type,
        }
    }
}

/// The request that triggered an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for the triggering request.
    pub id: String,
    /// A description of the request.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`RentVehicle`", "`RelocateVehicle`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A textual snapshot of an entity's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable record of one state change.
///
/// Every successful vehicle state change and every location or vehicle
/// creation produces exactly one audit event, persisted in the same
/// transaction as the change itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The persisted identifier. `None` until the event is stored.
    pub event_id: Option<i64>,
    /// The vehicle this event concerns, if any.
    pub vehicle_id: Option<i64>,
    /// Who initiated the change.
    pub actor: Actor,
    /// Why the change was made.
    pub cause: Cause,
    /// What was done.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new, unpersisted `AuditEvent`.
    #[must_use]
    pub const fn new(
        vehicle_id: Option<i64>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            vehicle_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns this event tagged with its persisted identifier.
    #[must_use]
    pub fn with_event_id(self, event_id: i64) -> Self {
        Self {
            event_id: Some(event_id),
            ..self
        }
    }

    /// Returns this event scoped to a vehicle.
    ///
    /// Used when the vehicle identifier is only known after insertion.
    #[must_use]
    pub fn with_vehicle_id(self, vehicle_id: i64) -> Self {
        Self {
            vehicle_id: Some(vehicle_id),
            ..self
        }
    }
}
