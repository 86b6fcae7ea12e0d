// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent_domain::RentalWindow;
use time::OffsetDateTime;

/// A command represents user intent against a single vehicle as data only.
///
/// Commands are the only way to request vehicle state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Take the vehicle out on a rental.
    Rent {
        /// The renting user.
        renter_id: i64,
        /// The booked rental period.
        window: RentalWindow,
    },
    /// Bring a rented vehicle back to a location.
    Return {
        /// Where the vehicle is dropped off.
        location_id: i64,
        /// When the vehicle was dropped off.
        at: OffsetDateTime,
        /// The rental being closed.
        window: RentalWindow,
    },
    /// Move a parked vehicle to another location.
    Relocate {
        /// The destination location.
        location_id: i64,
    },
    /// Take the vehicle out of service.
    StartMaintenance,
    /// Return the vehicle to service.
    FinishMaintenance,
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Rent { .. } => "RentVehicle",
            Self::Return { .. } => "ReturnVehicle",
            Self::Relocate { .. } => "RelocateVehicle",
            Self::StartMaintenance => "StartMaintenance",
            Self::FinishMaintenance => "FinishMaintenance",
        }
    }
}
