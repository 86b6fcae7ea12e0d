// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::VehicleStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// User type string is not recognized.
    InvalidUserType(String),
    /// Daily rate could not be parsed or is out of range.
    InvalidDailyRate(String),
    /// A vehicle field is empty, too long, or out of range.
    InvalidVehicleField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Location address is empty or too long.
    InvalidAddress(String),
    /// Rental length is outside the allowed range.
    InvalidRentalLength {
        /// The requested length in days.
        length_days: i64,
    },
    /// Vehicle status string is not recognized.
    InvalidVehicleStatus(String),
    /// The requested status change is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: VehicleStatus,
        /// The requested status.
        to: VehicleStatus,
    },
    /// The vehicle is currently rented.
    AlreadyRented {
        /// The vehicle identifier.
        vehicle_id: i64,
    },
    /// The vehicle is out of service for maintenance.
    UnderMaintenance {
        /// The vehicle identifier.
        vehicle_id: i64,
    },
    /// The vehicle is not currently rented.
    NotRented {
        /// The vehicle identifier.
        vehicle_id: i64,
    },
    /// The vehicle is already parked at the requested location.
    AlreadyAtLocation {
        /// The vehicle identifier.
        vehicle_id: i64,
        /// The location identifier.
        location_id: i64,
    },
    /// Date arithmetic overflowed.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidUserType(msg) => write!(f, "Invalid user type: {msg}"),
            Self::InvalidDailyRate(msg) => write!(f, "Invalid daily rate: {msg}"),
            Self::InvalidVehicleField { field, reason } => {
                write!(f, "Invalid vehicle {field}: {reason}")
            }
            Self::InvalidAddress(msg) => write!(f, "Invalid address: {msg}"),
            Self::InvalidRentalLength { length_days } => write!(
                f,
                "Invalid rental length: {length_days} days. Must be between 1 and {}",
                crate::MAX_RENTAL_DAYS
            ),
            Self::InvalidVehicleStatus(msg) => write!(f, "Invalid vehicle status: {msg}"),
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Vehicle cannot move from {from} to {to}")
            }
            Self::AlreadyRented { vehicle_id } => {
                write!(f, "Vehicle {vehicle_id} is already rented")
            }
            Self::UnderMaintenance { vehicle_id } => {
                write!(f, "Vehicle {vehicle_id} is under maintenance")
            }
            Self::NotRented { vehicle_id } => {
                write!(f, "Vehicle {vehicle_id} is not currently rented")
            }
            Self::AlreadyAtLocation {
                vehicle_id,
                location_id,
            } => write!(
                f,
                "Vehicle {vehicle_id} is already at location {location_id}"
            ),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
