// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent_domain::DomainError;

/// Why a command was refused.
///
/// Every refusal carries the domain error that caused it; the variant says
/// whether the caller sent bad input, asked for something the vehicle's
/// current state forbids, or asked for a change that is already in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation.
    InvalidInput(DomainError),
    /// The vehicle's status does not allow the command.
    VehicleState(DomainError),
    /// The command would leave the vehicle exactly as it is.
    Unchanged(DomainError),
}

impl CoreError {
    /// Returns the underlying domain error.
    #[must_use]
    pub const fn domain_error(&self) -> &DomainError {
        match self {
            Self::InvalidInput(err) | Self::VehicleState(err) | Self::Unchanged(err) => err,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "Invalid input: {err}"),
            Self::VehicleState(err) => write!(f, "Vehicle state conflict: {err}"),
            Self::Unchanged(err) => write!(f, "Nothing to change: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStatusTransition { .. }
            | DomainError::AlreadyRented { .. }
            | DomainError::UnderMaintenance { .. }
            | DomainError::NotRented { .. } => Self::VehicleState(err),
            DomainError::AlreadyAtLocation { .. } => Self::Unchanged(err),
            DomainError::InvalidEmail(_)
            | DomainError::InvalidUserType(_)
            | DomainError::InvalidDailyRate(_)
            | DomainError::InvalidVehicleField { .. }
            | DomainError::InvalidAddress(_)
            | DomainError::InvalidRentalLength { .. }
            | DomainError::InvalidVehicleStatus(_)
            | DomainError::DateArithmeticOverflow { .. } => Self::InvalidInput(err),
        }
    }
}
