// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fleetrent::CoreError;
use fleetrent_domain::DomainError;
use fleetrent_persistence::PersistenceError;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The request conflicts with the current state of a resource.
    Conflict {
        /// The rule that blocked the request.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The request would not change anything.
    NotModified {
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::NotModified { message } => write!(f, "Not modified: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn conflict(rule: &str, message: String) -> ApiError {
    ApiError::Conflict {
        rule: rule.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidEmail(_) => invalid("email", message),
        DomainError::InvalidUserType(_) => invalid("user_type", message),
        DomainError::InvalidDailyRate(_) => invalid("rent_cost_per_day", message),
        DomainError::InvalidVehicleField { field, .. } => invalid(field, message),
        DomainError::InvalidAddress(_) => invalid("address", message),
        DomainError::InvalidRentalLength { .. } => invalid("length_in_days", message),
        DomainError::InvalidVehicleStatus(_) => invalid("status", message),
        DomainError::DateArithmeticOverflow { .. } => invalid("date", message),
        DomainError::InvalidStatusTransition { .. }
        | DomainError::AlreadyRented { .. }
        | DomainError::UnderMaintenance { .. }
        | DomainError::NotRented { .. } => conflict(state_rule(&err), message),
        DomainError::AlreadyAtLocation { .. } => ApiError::NotModified { message },
    }
}

/// Names the rule a vehicle-state refusal broke.
const fn state_rule(err: &DomainError) -> &'static str {
    match err {
        DomainError::AlreadyRented { .. } => "vehicle_rented",
        DomainError::UnderMaintenance { .. } => "vehicle_in_maintenance",
        DomainError::NotRented { .. } => "vehicle_not_rented",
        _ => "status_transition",
    }
}

/// Translates a core error into an API error.
///
/// Bad input becomes `InvalidInput` on the offending field, state refusals
/// become `Conflict`, and no-op commands become `NotModified`.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::InvalidInput(domain_err) => translate_domain_error(domain_err),
        CoreError::VehicleState(domain_err) => {
            let rule: &str = state_rule(&domain_err);
            conflict(rule, domain_err.to_string())
        }
        CoreError::Unchanged(domain_err) => ApiError::NotModified {
            message: domain_err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Errors the caller can act on keep their meaning; everything else is
/// reported as internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateEmail(email) => conflict(
            "unique_email",
            format!("An account with email '{email}' already exists"),
        ),
        PersistenceError::LocationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Location"),
            message: format!("Location {id} does not exist"),
        },
        PersistenceError::VehicleNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Vehicle"),
            message: format!("Vehicle {id} does not exist"),
        },
        PersistenceError::VehicleUnavailable { vehicle_id } => conflict(
            "vehicle_unavailable",
            format!("Vehicle {vehicle_id} changed state while the request was processed"),
        ),
        PersistenceError::RentalNotFound { vehicle_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Rental"),
            message: format!("Vehicle {vehicle_id} has no open rental"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
