// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use fleetrent_audit::Actor;
use fleetrent_domain::{Email, UserType};
use fleetrent_persistence::{Persistence, PersistenceError, SessionData, UserData, verify_password};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Roles for authorization.
///
/// A role is derived from the account's user type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May rent and return vehicles.
    Customer,
    /// May additionally manage locations and the fleet.
    Vendor,
}

impl From<UserType> for Role {
    fn from(user_type: UserType) -> Self {
        match user_type {
            UserType::Customer => Self::Customer,
            UserType::Vendor => Self::Vendor,
        }
    }
}

impl Role {
    const fn user_type(self) -> UserType {
        match self {
            Self::Customer => UserType::Customer,
            Self::Vendor => UserType::Vendor,
        }
    }
}

/// A signed-in user with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user's canonical ID.
    pub user_id: i64,
    /// The user's normalized email.
    pub email: String,
    /// The role assigned to this user.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    /// Builds the actor for a stored user.
    #[must_use]
    pub fn from_user(user: &UserData) -> Self {
        Self::new(user.user_id, user.email.clone(), Role::from(user.user_type))
    }

    /// Converts this actor into the audit actor recorded on events.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id, self.email.clone(), self.role.user_type())
    }

    /// Returns whether this actor is a vendor.
    #[must_use]
    pub fn is_vendor(&self) -> bool {
        self.role == Role::Vendor
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_vendor(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.is_vendor() {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("Vendor"),
        })
    }

    /// Checks if an actor may create a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a vendor.
    pub fn authorize_create_location(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_vendor(actor, "create_location")
    }

    /// Checks if an actor may add a vehicle to the fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a vendor.
    pub fn authorize_add_vehicle(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_vendor(actor, "add_vehicle")
    }

    /// Checks if an actor may move a vehicle between locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a vendor.
    pub fn authorize_relocate_vehicle(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_vendor(actor, "relocate_vehicle")
    }

    /// Checks if an actor may take vehicles in and out of service.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a vendor.
    pub fn authorize_maintenance(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_vendor(actor, "vehicle_maintenance")
    }

    /// Checks if an actor may read a vehicle's audit trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a vendor.
    pub fn authorize_view_history(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_vendor(actor, "vehicle_history")
    }

    /// Checks if an actor may return a vehicle rented by `renter_user_id`.
    ///
    /// The renter may return their own vehicle; vendors may return any.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is neither the renter nor a vendor.
    pub fn authorize_return_vehicle(
        actor: &AuthenticatedActor,
        renter_user_id: i64,
    ) -> Result<(), AuthError> {
        if actor.user_id == renter_user_id {
            return Ok(());
        }
        Self::require_vendor(actor, "return_vehicle")
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Verifies credentials and opens a session.
    ///
    /// Unknown emails and wrong passwords fail with the same reason so
    /// callers cannot discover which accounts exist.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are invalid, the session
    /// lifetime overflows the calendar, or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        session_ttl: Duration,
    ) -> Result<(String, AuthenticatedActor, OffsetDateTime), AuthError> {
        let invalid_credentials = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let Ok(email) = Email::parse(email) else {
            return Err(invalid_credentials());
        };

        let user: UserData = persistence
            .get_user_by_email(email.as_str())
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(email = %email, "Login attempt for unknown email");
                invalid_credentials()
            })?;

        let password_ok: bool = verify_password(password, &user.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_ok {
            warn!(user_id = user.user_id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let expires_at: OffsetDateTime = OffsetDateTime::now_utc()
            .checked_add(session_ttl)
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Session lifetime of {session_ttl} is out of range"),
            })?;
        let session_token: String = Self::generate_session_token();

        persistence
            .create_session(&session_token, user.user_id, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        info!(user_id = user.user_id, "User logged in");
        Ok((session_token, AuthenticatedActor::from_user(&user), expires_at))
    }

    /// Validates a session token and returns the signed-in user.
    ///
    /// Expired sessions are deleted when they are presented.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the user
    /// no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if OffsetDateTime::now_utc() > session.expires_at {
            debug!(session_id = session.session_id, "Rejecting expired session");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((AuthenticatedActor::from_user(&user), user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!(
            "session_{timestamp}_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
