// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers are synchronous and take the persistence adapter by mutable
//! reference. Operations that depend on the current time take it as an
//! argument.

use fleetrent::{
    Command, LocationCreation, ReturnSettlement, TransitionResult, VehicleRegistration, apply,
    apply_location_creation, apply_vehicle_registration,
};
use fleetrent_audit::{AuditEvent, Cause};
use fleetrent_domain::{
    DailyRate, DomainError, Email, Location, RentalWindow, UserType, Vehicle, VehicleSpec,
    VehicleStatus, format_cents,
};
use fleetrent_persistence::{Persistence, RentOutcome, RentalData};
use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AddVehicleRequest, AddVehicleResponse, AuditEventInfo, CreateLocationRequest,
    CreateLocationResponse, ListLocationsResponse, ListRentalsResponse, ListVehiclesResponse,
    LocationInfo, LoginRequest, LoginResponse, MaintenanceResponse, RegisterRequest,
    RegisterResponse, RelocateVehicleRequest, RelocateVehicleResponse, RentVehicleRequest,
    RentVehicleResponse, RentalInfo, ReturnVehicleRequest, ReturnVehicleResponse,
    VehicleHistoryResponse, VehicleInfo, WhoAmIResponse,
};

fn format_instant(at: OffsetDateTime) -> Result<String, ApiError> {
    at.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format time: {e}"),
    })
}

fn vehicle_not_found(vehicle_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Vehicle"),
        message: format!("Vehicle {vehicle_id} does not exist"),
    }
}

fn location_not_found(location_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Location"),
        message: format!("Location {location_id} does not exist"),
    }
}

/// Loads a vehicle or fails with `ResourceNotFound`.
fn load_vehicle(persistence: &mut Persistence, vehicle_id: i64) -> Result<Vehicle, ApiError> {
    persistence
        .get_vehicle(vehicle_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| vehicle_not_found(vehicle_id))
}

fn ensure_location_exists(persistence: &mut Persistence, location_id: i64) -> Result<(), ApiError> {
    if persistence
        .location_exists(location_id)
        .map_err(translate_persistence_error)?
    {
        Ok(())
    } else {
        Err(location_not_found(location_id))
    }
}

/// Converts a domain vehicle into its API representation.
#[must_use]
pub fn vehicle_info(vehicle: &Vehicle) -> VehicleInfo {
    VehicleInfo {
        vehicle_id: vehicle.vehicle_id,
        location_id: vehicle.location_id,
        make: vehicle.spec.make.clone(),
        model: vehicle.spec.model.clone(),
        year: vehicle.spec.year,
        doors: vehicle.spec.doors,
        axles: vehicle.spec.axles,
        body_type: vehicle.spec.body_type.clone(),
        rent_cost_per_day: vehicle.spec.rent_cost_per_day.to_string(),
        color: vehicle.spec.color.clone(),
        status: vehicle.status.to_string(),
    }
}

fn location_info(location: &Location) -> Result<LocationInfo, ApiError> {
    let location_id: i64 = location.location_id().ok_or_else(|| ApiError::Internal {
        message: String::from("Stored location has no ID"),
    })?;
    Ok(LocationInfo {
        location_id,
        address: location.address().to_string(),
    })
}

// ============================================================================
// Accounts
// ============================================================================

/// Creates a new account.
///
/// # Errors
///
/// Returns an error if:
/// - the email or user type is malformed
/// - the password violates the password policy
/// - an account with the email already exists
pub fn register_user(
    persistence: &mut Persistence,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let email: Email = Email::parse(&request.email).map_err(translate_domain_error)?;
    let user_type: UserType = request
        .user_type
        .parse()
        .map_err(translate_domain_error)?;

    PasswordPolicy::default().validate(&request.password, email.as_str())?;

    let user_id: i64 = persistence
        .register_user(email.as_str(), &request.password, user_type)
        .map_err(translate_persistence_error)?;

    Ok(RegisterResponse {
        user_id,
        email: email.to_string(),
        user_type: user_type.to_string(),
        message: format!("Registered {user_type} account for {email}"),
    })
}

/// Logs in and opens a session lasting `session_ttl`.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for an unknown email or a wrong password.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_ttl: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor, expires_at): (String, AuthenticatedActor, OffsetDateTime) =
        AuthenticationService::login(persistence, &request.email, &request.password, session_ttl)?;

    Ok(LoginResponse {
        session_token,
        user_id: actor.user_id,
        email: actor.email.clone(),
        user_type: actor.to_audit_actor().user_type.to_string(),
        expires_at: format_instant(expires_at)?,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the signed-in user's identity.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor) -> WhoAmIResponse {
    WhoAmIResponse {
        user_id: actor.user_id,
        email: actor.email.clone(),
        user_type: actor.to_audit_actor().user_type.to_string(),
    }
}

// ============================================================================
// Locations
// ============================================================================

/// Lists all locations.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations(persistence: &mut Persistence) -> Result<ListLocationsResponse, ApiError> {
    let locations: Vec<Location> = persistence
        .list_locations()
        .map_err(translate_persistence_error)?;

    Ok(ListLocationsResponse {
        locations: locations
            .iter()
            .map(location_info)
            .collect::<Result<Vec<LocationInfo>, ApiError>>()?,
    })
}

/// Retrieves one location.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the location does not exist.
pub fn get_location(
    persistence: &mut Persistence,
    location_id: i64,
) -> Result<LocationInfo, ApiError> {
    let location: Location = persistence
        .get_location(location_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| location_not_found(location_id))?;
    location_info(&location)
}

/// Creates a location.
///
/// Only vendors may create locations.
///
/// # Errors
///
/// Returns an error if the actor is not a vendor or the address is invalid.
pub fn create_location(
    persistence: &mut Persistence,
    request: &CreateLocationRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<CreateLocationResponse, ApiError> {
    AuthorizationService::authorize_create_location(authenticated_actor)?;

    let creation: LocationCreation = apply_location_creation(
        &request.address,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let (location_id, event_id): (i64, i64) = persistence
        .create_location(&creation)
        .map_err(translate_persistence_error)?;

    Ok(CreateLocationResponse {
        location_id,
        address: creation.location.address().to_string(),
        event_id,
        message: format!("Created location {location_id}"),
    })
}

/// Lists the vehicles parked at a location.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the location does not exist.
pub fn list_location_vehicles(
    persistence: &mut Persistence,
    location_id: i64,
    available_only: bool,
) -> Result<ListVehiclesResponse, ApiError> {
    ensure_location_exists(persistence, location_id)?;

    let vehicles: Vec<Vehicle> = persistence
        .get_location_vehicles(location_id, available_only)
        .map_err(translate_persistence_error)?;
    debug!(location_id, count = vehicles.len(), "Listed location vehicles");

    Ok(ListVehiclesResponse {
        location_id,
        vehicles: vehicles.iter().map(vehicle_info).collect(),
    })
}

/// Adds a vehicle to a location.
///
/// Only vendors may add vehicles.
///
/// # Errors
///
/// Returns an error if:
/// - the actor is not a vendor
/// - a vehicle field or the daily rate is invalid
/// - the location does not exist
pub fn add_vehicle_to_location(
    persistence: &mut Persistence,
    location_id: i64,
    request: &AddVehicleRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AddVehicleResponse, ApiError> {
    AuthorizationService::authorize_add_vehicle(authenticated_actor)?;

    let rent_cost_per_day: DailyRate = request
        .rent_cost_per_day
        .parse()
        .map_err(translate_domain_error)?;
    let spec: VehicleSpec = VehicleSpec {
        make: request.make.trim().to_string(),
        model: request.model.trim().to_string(),
        year: request.year,
        doors: request.doors,
        axles: request.axles,
        body_type: request.body_type.trim().to_string(),
        rent_cost_per_day,
        color: request.color.trim().to_string(),
    };

    let registration: VehicleRegistration = apply_vehicle_registration(
        location_id,
        spec,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let (vehicle_id, event_id): (i64, i64) = persistence
        .new_vehicle(&registration)
        .map_err(translate_persistence_error)?;

    let vehicle: Vehicle = Vehicle {
        vehicle_id,
        location_id: Some(location_id),
        spec: registration.spec,
        status: VehicleStatus::Available,
    };

    Ok(AddVehicleResponse {
        vehicle: vehicle_info(&vehicle),
        event_id,
        message: format!("Added vehicle {vehicle_id} to location {location_id}"),
    })
}

// ============================================================================
// Vehicles
// ============================================================================

/// Retrieves one vehicle. Requires no session.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the vehicle does not exist.
pub fn get_vehicle(
    persistence: &mut Persistence,
    vehicle_id: i64,
) -> Result<VehicleInfo, ApiError> {
    let vehicle: Vehicle = load_vehicle(persistence, vehicle_id)?;
    Ok(vehicle_info(&vehicle))
}

/// Rents a vehicle to the signed-in user, starting at `at`.
///
/// # Errors
///
/// Returns an error if:
/// - the vehicle does not exist (404)
/// - the rental length is out of range (400)
/// - the vehicle is rented or under maintenance, including when another
///   request rents it first (409)
pub fn rent_vehicle(
    persistence: &mut Persistence,
    vehicle_id: i64,
    request: &RentVehicleRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    at: OffsetDateTime,
) -> Result<RentVehicleResponse, ApiError> {
    let vehicle: Vehicle = load_vehicle(persistence, vehicle_id)?;
    let window: RentalWindow =
        RentalWindow::new(at, request.length_in_days).map_err(translate_domain_error)?;

    let result: TransitionResult = apply(
        &vehicle,
        Command::Rent {
            renter_id: authenticated_actor.user_id,
            window,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let outcome: RentOutcome = persistence
        .rent_vehicle(
            vehicle_id,
            authenticated_actor.user_id,
            &window,
            &result.audit_event,
        )
        .map_err(translate_persistence_error)?;

    info!(
        vehicle_id,
        user_id = authenticated_actor.user_id,
        rental_id = outcome.rental_id,
        "Vehicle rented"
    );

    Ok(RentVehicleResponse {
        rental_id: outcome.rental_id,
        vehicle_id,
        start_date: format_instant(window.start())?,
        length_days: window.length_days(),
        due_at: format_instant(window.due_at())?,
        base_cost: format_cents(window.base_cost(vehicle.spec.rent_cost_per_day)),
        event_id: outcome.event_id,
    })
}

/// Returns a rented vehicle to a location at `at`.
///
/// The renter may return their own vehicle; vendors may return any.
///
/// # Errors
///
/// Returns an error if:
/// - the vehicle or location does not exist (404)
/// - the vehicle is not rented (409)
/// - the actor is neither the renter nor a vendor (403)
pub fn return_vehicle(
    persistence: &mut Persistence,
    vehicle_id: i64,
    request: &ReturnVehicleRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    at: OffsetDateTime,
) -> Result<ReturnVehicleResponse, ApiError> {
    let vehicle: Vehicle = load_vehicle(persistence, vehicle_id)?;
    let location_id: i64 = request.location_id;

    let rental: RentalData = match persistence
        .get_active_rental(vehicle_id)
        .map_err(translate_persistence_error)?
    {
        Some(rental) => rental,
        None if !vehicle.is_rented() => {
            return Err(translate_domain_error(DomainError::NotRented { vehicle_id }));
        }
        None => {
            return Err(ApiError::Internal {
                message: format!("Vehicle {vehicle_id} is rented but has no open rental"),
            });
        }
    };

    AuthorizationService::authorize_return_vehicle(authenticated_actor, rental.renter_user_id)?;
    ensure_location_exists(persistence, location_id)?;

    let window: RentalWindow = rental.window().map_err(translate_domain_error)?;
    let result: TransitionResult = apply(
        &vehicle,
        Command::Return {
            location_id,
            at,
            window,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    let settlement: ReturnSettlement = result.settlement.ok_or_else(|| ApiError::Internal {
        message: String::from("Return produced no settlement"),
    })?;

    let event_id: i64 = persistence
        .return_vehicle(
            vehicle_id,
            location_id,
            at,
            settlement.late_fee_cents,
            &result.audit_event,
        )
        .map_err(translate_persistence_error)?;

    info!(
        vehicle_id,
        location_id,
        late = settlement.late,
        days_late = settlement.days_late,
        "Vehicle returned"
    );

    Ok(ReturnVehicleResponse {
        vehicle_id,
        location_id,
        returned_at: format_instant(at)?,
        late: settlement.late,
        days_late: settlement.days_late,
        base_cost: format_cents(settlement.base_cost_cents),
        late_fee: format_cents(settlement.late_fee_cents),
        total_cost: format_cents(settlement.total_cost_cents),
        event_id,
    })
}

/// Moves a parked vehicle to another location.
///
/// Only vendors may relocate vehicles.
///
/// # Errors
///
/// Returns an error if:
/// - the actor is not a vendor (403)
/// - the vehicle does not exist (404)
/// - the vehicle is already at the location (304)
/// - the vehicle is rented (409)
/// - the location does not exist (404)
pub fn relocate_vehicle(
    persistence: &mut Persistence,
    vehicle_id: i64,
    request: &RelocateVehicleRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RelocateVehicleResponse, ApiError> {
    AuthorizationService::authorize_relocate_vehicle(authenticated_actor)?;

    let vehicle: Vehicle = load_vehicle(persistence, vehicle_id)?;
    let location_id: i64 = request.location_id;

    let result: TransitionResult = apply(
        &vehicle,
        Command::Relocate { location_id },
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    ensure_location_exists(persistence, location_id)?;

    let event_id: i64 = persistence
        .relocate_vehicle(vehicle_id, location_id, &result.audit_event)
        .map_err(translate_persistence_error)?;

    Ok(RelocateVehicleResponse {
        vehicle_id,
        from_location_id: vehicle.location_id,
        location_id,
        event_id,
    })
}

fn change_maintenance(
    persistence: &mut Persistence,
    vehicle_id: i64,
    command: Command,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MaintenanceResponse, ApiError> {
    AuthorizationService::authorize_maintenance(authenticated_actor)?;

    let vehicle: Vehicle = load_vehicle(persistence, vehicle_id)?;
    let result: TransitionResult = apply(
        &vehicle,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let event_id: i64 = persistence
        .set_vehicle_status(
            vehicle_id,
            vehicle.status,
            result.new_vehicle.status,
            &result.audit_event,
        )
        .map_err(translate_persistence_error)?;

    Ok(MaintenanceResponse {
        vehicle_id,
        status: result.new_vehicle.status.to_string(),
        event_id,
    })
}

/// Takes an available vehicle out of service.
///
/// # Errors
///
/// Returns an error if the actor is not a vendor, the vehicle does not
/// exist, or the vehicle is not available.
pub fn start_maintenance(
    persistence: &mut Persistence,
    vehicle_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MaintenanceResponse, ApiError> {
    change_maintenance(
        persistence,
        vehicle_id,
        Command::StartMaintenance,
        authenticated_actor,
        cause,
    )
}

/// Puts a vehicle under maintenance back into service.
///
/// # Errors
///
/// Returns an error if the actor is not a vendor, the vehicle does not
/// exist, or the vehicle is not under maintenance.
pub fn finish_maintenance(
    persistence: &mut Persistence,
    vehicle_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MaintenanceResponse, ApiError> {
    change_maintenance(
        persistence,
        vehicle_id,
        Command::FinishMaintenance,
        authenticated_actor,
        cause,
    )
}

// ============================================================================
// History
// ============================================================================

/// Lists every rental the signed-in user has made.
///
/// # Errors
///
/// Returns an error if the query fails or a stored rental is malformed.
pub fn list_my_rentals(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListRentalsResponse, ApiError> {
    let rentals: Vec<RentalData> = persistence
        .list_rentals_for_user(authenticated_actor.user_id)
        .map_err(translate_persistence_error)?;

    let mut infos: Vec<RentalInfo> = Vec::with_capacity(rentals.len());
    for rental in rentals {
        let window: RentalWindow = rental.window().map_err(translate_domain_error)?;
        infos.push(RentalInfo {
            rental_id: rental.rental_id,
            vehicle_id: rental.vehicle_id,
            start_date: format_instant(window.start())?,
            length_days: window.length_days(),
            due_at: format_instant(window.due_at())?,
            returned_at: rental.returned_at.map(format_instant).transpose()?,
            late_fee: rental.late_fee_cents.map(format_cents),
        });
    }

    Ok(ListRentalsResponse { rentals: infos })
}

/// Returns a vehicle's audit trail, oldest first.
///
/// Only vendors may read vehicle history.
///
/// # Errors
///
/// Returns an error if the actor is not a vendor or the vehicle does not exist.
pub fn vehicle_history(
    persistence: &mut Persistence,
    vehicle_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<VehicleHistoryResponse, ApiError> {
    AuthorizationService::authorize_view_history(authenticated_actor)?;
    load_vehicle(persistence, vehicle_id)?;

    let events: Vec<AuditEvent> = persistence
        .list_vehicle_audit_events(vehicle_id)
        .map_err(translate_persistence_error)?;

    Ok(VehicleHistoryResponse {
        vehicle_id,
        events: events
            .into_iter()
            .map(|event| AuditEventInfo {
                event_id: event.event_id.unwrap_or_default(),
                actor_user_id: event.actor.user_id,
                actor_email: event.actor.email,
                action: event.action.name,
                details: event.action.details,
                before: event.before.data,
                after: event.after.data,
            })
            .collect(),
    })
}
