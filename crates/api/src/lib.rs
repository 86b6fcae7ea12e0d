// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer.
//!
//! Validates requests, authenticates and authorizes actors, runs the core
//! transitions, and persists their results. Errors leave this crate as
//! [`ApiError`] values that map onto HTTP status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    add_vehicle_to_location, create_location, finish_maintenance, get_location, get_vehicle,
    list_location_vehicles, list_locations, list_my_rentals, login, logout, register_user,
    relocate_vehicle, rent_vehicle, return_vehicle, start_maintenance, vehicle_history,
    vehicle_info, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AddVehicleRequest, AddVehicleResponse, AuditEventInfo, CreateLocationRequest,
    CreateLocationResponse, ListLocationsResponse, ListRentalsResponse, ListVehiclesResponse,
    LocationInfo, LoginRequest, LoginResponse, MaintenanceResponse, RegisterRequest,
    RegisterResponse, RelocateVehicleRequest, RelocateVehicleResponse, RentVehicleRequest,
    RentVehicleResponse, RentalInfo, ReturnVehicleRequest, ReturnVehicleResponse,
    VehicleHistoryResponse, VehicleInfo, WhoAmIResponse,
};
