// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Money is rendered as two-decimal strings and instants as ISO 8601
//! strings in UTC. Request fields also accept their camelCase names.

use serde::{Deserialize, Deserializer, Serialize};

/// A daily rate as sent by clients: a decimal string or a JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RateField {
    Text(String),
    Whole(u64),
    Fractional(f64),
}

/// Reads a rate field into its decimal text form for `DailyRate` parsing.
fn rate_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RateField::deserialize(deserializer)? {
        RateField::Text(text) => text,
        RateField::Whole(whole) => whole.to_string(),
        RateField::Fractional(value) => value.to_string(),
    })
}

fn default_user_type() -> String {
    String::from("Customer")
}

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The account email.
    pub email: String,
    /// The plain-text password.
    pub password: String,
    /// `Customer` or `Vendor`. Accounts default to `Customer`.
    #[serde(default = "default_user_type", alias = "userType")]
    pub user_type: String,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The canonical user ID.
    pub user_id: i64,
    /// The normalized email.
    pub email: String,
    /// The account type.
    pub user_type: String,
    /// A success message.
    pub message: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque).
    pub session_token: String,
    /// The user's canonical ID.
    pub user_id: i64,
    /// The user's normalized email.
    pub email: String,
    /// The account type.
    pub user_type: String,
    /// Session expiration timestamp (ISO 8601).
    pub expires_at: String,
}

/// API response for the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: i64,
    pub email: String,
    pub user_type: String,
}

/// Location information for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub location_id: i64,
    pub address: String,
}

/// API response listing all locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLocationsResponse {
    pub locations: Vec<LocationInfo>,
}

/// API request to create a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocationRequest {
    /// The street address.
    pub address: String,
}

/// API response for a successful location creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocationResponse {
    /// The canonical location ID.
    pub location_id: i64,
    /// The stored address.
    pub address: String,
    /// The audit event recording the creation.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// Vehicle information as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub vehicle_id: i64,
    /// `None` while the vehicle is rented.
    pub location_id: Option<i64>,
    pub make: String,
    pub model: String,
    pub year: i16,
    pub doors: i16,
    pub axles: i16,
    pub body_type: String,
    /// Daily rate, e.g. `"49.99"`.
    pub rent_cost_per_day: String,
    pub color: String,
    /// `Available`, `Rented`, or `Maintenance`.
    pub status: String,
}

/// API response listing the vehicles at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListVehiclesResponse {
    pub location_id: i64,
    pub vehicles: Vec<VehicleInfo>,
}

/// API request to add a vehicle to a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i16,
    pub doors: i16,
    pub axles: i16,
    #[serde(alias = "bodyType")]
    pub body_type: String,
    /// Daily rate as a decimal string such as `"49.99"`, or a number.
    #[serde(alias = "rentCostPerDay", deserialize_with = "rate_as_text")]
    pub rent_cost_per_day: String,
    pub color: String,
}

/// API response for a successful vehicle addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVehicleResponse {
    /// The stored vehicle.
    pub vehicle: VehicleInfo,
    /// The audit event recording the addition.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to rent a vehicle starting now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentVehicleRequest {
    /// Number of days booked.
    #[serde(alias = "lengthInDays")]
    pub length_in_days: i64,
}

/// API response for a successful rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentVehicleResponse {
    pub rental_id: i64,
    pub vehicle_id: i64,
    /// Rental start (ISO 8601).
    pub start_date: String,
    pub length_days: i64,
    /// When the vehicle is due back (ISO 8601).
    pub due_at: String,
    /// Price of the booked days.
    pub base_cost: String,
    pub event_id: i64,
}

/// API request to return a rented vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnVehicleRequest {
    /// Where the vehicle is dropped off.
    #[serde(alias = "location")]
    pub location_id: i64,
}

/// API response for a successful return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnVehicleResponse {
    pub vehicle_id: i64,
    pub location_id: i64,
    /// Return time (ISO 8601).
    pub returned_at: String,
    pub late: bool,
    pub days_late: i64,
    pub base_cost: String,
    pub late_fee: String,
    pub total_cost: String,
    pub event_id: i64,
}

/// API request to move a vehicle to another location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocateVehicleRequest {
    #[serde(alias = "location")]
    pub location_id: i64,
}

/// API response for a successful relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocateVehicleResponse {
    pub vehicle_id: i64,
    pub from_location_id: Option<i64>,
    pub location_id: i64,
    pub event_id: i64,
}

/// API response for a maintenance status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceResponse {
    pub vehicle_id: i64,
    /// The new status.
    pub status: String,
    pub event_id: i64,
}

/// A rental as shown to the renter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalInfo {
    pub rental_id: i64,
    pub vehicle_id: i64,
    pub start_date: String,
    pub length_days: i64,
    pub due_at: String,
    /// `None` while the rental is open.
    pub returned_at: Option<String>,
    /// `None` while the rental is open.
    pub late_fee: Option<String>,
}

/// API response listing the caller's rentals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRentalsResponse {
    pub rentals: Vec<RentalInfo>,
}

/// One entry of a vehicle's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    pub event_id: i64,
    pub actor_user_id: i64,
    pub actor_email: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
}

/// API response with a vehicle's audit trail, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleHistoryResponse {
    pub vehicle_id: i64,
    pub events: Vec<AuditEventInfo>,
}
