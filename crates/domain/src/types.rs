// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of an email address (matches the `users.email` column).
const MAX_EMAIL_LENGTH: usize = 100;

/// Largest representable daily rate in cents (`numeric(8,2)`).
const MAX_RATE_CENTS: i64 = 99_999_999;

/// The kind of account a user holds.
///
/// Vendors manage locations and the fleet. Customers rent vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserType {
    /// A renting customer.
    #[default]
    Customer,
    /// A fleet operator.
    Vendor,
}

impl UserType {
    /// Converts this user type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Vendor => "Vendor",
        }
    }
}

impl FromStr for UserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            _ => Err(DomainError::InvalidUserType(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized email address.
///
/// Emails are trimmed and lowercased on construction so that lookups
/// and uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty, too long, contains
    /// whitespace, or does not have the shape `local@domain.tld`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized: String = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::InvalidEmail(String::from(
                "Email cannot be empty",
            )));
        }

        if normalized.chars().count() > MAX_EMAIL_LENGTH {
            return Err(DomainError::InvalidEmail(format!(
                "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
            )));
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidEmail(String::from(
                "Email cannot contain whitespace",
            )));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(DomainError::InvalidEmail(String::from(
                "Email must contain '@'",
            )));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(DomainError::InvalidEmail(String::from(
                "Email must have exactly one '@' and a non-empty local part",
            )));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(DomainError::InvalidEmail(String::from(
                "Email domain must contain a '.'",
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A per-day rental price held in integer cents.
///
/// Serialized as a decimal string such as `"49.99"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DailyRate {
    cents: i64,
}

impl DailyRate {
    /// Creates a rate from a cent amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or exceeds `999999.99`.
    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::InvalidDailyRate(String::from(
                "Rate cannot be negative",
            )));
        }
        if cents > MAX_RATE_CENTS {
            return Err(DomainError::InvalidDailyRate(String::from(
                "Rate cannot exceed 999999.99",
            )));
        }
        Ok(Self { cents })
    }

    /// Returns the rate in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the price of `days` days at this rate, in cents.
    #[must_use]
    pub const fn cost_for_days(&self, days: i64) -> i64 {
        self.cents.saturating_mul(days)
    }
}

impl FromStr for DailyRate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let (whole, frac): (&str, &str) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidDailyRate(format!(
                "'{s}' is not a non-negative decimal amount"
            )));
        }
        if trimmed.contains('.') && (frac.is_empty() || frac.len() > 2) {
            return Err(DomainError::InvalidDailyRate(format!(
                "'{s}' must have one or two digits after the decimal point"
            )));
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidDailyRate(format!(
                "'{s}' is not a non-negative decimal amount"
            )));
        }
        if whole.trim_start_matches('0').len() > 6 {
            return Err(DomainError::InvalidDailyRate(String::from(
                "Rate cannot exceed 999999.99",
            )));
        }

        let whole_cents: i64 = whole
            .parse::<i64>()
            .map_err(|e| DomainError::InvalidDailyRate(e.to_string()))?
            * 100;
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => {
                frac.parse::<i64>()
                    .map_err(|e| DomainError::InvalidDailyRate(e.to_string()))?
                    * 10
            }
            _ => frac
                .parse::<i64>()
                .map_err(|e| DomainError::InvalidDailyRate(e.to_string()))?,
        };

        Self::from_cents(whole_cents + frac_cents)
    }
}

impl TryFrom<String> for DailyRate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DailyRate> for String {
    fn from(rate: DailyRate) -> Self {
        rate.to_string()
    }
}

impl std::fmt::Display for DailyRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_cents(self.cents))
    }
}

/// Formats a cent amount as a two-decimal string.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign: &str = if cents < 0 { "-" } else { "" };
    let abs: u64 = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// The operational state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VehicleStatus {
    /// Parked at a location and available to rent.
    #[default]
    Available,
    /// Out with a renter.
    Rented,
    /// Out of service.
    Maintenance,
}

impl VehicleStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Rented => "Rented",
            Self::Maintenance => "Maintenance",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Available → Rented
    /// - Rented → Available
    /// - Available → Maintenance
    /// - Maintenance → Available
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Available, Self::Rented | Self::Maintenance)
                | (Self::Rented | Self::Maintenance, Self::Available)
        )
    }

    /// Returns whether the vehicle is out with a renter.
    #[must_use]
    pub const fn is_rented(&self) -> bool {
        matches!(self, Self::Rented)
    }
}

impl FromStr for VehicleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Rented" => Ok(Self::Rented),
            "Maintenance" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidVehicleStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The descriptive attributes of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub make: String,
    pub model: String,
    pub year: i16,
    pub doors: i16,
    pub axles: i16,
    pub body_type: String,
    pub rent_cost_per_day: DailyRate,
    pub color: String,
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// The canonical numeric identifier.
    pub vehicle_id: i64,
    /// The location the vehicle is parked at, or `None` while on the road.
    pub location_id: Option<i64>,
    /// Descriptive attributes.
    pub spec: VehicleSpec,
    /// Current operational state.
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Returns whether the vehicle is currently rented.
    #[must_use]
    pub const fn is_rented(&self) -> bool {
        self.status.is_rented()
    }
}

/// A rental location.
///
/// A location has a canonical numeric ID once persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// `None` indicates the location has not been persisted yet.
    location_id: Option<i64>,
    address: String,
}

// Two locations are equal if they have the same address, regardless of IDs.
impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Location {}

impl Location {
    /// Creates a new `Location` without a persisted ID.
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            location_id: None,
            address: address.trim().to_string(),
        }
    }

    /// Creates a `Location` with an existing persisted ID.
    #[must_use]
    pub fn with_id(location_id: i64, address: &str) -> Self {
        Self {
            location_id: Some(location_id),
            address: address.trim().to_string(),
        }
    }

    /// Returns the persisted identifier, if any.
    #[must_use]
    pub const fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    /// Returns the street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}
