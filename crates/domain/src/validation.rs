// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::VehicleSpec;

/// Maximum length of a location address.
const MAX_ADDRESS_LENGTH: usize = 255;

/// Checks that a text field is non-empty and within the column width.
fn validate_text_field(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidVehicleField {
            field,
            reason: String::from("cannot be empty"),
        });
    }
    if value.chars().count() > max_len {
        return Err(DomainError::InvalidVehicleField {
            field,
            reason: format!("cannot exceed {max_len} characters"),
        });
    }
    Ok(())
}

/// Checks that a numeric field falls within an inclusive range.
fn validate_range(
    field: &'static str,
    value: i16,
    range: std::ops::RangeInclusive<i16>,
) -> Result<(), DomainError> {
    if !range.contains(&value) {
        return Err(DomainError::InvalidVehicleField {
            field,
            reason: format!(
                "must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        });
    }
    Ok(())
}

/// Validates that a vehicle's descriptive fields are well formed.
///
/// Text widths mirror the `vehicle` table columns.
///
/// # Errors
///
/// Returns an error if:
/// - make, model, or body type is empty or longer than 30 characters
/// - color is empty or longer than 20 characters
/// - year is not between 1886 and 2100
/// - doors is not between 0 and 10
/// - axles is not between 1 and 10
pub fn validate_vehicle_spec(spec: &VehicleSpec) -> Result<(), DomainError> {
    validate_text_field("make", &spec.make, 30)?;
    validate_text_field("model", &spec.model, 30)?;
    validate_text_field("body_type", &spec.body_type, 30)?;
    validate_text_field("color", &spec.color, 20)?;
    validate_range("year", spec.year, 1886..=2100)?;
    validate_range("doors", spec.doors, 0..=10)?;
    validate_range("axles", spec.axles, 1..=10)?;
    Ok(())
}

/// Validates a location address.
///
/// # Errors
///
/// Returns an error if the address is blank or longer than 255 characters.
pub fn validate_address(address: &str) -> Result<(), DomainError> {
    if address.trim().is_empty() {
        return Err(DomainError::InvalidAddress(String::from(
            "Address cannot be empty",
        )));
    }
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(DomainError::InvalidAddress(format!(
            "Address cannot exceed {MAX_ADDRESS_LENGTH} characters"
        )));
    }
    Ok(())
}
