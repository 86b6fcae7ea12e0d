// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod rental;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use rental::{MAX_RENTAL_DAYS, RentalWindow};
pub use types::{
    DailyRate, Email, Location, UserType, Vehicle, VehicleSpec, VehicleStatus, format_cents,
};
pub use validation::{validate_address, validate_vehicle_spec};
