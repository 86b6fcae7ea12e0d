// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fleetrent_audit::Cause;
use fleetrent_domain::UserType;
use fleetrent_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::auth::{AuthenticatedActor, Role};
use crate::handlers::{add_vehicle_to_location, create_location};
use crate::request_response::{AddVehicleRequest, CreateLocationRequest};

pub const TEST_PASSWORD: &str = "correct-horse";

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// The instant test rentals start at.
pub const fn rental_start() -> OffsetDateTime {
    datetime!(2026-03-10 12:00 UTC)
}

/// Registers an account and returns its actor.
pub fn register_actor(
    persistence: &mut Persistence,
    email: &str,
    user_type: UserType,
) -> AuthenticatedActor {
    let user_id: i64 = persistence
        .register_user(email, TEST_PASSWORD, user_type)
        .unwrap();
    AuthenticatedActor::new(user_id, email.to_string(), Role::from(user_type))
}

pub fn create_vehicle_request() -> AddVehicleRequest {
    AddVehicleRequest {
        make: String::from("Toyota"),
        model: String::from("Corolla"),
        year: 2022,
        doors: 4,
        axles: 2,
        body_type: String::from("Sedan"),
        rent_cost_per_day: String::from("49.99"),
        color: String::from("Blue"),
    }
}

/// A database with one vendor, one customer, two locations, and one
/// available vehicle parked at the first location.
pub struct Fixture {
    pub persistence: Persistence,
    pub vendor: AuthenticatedActor,
    pub customer: AuthenticatedActor,
    pub location_id: i64,
    pub other_location_id: i64,
    pub vehicle_id: i64,
}

impl Fixture {
    pub fn new() -> Self {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
        let vendor: AuthenticatedActor =
            register_actor(&mut persistence, "vendor@fleet.test", UserType::Vendor);
        let customer: AuthenticatedActor =
            register_actor(&mut persistence, "customer@fleet.test", UserType::Customer);

        let location_id: i64 = create_location(
            &mut persistence,
            &CreateLocationRequest {
                address: String::from("1 Depot Road"),
            },
            &vendor,
            create_test_cause(),
        )
        .unwrap()
        .location_id;
        let other_location_id: i64 = create_location(
            &mut persistence,
            &CreateLocationRequest {
                address: String::from("99 Harbour Street"),
            },
            &vendor,
            create_test_cause(),
        )
        .unwrap()
        .location_id;

        let vehicle_id: i64 = add_vehicle_to_location(
            &mut persistence,
            location_id,
            &create_vehicle_request(),
            &vendor,
            create_test_cause(),
        )
        .unwrap()
        .vehicle
        .vehicle_id;

        Self {
            persistence,
            vendor,
            customer,
            location_id,
            other_location_id,
            vehicle_id,
        }
    }
}
