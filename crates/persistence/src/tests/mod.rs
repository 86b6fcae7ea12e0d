// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod audit_tests;
mod rental_tests;

use fleetrent::{
    LocationCreation, VehicleRegistration, apply_location_creation, apply_vehicle_registration,
};
use fleetrent_audit::{Actor, Cause};
use fleetrent_domain::{DailyRate, RentalWindow, UserType, VehicleSpec};
use time::macros::datetime;

use crate::Persistence;

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_spec() -> VehicleSpec {
    VehicleSpec {
        make: String::from("Toyota"),
        model: String::from("Corolla"),
        year: 2022,
        doors: 4,
        axles: 2,
        body_type: String::from("Sedan"),
        rent_cost_per_day: DailyRate::from_cents(4999).unwrap(),
        color: String::from("Blue"),
    }
}

pub fn create_test_window() -> RentalWindow {
    RentalWindow::new(datetime!(2026-03-10 12:00 UTC), 2).unwrap()
}

/// Registers a user and returns the audit actor for it.
pub fn register_actor(persistence: &mut Persistence, email: &str, user_type: UserType) -> Actor {
    let user_id: i64 = persistence
        .register_user(email, "correct-horse", user_type)
        .unwrap();
    Actor::new(user_id, email.to_string(), user_type)
}

/// Opens a fresh database with one vendor account.
pub fn setup_with_vendor() -> (Persistence, Actor) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let vendor: Actor = register_actor(&mut persistence, "vendor@example.com", UserType::Vendor);
    (persistence, vendor)
}

pub fn seed_location(persistence: &mut Persistence, actor: &Actor, address: &str) -> i64 {
    let creation: LocationCreation =
        apply_location_creation(address, actor.clone(), create_test_cause()).unwrap();
    persistence.create_location(&creation).unwrap().0
}

pub fn seed_vehicle(persistence: &mut Persistence, actor: &Actor, location_id: i64) -> i64 {
    let registration: VehicleRegistration = apply_vehicle_registration(
        location_id,
        create_test_spec(),
        actor.clone(),
        create_test_cause(),
    )
    .unwrap();
    persistence.new_vehicle(&registration).unwrap().0
}
