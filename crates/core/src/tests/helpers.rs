// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent_audit::{Actor, Cause};
use fleetrent_domain::{DailyRate, RentalWindow, UserType, Vehicle, VehicleSpec, VehicleStatus};
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(1, String::from("vendor@example.com"), UserType::Vendor)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("API request"))
}

pub fn create_test_spec() -> VehicleSpec {
    VehicleSpec {
        make: String::from("Ford"),
        model: String::from("Transit"),
        year: 2021,
        doors: 4,
        axles: 2,
        body_type: String::from("Van"),
        rent_cost_per_day: DailyRate::from_cents(8000).unwrap(),
        color: String::from("White"),
    }
}

pub fn create_test_vehicle(status: VehicleStatus, location_id: Option<i64>) -> Vehicle {
    Vehicle {
        vehicle_id: 10,
        location_id,
        spec: create_test_spec(),
        status,
    }
}

pub fn create_test_window() -> RentalWindow {
    RentalWindow::new(datetime!(2026-05-01 09:00 UTC), 3).unwrap()
}
