// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for location and vehicle management.

use crate::ApiError;
use crate::handlers::{
    add_vehicle_to_location, create_location, finish_maintenance, get_location, get_vehicle,
    list_location_vehicles, list_locations, relocate_vehicle, start_maintenance, vehicle_history,
};
use crate::request_response::{CreateLocationRequest, RelocateVehicleRequest};
use crate::tests::helpers::{Fixture, create_test_cause, create_vehicle_request};

#[test]
fn test_create_and_list_locations() {
    let mut f = Fixture::new();

    let listed = list_locations(&mut f.persistence).unwrap();
    assert_eq!(listed.locations.len(), 2);

    let fetched = get_location(&mut f.persistence, f.location_id).unwrap();
    assert_eq!(fetched.address, "1 Depot Road");
}

#[test]
fn test_customer_cannot_create_location() {
    let mut f = Fixture::new();

    let err = create_location(
        &mut f.persistence,
        &CreateLocationRequest {
            address: String::from("2 Depot Road"),
        },
        &f.customer,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(list_locations(&mut f.persistence).unwrap().locations.len(), 2);
}

#[test]
fn test_blank_address_is_invalid() {
    let mut f = Fixture::new();

    let err = create_location(
        &mut f.persistence,
        &CreateLocationRequest {
            address: String::from("   "),
        },
        &f.vendor,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "address"));
}

#[test]
fn test_missing_location_is_not_found() {
    let mut f = Fixture::new();

    assert!(matches!(
        get_location(&mut f.persistence, 9999),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        list_location_vehicles(&mut f.persistence, 9999, false),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_add_vehicle_reports_vehicle() {
    let mut f = Fixture::new();

    let response = add_vehicle_to_location(
        &mut f.persistence,
        f.other_location_id,
        &create_vehicle_request(),
        &f.vendor,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.vehicle.location_id, Some(f.other_location_id));
    assert_eq!(response.vehicle.status, "Available");
    assert_eq!(response.vehicle.rent_cost_per_day, "49.99");

    let fetched = get_vehicle(&mut f.persistence, response.vehicle.vehicle_id).unwrap();
    assert_eq!(fetched, response.vehicle);
}

#[test]
fn test_add_vehicle_rejects_bad_rate() {
    let mut f = Fixture::new();
    let mut request = create_vehicle_request();
    request.rent_cost_per_day = String::from("12.345");

    let err = add_vehicle_to_location(
        &mut f.persistence,
        f.location_id,
        &request,
        &f.vendor,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(
        matches!(err, ApiError::InvalidInput { ref field, .. } if field == "rent_cost_per_day")
    );
}

#[test]
fn test_add_vehicle_rejects_bad_year() {
    let mut f = Fixture::new();
    let mut request = create_vehicle_request();
    request.year = 1800;

    let err = add_vehicle_to_location(
        &mut f.persistence,
        f.location_id,
        &request,
        &f.vendor,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "year"));
}

#[test]
fn test_add_vehicle_to_missing_location() {
    let mut f = Fixture::new();

    let err = add_vehicle_to_location(
        &mut f.persistence,
        9999,
        &create_vehicle_request(),
        &f.vendor,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_get_missing_vehicle() {
    let mut f = Fixture::new();
    assert!(matches!(
        get_vehicle(&mut f.persistence, 9999),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_relocate_moves_vehicle() {
    let mut f = Fixture::new();

    let response = relocate_vehicle(
        &mut f.persistence,
        f.vehicle_id,
        &RelocateVehicleRequest {
            location_id: f.other_location_id,
        },
        &f.vendor,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.from_location_id, Some(f.location_id));
    assert!(
        list_location_vehicles(&mut f.persistence, f.location_id, false)
            .unwrap()
            .vehicles
            .is_empty()
    );
    assert_eq!(
        list_location_vehicles(&mut f.persistence, f.other_location_id, false)
            .unwrap()
            .vehicles
            .len(),
        1
    );
}

#[test]
fn test_relocate_to_current_location_is_not_modified() {
    let mut f = Fixture::new();

    let err = relocate_vehicle(
        &mut f.persistence,
        f.vehicle_id,
        &RelocateVehicleRequest {
            location_id: f.location_id,
        },
        &f.vendor,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::NotModified { .. }));
}

#[test]
fn test_relocate_to_missing_location() {
    let mut f = Fixture::new();

    let err = relocate_vehicle(
        &mut f.persistence,
        f.vehicle_id,
        &RelocateVehicleRequest { location_id: 9999 },
        &f.vendor,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_customer_cannot_relocate() {
    let mut f = Fixture::new();

    let err = relocate_vehicle(
        &mut f.persistence,
        f.vehicle_id,
        &RelocateVehicleRequest {
            location_id: f.other_location_id,
        },
        &f.customer,
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_maintenance_hides_vehicle_from_available_listing() {
    let mut f = Fixture::new();

    let started =
        start_maintenance(&mut f.persistence, f.vehicle_id, &f.vendor, create_test_cause())
            .unwrap();
    assert_eq!(started.status, "Maintenance");

    let available = list_location_vehicles(&mut f.persistence, f.location_id, true).unwrap();
    assert!(available.vehicles.is_empty());
    let all = list_location_vehicles(&mut f.persistence, f.location_id, false).unwrap();
    assert_eq!(all.vehicles.len(), 1);

    let finished =
        finish_maintenance(&mut f.persistence, f.vehicle_id, &f.vendor, create_test_cause())
            .unwrap();
    assert_eq!(finished.status, "Available");
}

#[test]
fn test_finish_maintenance_on_available_vehicle_conflicts() {
    let mut f = Fixture::new();

    let err = finish_maintenance(&mut f.persistence, f.vehicle_id, &f.vendor, create_test_cause())
        .unwrap_err();

    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_history_lists_events_in_order() {
    let mut f = Fixture::new();
    start_maintenance(&mut f.persistence, f.vehicle_id, &f.vendor, create_test_cause()).unwrap();

    let history = vehicle_history(&mut f.persistence, f.vehicle_id, &f.vendor).unwrap();

    let actions: Vec<&str> = history.events.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["CreateVehicle", "StartMaintenance"]);
    assert_eq!(history.events[1].actor_email, "vendor@fleet.test");
}

#[test]
fn test_customer_cannot_read_history() {
    let mut f = Fixture::new();

    let err = vehicle_history(&mut f.persistence, f.vehicle_id, &f.customer).unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}
