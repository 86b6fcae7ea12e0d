// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent::{Command, TransitionResult, apply};
use fleetrent_audit::Actor;
use fleetrent_domain::{RentalWindow, UserType, VehicleStatus};
use time::macros::datetime;

use super::{
    create_test_cause, create_test_window, register_actor, seed_location, seed_vehicle,
    setup_with_vendor,
};
use crate::{Persistence, PersistenceError};

struct Fixture {
    persistence: Persistence,
    customer: Actor,
    location_id: i64,
    vehicle_id: i64,
}

fn fixture() -> Fixture {
    let (mut persistence, vendor) = setup_with_vendor();
    let customer = register_actor(&mut persistence, "renter@example.com", UserType::Customer);
    let location_id = seed_location(&mut persistence, &vendor, "1 Main St");
    let vehicle_id = seed_vehicle(&mut persistence, &vendor, location_id);
    Fixture {
        persistence,
        customer,
        location_id,
        vehicle_id,
    }
}

fn rent(fx: &mut Fixture, window: RentalWindow) -> Result<crate::RentOutcome, PersistenceError> {
    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    let result: TransitionResult = apply(
        &vehicle,
        Command::Rent {
            renter_id: fx.customer.user_id,
            window,
        },
        fx.customer.clone(),
        create_test_cause(),
    )
    .unwrap();
    fx.persistence.rent_vehicle(
        fx.vehicle_id,
        fx.customer.user_id,
        &window,
        &result.audit_event,
    )
}

#[test]
fn test_rent_marks_vehicle_rented_and_opens_rental() {
    let mut fx = fixture();
    let window = create_test_window();

    let outcome = rent(&mut fx, window).unwrap();

    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Rented);
    assert_eq!(vehicle.location_id, None);

    let rental = fx
        .persistence
        .get_active_rental(fx.vehicle_id)
        .unwrap()
        .expect("rental should be open");
    assert_eq!(rental.rental_id, outcome.rental_id);
    assert_eq!(rental.renter_user_id, fx.customer.user_id);
    assert_eq!(rental.window().unwrap(), window);
    assert!(rental.is_open());

    let event = fx.persistence.get_audit_event(outcome.event_id).unwrap();
    assert_eq!(event.action.name, "RentVehicle");
    assert_eq!(event.vehicle_id, Some(fx.vehicle_id));
}

#[test]
fn test_second_rent_is_rejected() {
    let mut fx = fixture();
    let window = create_test_window();
    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    let stale: TransitionResult = apply(
        &vehicle,
        Command::Rent {
            renter_id: fx.customer.user_id,
            window,
        },
        fx.customer.clone(),
        create_test_cause(),
    )
    .unwrap();

    rent(&mut fx, window).unwrap();
    // A second writer that read the vehicle while it was still available.
    let result = fx.persistence.rent_vehicle(
        fx.vehicle_id,
        fx.customer.user_id,
        &window,
        &stale.audit_event,
    );

    assert_eq!(
        result,
        Err(PersistenceError::VehicleUnavailable {
            vehicle_id: fx.vehicle_id
        })
    );
    assert_eq!(
        fx.persistence
            .list_rentals_for_user(fx.customer.user_id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_return_closes_rental_and_parks_vehicle() {
    let mut fx = fixture();
    let window = create_test_window();
    rent(&mut fx, window).unwrap();
    let returned_at = datetime!(2026-03-13 09:00 UTC);

    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    let result = apply(
        &vehicle,
        Command::Return {
            location_id: fx.location_id,
            at: returned_at,
            window,
        },
        fx.customer.clone(),
        create_test_cause(),
    )
    .unwrap();
    let late_fee = result.settlement.unwrap().late_fee_cents;
    assert_eq!(late_fee, 4999);

    fx.persistence
        .return_vehicle(
            fx.vehicle_id,
            fx.location_id,
            returned_at,
            late_fee,
            &result.audit_event,
        )
        .unwrap();

    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    assert_eq!(vehicle.status, VehicleStatus::Available);
    assert_eq!(vehicle.location_id, Some(fx.location_id));
    assert!(fx.persistence.get_active_rental(fx.vehicle_id).unwrap().is_none());

    let history = fx
        .persistence
        .list_rentals_for_user(fx.customer.user_id)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].returned_at, Some(returned_at));
    assert_eq!(history[0].late_fee_cents, Some(4999));
}

#[test]
fn test_return_of_parked_vehicle_is_unavailable() {
    let mut fx = fixture();
    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    let mut rented = vehicle.clone();
    rented.status = VehicleStatus::Rented;
    let result = apply(
        &rented,
        Command::Return {
            location_id: fx.location_id,
            at: datetime!(2026-03-11 12:00 UTC),
            window: create_test_window(),
        },
        fx.customer.clone(),
        create_test_cause(),
    )
    .unwrap();

    let outcome = fx.persistence.return_vehicle(
        fx.vehicle_id,
        fx.location_id,
        datetime!(2026-03-11 12:00 UTC),
        0,
        &result.audit_event,
    );

    assert_eq!(
        outcome,
        Err(PersistenceError::VehicleUnavailable {
            vehicle_id: fx.vehicle_id
        })
    );
    assert_eq!(
        fx.persistence
            .get_vehicle(fx.vehicle_id)
            .unwrap()
            .unwrap()
            .status,
        VehicleStatus::Available
    );
}

#[test]
fn test_rent_after_maintenance_is_unavailable() {
    let mut fx = fixture();
    let vehicle = fx.persistence.get_vehicle(fx.vehicle_id).unwrap().unwrap();
    let service = apply(
        &vehicle,
        Command::StartMaintenance,
        fx.customer.clone(),
        create_test_cause(),
    )
    .unwrap();
    let window = create_test_window();
    let stale = apply(
        &vehicle,
        Command::Rent {
            renter_id: fx.customer.user_id,
            window,
        },
        fx.customer.clone(),
        create_test_cause(),
    )
    .unwrap();
    fx.persistence
        .set_vehicle_status(
            fx.vehicle_id,
            VehicleStatus::Available,
            VehicleStatus::Maintenance,
            &service.audit_event,
        )
        .unwrap();

    let result = fx.persistence.rent_vehicle(
        fx.vehicle_id,
        fx.customer.user_id,
        &window,
        &stale.audit_event,
    );

    assert!(matches!(
        result,
        Err(PersistenceError::VehicleUnavailable { .. })
    ));
}
