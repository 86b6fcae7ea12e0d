// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent_audit::{Action, AuditEvent, Cause, StateSnapshot};
use fleetrent_domain::UserType;

use super::{seed_location, seed_vehicle, setup_with_vendor};
use crate::PersistenceError;

#[test]
fn test_audit_event_round_trips_through_storage() {
    let (mut persistence, vendor) = setup_with_vendor();
    let event = AuditEvent::new(
        None,
        vendor.clone(),
        Cause::new(String::from("req-1"), String::from("Manual note")),
        Action::new(String::from("Annotate"), None),
        StateSnapshot::new(String::new()),
        StateSnapshot::new(String::from("note=hello")),
    );

    let event_id = persistence.persist_audit_event(&event).unwrap();
    let loaded = persistence.get_audit_event(event_id).unwrap();

    assert_eq!(loaded.event_id, Some(event_id));
    assert_eq!(loaded.actor, vendor);
    assert_eq!(loaded.actor.user_type, UserType::Vendor);
    assert_eq!(loaded.cause.id, "req-1");
    assert_eq!(loaded.action.name, "Annotate");
    assert_eq!(loaded.action.details, None);
    assert_eq!(loaded.after.data, "note=hello");
}

#[test]
fn test_missing_audit_event_is_not_found() {
    let (mut persistence, _vendor) = setup_with_vendor();

    let result = persistence.get_audit_event(12345);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_vehicle_trail_starts_with_creation() {
    let (mut persistence, vendor) = setup_with_vendor();
    let location_id = seed_location(&mut persistence, &vendor, "1 Main St");
    let vehicle_id = seed_vehicle(&mut persistence, &vendor, location_id);

    let trail = persistence.list_vehicle_audit_events(vehicle_id).unwrap();

    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action.name, "CreateVehicle");
    assert_eq!(trail[0].vehicle_id, Some(vehicle_id));
    assert_eq!(
        trail[0].after.data,
        format!("status=Available,location={location_id}")
    );
}
