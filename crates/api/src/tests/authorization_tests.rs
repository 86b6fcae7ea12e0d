// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::AuthError;

fn vendor() -> AuthenticatedActor {
    AuthenticatedActor::new(1, String::from("vendor@fleet.test"), Role::Vendor)
}

fn customer() -> AuthenticatedActor {
    AuthenticatedActor::new(2, String::from("customer@fleet.test"), Role::Customer)
}

#[test]
fn test_vendor_may_manage_fleet() {
    let actor = vendor();
    assert!(AuthorizationService::authorize_create_location(&actor).is_ok());
    assert!(AuthorizationService::authorize_add_vehicle(&actor).is_ok());
    assert!(AuthorizationService::authorize_relocate_vehicle(&actor).is_ok());
    assert!(AuthorizationService::authorize_maintenance(&actor).is_ok());
    assert!(AuthorizationService::authorize_view_history(&actor).is_ok());
}

#[test]
fn test_customer_cannot_manage_fleet() {
    let actor = customer();
    let result = AuthorizationService::authorize_add_vehicle(&actor);

    match result {
        Err(AuthError::Unauthorized {
            action,
            required_role,
        }) => {
            assert_eq!(action, "add_vehicle");
            assert_eq!(required_role, "Vendor");
        }
        other => panic!("Expected Unauthorized, got {other:?}"),
    }
    assert!(AuthorizationService::authorize_create_location(&actor).is_err());
    assert!(AuthorizationService::authorize_relocate_vehicle(&actor).is_err());
    assert!(AuthorizationService::authorize_maintenance(&actor).is_err());
    assert!(AuthorizationService::authorize_view_history(&actor).is_err());
}

#[test]
fn test_renter_may_return_own_vehicle() {
    let actor = customer();
    assert!(AuthorizationService::authorize_return_vehicle(&actor, actor.user_id).is_ok());
}

#[test]
fn test_other_customer_cannot_return_vehicle() {
    let actor = customer();
    assert!(AuthorizationService::authorize_return_vehicle(&actor, 99).is_err());
}

#[test]
fn test_vendor_may_return_any_vehicle() {
    assert!(AuthorizationService::authorize_return_vehicle(&vendor(), 99).is_ok());
}

#[test]
fn test_audit_actor_carries_user_type() {
    let actor = vendor().to_audit_actor();
    assert_eq!(actor.user_id, 1);
    assert_eq!(actor.user_type, fleetrent_domain::UserType::Vendor);
}
