// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_audit::AuditEvent;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{ActionData, CauseData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

backend_fn! {
/// Inserts an audit event row.
///
/// Actor fields are stored as plain columns so history can be filtered by
/// user; cause and action are stored as JSON.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_audit_event(conn: &mut _, event: &AuditEvent) -> Result<i64, PersistenceError> {
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };

    let cause_json: String = serde_json::to_string(&cause_data)?;
    let action_json: String = serde_json::to_string(&action_data)?;
    let created_at: String = now_timestamp()?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::vehicle_id.eq(event.vehicle_id),
            audit_events::actor_user_id.eq(event.actor.user_id),
            audit_events::actor_email.eq(&event.actor.email),
            audit_events::actor_type.eq(event.actor.user_type.as_str()),
            audit_events::cause_json.eq(&cause_json),
            audit_events::action_json.eq(&action_json),
            audit_events::before_snapshot.eq(&event.before.data),
            audit_events::after_snapshot.eq(&event.after.data),
            audit_events::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(event_id, action = %event.action.name, "Persisted audit event");
    Ok(event_id)
}
}
