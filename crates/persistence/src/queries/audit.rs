// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetrent_domain::UserType;

use crate::data_models::{ActionData, CauseData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    vehicle_id: Option<i64>,
    actor_user_id: i64,
    actor_email: String,
    actor_type: String,
    cause_json: String,
    action_json: String,
    before_snapshot: String,
    after_snapshot: String,
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let user_type: UserType = row
            .actor_type
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
        let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&row.action_json)?;

        let event: Self = Self::new(
            row.vehicle_id,
            Actor::new(row.actor_user_id, row.actor_email, user_type),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(row.before_snapshot),
            StateSnapshot::new(row.after_snapshot),
        );
        Ok(event.with_event_id(row.event_id))
    }
}

backend_fn! {
/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::NotFound(format!("Audit event {event_id}"))
            }
            other => PersistenceError::from(other),
        })?;

    AuditEvent::try_from(row)
}
}

backend_fn! {
/// Lists every audit event recorded for a vehicle, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be deserialized.
pub fn list_vehicle_audit_events(
    conn: &mut _,
    vehicle_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::vehicle_id.eq(vehicle_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AuditEvent::try_from).collect()
}
}
