// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fleetrent::LocationCreation;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::location;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a location together with its audit event.
///
/// Returns `(location_id, event_id)`.
///
/// # Errors
///
/// Returns an error if either insert fails. Nothing is written in that case.
pub fn create_location(
    conn: &mut _,
    creation: &LocationCreation,
) -> Result<(i64, i64), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|tx| {
        diesel::insert_into(location::table)
            .values(location::address.eq(creation.location.address()))
            .execute(tx)?;
        let location_id: i64 = tx.get_last_insert_rowid()?;

        let event_id: i64 = tx.insert_audit_event(&creation.audit_event)?;

        info!(location_id, event_id, "Created location");
        Ok((location_id, event_id))
    })
}
}
