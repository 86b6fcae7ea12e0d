// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetrent_domain::{DomainError, RentalWindow, UserType};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub created_at: OffsetDateTime,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub last_activity_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// A stored rent request.
///
/// `returned_at` is `None` while the rental is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalData {
    pub rental_id: i64,
    pub vehicle_id: i64,
    pub renter_user_id: i64,
    pub start_date: OffsetDateTime,
    pub length_days: i64,
    pub returned_at: Option<OffsetDateTime>,
    pub late_fee_cents: Option<i64>,
}

impl RentalData {
    /// Rebuilds the booked rental window.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored length is out of range.
    pub fn window(&self) -> Result<RentalWindow, DomainError> {
        RentalWindow::new(self.start_date, self.length_days)
    }

    /// Returns whether the vehicle has not yet been brought back.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Identifiers assigned when a rental is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentOutcome {
    pub rental_id: i64,
    pub event_id: i64,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}
