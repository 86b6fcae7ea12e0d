// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental window arithmetic.
//!
//! A rental runs from its start instant for a whole number of days.
//! Returns after the due instant are late, and every started day past
//! the due instant is charged at the vehicle's daily rate.

use time::{Duration, OffsetDateTime};

use crate::error::DomainError;
use crate::types::DailyRate;

/// Longest rental that may be booked in one request.
pub const MAX_RENTAL_DAYS: i64 = 365;

/// The booked period of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalWindow {
    start: OffsetDateTime,
    length_days: i64,
    due_at: OffsetDateTime,
}

impl RentalWindow {
    /// Creates a rental window.
    ///
    /// # Errors
    ///
    /// Returns an error if `length_days` is not in `1..=MAX_RENTAL_DAYS`
    /// or the due instant overflows the calendar.
    pub fn new(start: OffsetDateTime, length_days: i64) -> Result<Self, DomainError> {
        if !(1..=MAX_RENTAL_DAYS).contains(&length_days) {
            return Err(DomainError::InvalidRentalLength { length_days });
        }

        let due_at: OffsetDateTime = start.checked_add(Duration::days(length_days)).ok_or_else(
            || DomainError::DateArithmeticOverflow {
                operation: format!("adding {length_days} days to {start}"),
            },
        )?;

        Ok(Self {
            start,
            length_days,
            due_at,
        })
    }

    /// Returns the instant the rental began.
    #[must_use]
    pub const fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// Returns the booked length in days.
    #[must_use]
    pub const fn length_days(&self) -> i64 {
        self.length_days
    }

    /// Returns the instant the vehicle is due back.
    #[must_use]
    pub const fn due_at(&self) -> OffsetDateTime {
        self.due_at
    }

    /// Returns whether a return at `at` is late.
    #[must_use]
    pub fn is_late(&self, at: OffsetDateTime) -> bool {
        at > self.due_at
    }

    /// Returns the number of days a return at `at` is overdue.
    ///
    /// Any started day counts as a full day. On-time returns yield zero.
    #[must_use]
    pub fn days_late(&self, at: OffsetDateTime) -> i64 {
        if !self.is_late(at) {
            return 0;
        }
        let overdue: Duration = at - self.due_at;
        let whole_days: i64 = overdue.whole_days();
        if overdue > Duration::days(whole_days) {
            whole_days + 1
        } else {
            whole_days
        }
    }

    /// Returns the booked price in cents.
    #[must_use]
    pub const fn base_cost(&self, rate: DailyRate) -> i64 {
        rate.cost_for_days(self.length_days)
    }

    /// Returns the late charge in cents for a return at `at`.
    #[must_use]
    pub fn late_fee(&self, rate: DailyRate, at: OffsetDateTime) -> i64 {
        rate.cost_for_days(self.days_late(at))
    }
}
