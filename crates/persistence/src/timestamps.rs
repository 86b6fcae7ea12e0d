// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text encoding for stored instants.
//!
//! Every timestamp column holds an ISO 8601 string in UTC with fixed
//! precision, so string order matches chronological order on every backend.

use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Iso8601;

use crate::error::PersistenceError;

/// Formats an instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.to_offset(UtcOffset::UTC)
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(format!("Failed to format time: {e}")))
}

/// Parses a stored instant.
///
/// # Errors
///
/// Returns an error if the text is not a valid ISO 8601 instant.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(raw, &Iso8601::DEFAULT).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid stored time '{raw}': {e}"))
    })
}

/// Returns the current instant formatted for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    format_timestamp(OffsetDateTime::now_utc())
}
