// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.

use thiserror::Error;

/// Longest password bcrypt hashes without truncation, in bytes.
const BCRYPT_MAX_BYTES: usize = 72;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password is too long to hash.
    #[error("Password must be at most {max_bytes} bytes long")]
    TooLong { max_bytes: usize },

    /// Password is the account email.
    #[error("Password must not match the email address")]
    MatchesEmail,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Validates a password for an account.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password is too short, too
    /// long, or equal to the email (ignoring case).
    pub fn validate(&self, password: &str, email: &str) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if password.len() > BCRYPT_MAX_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max_bytes: BCRYPT_MAX_BYTES,
            });
        }

        if password.trim().eq_ignore_ascii_case(email.trim()) {
            return Err(PasswordPolicyError::MatchesEmail);
        }

        Ok(())
    }
}
