//! Shared validation utilities
//!
//! Field rules for user accounts. Messages are written for end users and
//! returned verbatim in `422` responses.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::Role;

/// Maximum length of a user's display name
pub const MAX_NAME_LENGTH: usize = 255;

/// Minimum length of a new password
pub const MIN_PASSWORD_LENGTH: usize = 8;

// local@domain.tld with no whitespace and a single @
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").ok());

/// A user field that failed validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("The name field is required.")]
    NameRequired,

    #[error("The name field must not be greater than {max_length} characters.")]
    NameTooLong { max_length: usize },

    #[error("The email field is required.")]
    EmailRequired,

    #[error("The email field must be a valid email address.")]
    EmailInvalid,

    #[error("The email has already been taken.")]
    EmailTaken,

    #[error("The password field is required.")]
    PasswordRequired,

    #[error("The password field must be at least {min_length} characters.")]
    PasswordTooShort { min_length: usize },

    #[error("The selected role is invalid.")]
    RoleInvalid,
}

impl UserValidationError {
    /// Name of the offending request field
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameTooLong { .. } => "name",
            Self::EmailRequired | Self::EmailInvalid | Self::EmailTaken => "email",
            Self::PasswordRequired | Self::PasswordTooShort { .. } => "password",
            Self::RoleInvalid => "role",
        }
    }
}

/// Validate a display name; length is counted in characters
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong {
            max_length: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmailRequired);
    }
    let valid = email.chars().count() <= MAX_NAME_LENGTH
        && EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(email));
    if !valid {
        return Err(UserValidationError::EmailInvalid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<Role, UserValidationError> {
    Role::parse(role).ok_or(UserValidationError::RoleInvalid)
}
