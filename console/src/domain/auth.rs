//! Authentication primitives such as login credentials and sessions.
//!
//! Keep raw input parsing outside the auth port by exposing constructors that
//! validate string inputs before anything talks to the hosted auth service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Email, UserId, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the auth port.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and shaped like an address.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use edtech_console::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@EdTech.test", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@edtech.test");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(LoginValidationError::Email)?;

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used as the sign-in identifier.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// An authenticated session as seen by the domain.
///
/// Access and refresh tokens stay inside the remote adapter; the domain only
/// needs to know who is signed in and until when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: Option<Email>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Session-change notifications emitted by the auth port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// A user signed in.
    SignedIn(AuthSession),
    /// The access token was refreshed for the same user.
    TokenRefreshed(AuthSession),
    /// The session ended.
    SignedOut,
}

impl SessionChange {
    /// The session carried by this change, if any.
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::SignedIn(session) | Self::TokenRefreshed(session) => Some(session),
            Self::SignedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::Email(UserValidationError::EmptyEmail))]
    #[case("   ", "pw", LoginValidationError::Email(UserValidationError::EmptyEmail))]
    #[case("user", "pw", LoginValidationError::Email(UserValidationError::InvalidEmail))]
    #[case("user@edtech.test", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin@edtech.test  ", "secret")]
    #[case("trainer@edtech.test", " padded password ")]
    fn valid_credentials_keep_password(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn signed_out_carries_no_session() {
        assert!(SessionChange::SignedOut.session().is_none());
    }
}
