//! The console's single operator-facing error type.
//!
//! Port errors stay inside the services that call the ports; what escapes a
//! use case is an [`Error`] carrying an [`ErrorCode`] and a message.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

/// Failure category shared by every console operation.
///
/// Adapters pick the category; the CLI only ever looks at the code, never
/// at backend-specific details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Operator input was rejected before reaching the backend.
    InvalidRequest,
    /// No session, or the backend refused the credentials.
    Unauthorized,
    /// Row-level security denied the signed-in role.
    Forbidden,
    /// A vacancy, program or row id matched nothing.
    NotFound,
    /// The row is closed, duplicated or otherwise out of date.
    Conflict,
    /// The hosted backend could not be reached.
    ServiceUnavailable,
    /// The backend answered with something the console cannot use.
    InternalError,
}

impl ErrorCode {
    /// Wire label, matching the serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-facing failure with a stable [`ErrorCode`].
///
/// The message is never blank; JSON details are optional.
///
/// # Examples
/// ```
/// use edtech_console::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("vacancy 42 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "vacancy 42 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
}

/// Raised when an error would carry a blank message.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Build an error from a message known to be non-blank.
    ///
    /// # Panics
    ///
    /// Panics when `message` is blank; call sites always pass a prefixed
    /// literal or `format!` output.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|err| panic!("invalid {code} error: {err}"))
    }

    /// Build an error, refusing blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            Err(ErrorValidationError::EmptyMessage)
        } else {
            Ok(Self {
                code,
                message,
                details: None,
            })
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach JSON details, e.g. the field a validation failure refers to.
    ///
    /// # Examples
    /// ```
    /// use edtech_console::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("email is malformed")
    ///     .with_details(json!({ "field": "email" }));
    /// assert_eq!(err.details(), Some(&json!({ "field": "email" })));
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// The backend was unreachable or timed out.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Serialised shape of [`Error`]; deserialising re-validates the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(Error { code, message, details }: Error) -> Self {
        Self {
            code,
            message,
            details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(dto: ErrorDto) -> Result<Self, Self::Error> {
        let error = Self::try_new(dto.code, dto.message)?;
        Ok(match dto.details {
            Some(details) => error.with_details(details),
            None => error,
        })
    }
}
