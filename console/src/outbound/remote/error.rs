//! Transport and status error mapping for the hosted backend.
//!
//! Every service behind the backend reports failures as JSON, but each uses
//! its own field names. [`RemoteErrorBody`] accepts all of them so that
//! [`map_status_error`] can keep the backend's code and message.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Backend code for "the single-row request matched no rows".
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Failures talking to the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport { message: String },
    /// The request exceeded the configured timeout.
    #[error("request timed out: {message}")]
    Timeout { message: String },
    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Status {
        status: u16,
        /// Backend error code such as `PGRST116` or `invalid_credentials`.
        code: Option<String>,
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode backend response: {message}")]
    Decode { message: String },
    /// The request could not be built.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl RemoteError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Whether the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Hand the rendered message to `unreachable` when the backend never
    /// answered, otherwise to `refused`.
    pub fn into_port_error<E>(
        self,
        unreachable: impl FnOnce(String) -> E,
        refused: impl FnOnce(String) -> E,
    ) -> E {
        let message = self.to_string();
        if self.is_unreachable() {
            unreachable(message)
        } else {
            refused(message)
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is the backend's "no rows" answer to a single-row read.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::Status { code: Some(code), .. } if code == NO_ROWS_CODE)
    }

    /// Whether the backend refused for lack of authentication or permission.
    pub fn is_denied(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Whether the target already exists.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Status { status: 409, .. } => true,
            Self::Status {
                code: Some(code), ..
            } => code == "409" || code == "23505",
            _ => false,
        }
    }
}

/// Union of the error bodies returned by the REST, auth and storage services.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RemoteErrorBody {
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    #[serde(rename = "statusCode")]
    status_code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

impl RemoteErrorBody {
    fn code(&self) -> Option<String> {
        let from_code = self.code.as_ref().and_then(|value| match value {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        });
        from_code
            .or_else(|| self.error_code.clone())
            .or_else(|| self.status_code.clone())
            .or_else(|| self.error.clone())
    }

    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
    }
}

pub(super) fn map_transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Timeout {
            message: error.to_string(),
        }
    } else {
        RemoteError::Transport {
            message: error.to_string(),
        }
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteError {
    let parsed: RemoteErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed.message().unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_owned()
        } else {
            preview
        }
    });

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RemoteError::Timeout {
            message: format!("status {}: {message}", status.as_u16()),
        },
        _ => RemoteError::Status {
            status: status.as_u16(),
            code: parsed.code(),
            message,
        },
    }
}

pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network error mapping helpers.

    use super::*;
    use rstest::rstest;

    #[test]
    fn single_row_miss_is_recognised() {
        let body = br#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
        let error = map_status_error(StatusCode::NOT_ACCEPTABLE, body);

        assert!(error.is_no_rows());
        assert_eq!(error.status(), Some(406));
    }

    #[rstest]
    #[case::gotrue(
        StatusCode::BAD_REQUEST,
        r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        Some("invalid_grant"),
        "Invalid login credentials"
    )]
    #[case::gotrue_v2(
        StatusCode::BAD_REQUEST,
        r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        Some("400"),
        "Invalid login credentials"
    )]
    #[case::storage(
        StatusCode::BAD_REQUEST,
        r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#,
        Some("409"),
        "The resource already exists"
    )]
    #[case::postgrest(
        StatusCode::FORBIDDEN,
        r#"{"code":"42501","message":"permission denied for table payments"}"#,
        Some("42501"),
        "permission denied for table payments"
    )]
    #[case::plain_text(StatusCode::BAD_GATEWAY, "upstream   offline", None, "upstream offline")]
    #[case::empty(StatusCode::SERVICE_UNAVAILABLE, "", None, "Service Unavailable")]
    fn keeps_backend_code_and_message(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] code: Option<&str>,
        #[case] message: &str,
    ) {
        let error = map_status_error(status, body.as_bytes());
        assert_eq!(
            error,
            RemoteError::Status {
                status: status.as_u16(),
                code: code.map(str::to_owned),
                message: message.to_owned(),
            }
        );
    }

    #[rstest]
    #[case(StatusCode::REQUEST_TIMEOUT)]
    #[case(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(matches!(error, RemoteError::Timeout { .. }));
        assert!(error.is_unreachable());
    }

    #[test]
    fn storage_duplicate_is_a_conflict() {
        let body = br#"{"statusCode":"409","error":"Duplicate","message":"exists"}"#;
        assert!(map_status_error(StatusCode::BAD_REQUEST, body).is_conflict());
        assert!(map_status_error(StatusCode::CONFLICT, b"").is_conflict());
        assert!(!map_status_error(StatusCode::BAD_REQUEST, b"").is_conflict());
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    #[case(RemoteError::Transport { message: "connection refused".to_owned() }, true)]
    #[case(RemoteError::Timeout { message: "15s elapsed".to_owned() }, true)]
    #[case(
        RemoteError::Status {
            status: 401,
            code: Some("42501".to_owned()),
            message: "new row violates row-level security policy".to_owned(),
        },
        false
    )]
    #[case(RemoteError::decode("expected an array"), false)]
    fn port_errors_split_on_reachability(#[case] error: RemoteError, #[case] unreachable: bool) {
        let rendered = error.to_string();
        let routed = error.into_port_error(|m| (true, m), |m| (false, m));
        assert_eq!(routed, (unreachable, rendered));
    }
}
