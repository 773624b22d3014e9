//! Error types for the observer API client.
//!
//! # Design
//! `ApiError` is the normalized taxonomy every operation reports. It is only
//! produced by the response interpreter and the login flow. `TransportError`
//! describes failures below HTTP (no response at all) and is folded into
//! `ApiError::Generic` by the interpreter.

use thiserror::Error;

/// Reason used when the server answers with a status the client does not
/// expect.
pub const UNKNOWN_REASON: &str = "unknown reason";

/// Errors returned by observer API operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 401: the token is missing, invalid or expired.
    /// Callers should force a new login.
    #[error("unauthorized")]
    Unauthorized,

    /// The server broke the response contract: undecodable body or an
    /// unexpected status code.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Transport-level failure, e.g. no connectivity.
    #[error("{reason}")]
    Generic { reason: String },

    /// Login was rejected before any credential existed.
    #[error("login failed: {reason}")]
    LoginFailed { reason: String },
}

impl ApiError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn generic(reason: impl Into<String>) -> Self {
        ApiError::Generic {
            reason: reason.into(),
        }
    }

    pub fn login_failed(reason: impl Into<String>) -> Self {
        ApiError::LoginFailed {
            reason: reason.into(),
        }
    }

    /// Error for a status code outside the 200/401 contract.
    pub fn unexpected_status(status: u16) -> Self {
        ApiError::malformed(format!("{UNKNOWN_REASON} (code: {status})"))
    }

    /// The stable reason string, where the variant carries one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized => None,
            ApiError::MalformedResponse { reason }
            | ApiError::Generic { reason }
            | ApiError::LoginFailed { reason } => Some(reason),
        }
    }
}

/// Failures raised by an [`crate::transport::HttpTransport`] when no HTTP
/// response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while assembling a [`crate::config::ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_embeds_code() {
        let err = ApiError::unexpected_status(500);
        assert_eq!(err, ApiError::malformed("unknown reason (code: 500)"));
        assert!(err.reason().unwrap().starts_with(UNKNOWN_REASON));
    }

    #[test]
    fn unauthorized_has_no_reason() {
        assert_eq!(ApiError::Unauthorized.reason(), None);
        assert_eq!(ApiError::Unauthorized.to_string(), "unauthorized");
    }

    #[test]
    fn generic_displays_transport_message() {
        let err = ApiError::generic("connection failed: refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }
}
