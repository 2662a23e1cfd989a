// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types shared by every service.

/// Message shown to the user when the session cannot be salvaged.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please log in again.";

/// Why an authenticated request failed without ending the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    /// Backend answered with a non-success status.
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<String> },

    /// Backend answered, but not with the structured data we expected
    /// (e.g. an HTML error page where JSON was expected).
    #[error("malformed response (HTTP {status}): {reason}")]
    Malformed { status: u16, reason: String },
}

/// Client error type surfaced to dashboard screens.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(RequestFailure),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Shorthand for a status failure.
    pub fn status_failure(status: u16, body: Option<String>) -> Self {
        ClientError::RequestFailed(RequestFailure::Status { status, body })
    }

    /// Shorthand for a malformed-response failure.
    pub fn malformed(status: u16, reason: impl Into<String>) -> Self {
        ClientError::RequestFailed(RequestFailure::Malformed {
            status,
            reason: reason.into(),
        })
    }

    /// Whether this error ends the session (user gets logged out and redirected).
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            ClientError::SessionExpired | ClientError::RefreshFailed(_)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed(RequestFailure::Status { status, .. })
            | ClientError::RequestFailed(RequestFailure::Malformed { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Text suitable for an inline banner on the calling screen.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::SessionExpired | ClientError::RefreshFailed(_) => {
                SESSION_EXPIRED_MESSAGE.to_string()
            }
            ClientError::RequestFailed(RequestFailure::Status { status, body }) => match body {
                Some(body) if !body.trim().is_empty() => {
                    format!("The server rejected the request ({}): {}", status, body.trim())
                }
                _ => format!("The server rejected the request ({})", status),
            },
            ClientError::RequestFailed(RequestFailure::Malformed { .. }) => {
                "The server returned an unexpected response".to_string()
            }
            ClientError::ValidationFailed(msg) => msg.clone(),
            ClientError::InvalidCredentials => "Invalid username or password".to_string(),
            ClientError::Network(_) => "Could not reach the server".to_string(),
            ClientError::Storage(msg) => format!("Could not save data locally: {}", msg),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        ClientError::ValidationFailed(messages.join("; "))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
