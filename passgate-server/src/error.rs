//! API error handling module
//!
//! Maps ceremony failures onto HTTP responses. Client bodies carry only the
//! sanitized message and a coarse code; the precise failure kind is logged
//! with its internal diagnostic code. The authentication-sensitive kinds
//! collapse into one indistinguishable 401 response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use passgate_core::CeremonyError;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Ceremony error - failure surfaced by the ceremony engine
    #[error("Ceremony error: {0}")]
    Ceremony(#[from] CeremonyError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Ceremony(e) => match e {
                CeremonyError::AlreadyRegistered => StatusCode::CONFLICT,
                CeremonyError::SessionNotFound
                | CeremonyError::SessionExpired
                | CeremonyError::ChallengeMismatch
                | CeremonyError::WrongCeremonyKind
                | CeremonyError::AttestationInvalid
                | CeremonyError::DuplicateCredential => StatusCode::BAD_REQUEST,
                CeremonyError::UnknownCredential
                | CeremonyError::AssertionInvalid
                | CeremonyError::UserVerificationRequired
                | CeremonyError::PossibleCloneDetected => StatusCode::UNAUTHORIZED,
                CeremonyError::Storage(_) | CeremonyError::Verifier(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Coarse error code for the response body.
    ///
    /// The authentication-sensitive set shares one code so responses cannot
    /// be used to probe which credential ids exist.
    fn client_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Ceremony(e) => match e {
                CeremonyError::AlreadyRegistered => "ALREADY_REGISTERED",
                CeremonyError::SessionNotFound
                | CeremonyError::SessionExpired
                | CeremonyError::ChallengeMismatch
                | CeremonyError::WrongCeremonyKind => "INVALID_SESSION",
                CeremonyError::AttestationInvalid | CeremonyError::DuplicateCredential => {
                    "REGISTRATION_FAILED"
                }
                CeremonyError::UnknownCredential
                | CeremonyError::AssertionInvalid
                | CeremonyError::UserVerificationRequired
                | CeremonyError::PossibleCloneDetected => "AUTHENTICATION_FAILED",
                CeremonyError::Storage(_) | CeremonyError::Verifier(_) => "INTERNAL_ERROR",
            },
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            Self::Ceremony(e) => e.public_message().to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.client_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        match &self {
            Self::BadRequest(_) => {
                tracing::warn!(
                    status = %status,
                    code = code,
                    error = %internal_message,
                    "Client error"
                );
            }
            Self::Internal(_) => {
                tracing::error!(
                    status = %status,
                    code = code,
                    error = %internal_message,
                    "Server error"
                );
            }
            Self::Ceremony(e) if e.is_security_event() => {
                // Logged distinctly: generic to the client, loud internally.
                tracing::error!(
                    status = %status,
                    code = code,
                    diagnostic = e.diagnostic_code(),
                    error = %internal_message,
                    security_event = true,
                    "Ceremony failure flagged as security event"
                );
            }
            Self::Ceremony(e) => {
                tracing::warn!(
                    status = %status,
                    code = code,
                    diagnostic = e.diagnostic_code(),
                    error = %internal_message,
                    "Ceremony failure"
                );
            }
        }

        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_errors_share_status_and_code() {
        let unknown = ApiError::Ceremony(CeremonyError::UnknownCredential);
        let invalid = ApiError::Ceremony(CeremonyError::AssertionInvalid);
        let cloned = ApiError::Ceremony(CeremonyError::PossibleCloneDetected);

        for e in [&unknown, &invalid, &cloned] {
            assert_eq!(e.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(e.client_code(), "AUTHENTICATION_FAILED");
        }
        assert_eq!(unknown.client_message(), invalid.client_message());
    }

    #[test]
    fn test_already_registered_is_conflict() {
        let e = ApiError::Ceremony(CeremonyError::AlreadyRegistered);
        assert_eq!(e.status_code(), StatusCode::CONFLICT);
        assert_eq!(e.client_code(), "ALREADY_REGISTERED");
    }
}
