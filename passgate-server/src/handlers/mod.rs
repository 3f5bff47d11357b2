//! HTTP request handlers
//!
//! This module contains all the request handlers for the ceremony and
//! monitoring endpoints.

pub mod authentication;
pub mod health;
pub mod registration;

pub use authentication::{finish_authentication, start_authentication};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use registration::{finish_registration, start_registration};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use passgate_core::SessionHandle;

use crate::error::ApiError;

/// Parse a session id from its transport form.
pub(crate) fn parse_session(session_id: &str) -> Result<SessionHandle, ApiError> {
    session_id
        .parse()
        .map_err(|_| ApiError::bad_request("Malformed session id"))
}

/// Decode a base64url (no padding) binary field.
pub(crate) fn decode_binary(field: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| ApiError::bad_request(format!("Field '{field}' is not valid base64url")))
}
