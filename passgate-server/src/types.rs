//! Ceremony request/response types
//!
//! JSON shapes at the transport boundary. Binary values (challenges,
//! credential ids) travel as URL-safe base64 text; the options documents
//! from the verifier are forwarded verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Request to start registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartRegistrationRequest {
    /// Username to enroll
    #[schema(example = "alice")]
    pub username: String,
}

/// Response containing the registration challenge options
#[derive(Debug, Serialize, ToSchema)]
pub struct StartCeremonyResponse {
    /// Session id to present at the finish endpoint
    pub session_id: String,
    /// WebAuthn options (to be passed to navigator.credentials.create/get)
    #[schema(value_type = Object)]
    pub public_key: Value,
}

/// Request to complete registration
#[derive(Debug, Deserialize, ToSchema)]
pub struct FinishRegistrationRequest {
    /// Session id from the start endpoint
    pub session_id: String,
    /// Challenge echoed back by the client (base64url)
    pub challenge: String,
    /// WebAuthn credential response from navigator.credentials.create
    #[schema(value_type = Object)]
    pub credential: Value,
}

/// Response for a completed registration
#[derive(Debug, Serialize, ToSchema)]
pub struct FinishRegistrationResponse {
    /// Credential id of the new credential (base64url)
    pub credential_id: String,
    /// Username the credential is bound to
    pub username: String,
}

/// Request to complete authentication
#[derive(Debug, Deserialize, ToSchema)]
pub struct FinishAuthenticationRequest {
    /// Session id from the start endpoint
    pub session_id: String,
    /// Challenge echoed back by the client (base64url)
    pub challenge: String,
    /// WebAuthn assertion response from navigator.credentials.get
    #[schema(value_type = Object)]
    pub credential: Value,
}

/// Response for a completed authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct FinishAuthenticationResponse {
    /// Authenticated username
    pub username: String,
    /// Credential id used (base64url)
    pub credential_id: String,
    /// Signature counter after this assertion
    pub sign_count: u32,
}
