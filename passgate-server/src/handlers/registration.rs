//! Registration ceremony endpoints

use axum::{extract::State, Json};

use super::{decode_binary, parse_session};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    FinishRegistrationRequest, FinishRegistrationResponse, StartCeremonyResponse,
    StartRegistrationRequest,
};

/// POST /webauthn/register/start
///
/// Start a registration ceremony for a username. Returns credential
/// creation options with an embedded challenge, plus the session id to
/// present at the finish endpoint.
#[utoipa::path(
    post,
    path = "/webauthn/register/start",
    tag = "Registration",
    request_body = StartRegistrationRequest,
    responses(
        (status = 200, description = "Registration challenge created", body = StartCeremonyResponse),
        (status = 409, description = "Username already owns a credential"),
        (status = 500, description = "Failed to generate challenge")
    )
)]
pub async fn start_registration(
    State(state): State<AppState>,
    Json(req): Json<StartRegistrationRequest>,
) -> Result<Json<StartCeremonyResponse>, ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::bad_request("Username must not be empty"));
    }

    let issued = state.registration.begin(&req.username).await?;

    Ok(Json(StartCeremonyResponse {
        session_id: issued.session.to_string(),
        public_key: issued.options,
    }))
}

/// POST /webauthn/register/finish
///
/// Complete a registration ceremony with the authenticator's attestation
/// response. On success the credential is stored and ready for
/// authentication.
#[utoipa::path(
    post,
    path = "/webauthn/register/finish",
    tag = "Registration",
    request_body = FinishRegistrationRequest,
    responses(
        (status = 200, description = "Registration completed", body = FinishRegistrationResponse),
        (status = 400, description = "Invalid session, challenge, or attestation")
    )
)]
pub async fn finish_registration(
    State(state): State<AppState>,
    Json(req): Json<FinishRegistrationRequest>,
) -> Result<Json<FinishRegistrationResponse>, ApiError> {
    let session = parse_session(&req.session_id)?;
    let challenge = decode_binary("challenge", &req.challenge)?;

    let record = state
        .registration
        .complete(session, &challenge, &req.credential)
        .await?;

    Ok(Json(FinishRegistrationResponse {
        credential_id: record.encoded_id(),
        username: record.username,
    }))
}
