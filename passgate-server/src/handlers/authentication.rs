//! Authentication ceremony endpoints

use axum::{extract::State, Json};

use super::{decode_binary, parse_session};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    FinishAuthenticationRequest, FinishAuthenticationResponse, StartCeremonyResponse,
};

/// POST /webauthn/authenticate/start
///
/// Start an authentication ceremony. No username is required; discoverable
/// credentials identify themselves in the finish request.
#[utoipa::path(
    post,
    path = "/webauthn/authenticate/start",
    tag = "Authentication",
    responses(
        (status = 200, description = "Authentication challenge created", body = StartCeremonyResponse),
        (status = 500, description = "Failed to generate challenge")
    )
)]
pub async fn start_authentication(
    State(state): State<AppState>,
) -> Result<Json<StartCeremonyResponse>, ApiError> {
    let issued = state.authentication.begin().await?;

    Ok(Json(StartCeremonyResponse {
        session_id: issued.session.to_string(),
        public_key: issued.options,
    }))
}

/// POST /webauthn/authenticate/finish
///
/// Complete an authentication ceremony with the authenticator's assertion.
/// Failures are deliberately generic: an unknown credential id reads the
/// same as a bad assertion.
#[utoipa::path(
    post,
    path = "/webauthn/authenticate/finish",
    tag = "Authentication",
    request_body = FinishAuthenticationRequest,
    responses(
        (status = 200, description = "Authentication completed", body = FinishAuthenticationResponse),
        (status = 400, description = "Invalid session or challenge"),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn finish_authentication(
    State(state): State<AppState>,
    Json(req): Json<FinishAuthenticationRequest>,
) -> Result<Json<FinishAuthenticationResponse>, ApiError> {
    let session = parse_session(&req.session_id)?;
    let challenge = decode_binary("challenge", &req.challenge)?;

    // The credential the client claims to have signed with.
    let claimed_id = req
        .credential
        .get("rawId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::bad_request("Credential is missing 'rawId'"))?;
    let claimed_id = decode_binary("rawId", claimed_id)?;

    let outcome = state
        .authentication
        .complete(session, &challenge, &claimed_id, &req.credential)
        .await?;

    Ok(Json(FinishAuthenticationResponse {
        credential_id: outcome.encoded_id(),
        username: outcome.username,
        sign_count: outcome.sign_count,
    }))
}
