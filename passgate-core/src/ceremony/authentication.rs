//! Authentication ceremony controller

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;

use super::IssuedOptions;
use crate::error::{CeremonyError, Result};
use crate::session::{CeremonyContext, SessionHandle, SessionManager};
use crate::store::CredentialStore;
use crate::verifier::{CredentialVerifier, VerifierError};

/// Outcome of a completed authentication ceremony.
#[derive(Debug, Clone)]
pub struct AuthenticatedCredential {
    pub username: String,
    pub credential_id: Vec<u8>,
    /// Counter value after this assertion.
    pub sign_count: u32,
}

impl AuthenticatedCredential {
    pub fn encoded_id(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.credential_id)
    }
}

/// Drives login: challenge issuance, assertion verification, and
/// counter-based clone detection.
pub struct AuthenticationController {
    sessions: Arc<SessionManager>,
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthenticationController {
    pub fn new(
        sessions: Arc<SessionManager>,
        store: Arc<dyn CredentialStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            sessions,
            store,
            verifier,
        }
    }

    /// Start an authentication round. Unbound to a username, so
    /// discoverable-credential clients can authenticate without typing one.
    pub async fn begin(&self) -> Result<IssuedOptions> {
        let issued = self
            .verifier
            .begin_authentication()
            .map_err(|e| CeremonyError::Verifier(e.to_string()))?;

        let session = self
            .sessions
            .open_authentication(issued.challenge, issued.state);

        tracing::info!(%session, "authentication ceremony started");

        Ok(IssuedOptions {
            session,
            options: issued.options,
        })
    }

    /// Complete login with the authenticator's assertion response.
    ///
    /// `claimed_credential_id` is what the client says it signed with; the
    /// matching stored record supplies the key material and the expected
    /// counter floor.
    pub async fn complete(
        &self,
        handle: SessionHandle,
        presented_challenge: &[u8],
        claimed_credential_id: &[u8],
        response: &Value,
    ) -> Result<AuthenticatedCredential> {
        let verifier_state = match self.sessions.consume(handle, presented_challenge)? {
            CeremonyContext::Authentication { verifier_state } => verifier_state,
            CeremonyContext::Registration { .. } => return Err(CeremonyError::WrongCeremonyKind),
        };

        let record = self.store.get(claimed_credential_id).await?;

        let verified = self
            .verifier
            .verify_assertion(response, presented_challenge, &verifier_state, &record)
            .map_err(|e| match e {
                VerifierError::UserVerificationRequired => CeremonyError::UserVerificationRequired,
                _ => {
                    tracing::warn!(%handle, error = %e, "assertion rejected");
                    CeremonyError::AssertionInvalid
                }
            })?;

        // Clone detection: the counter must strictly advance unless the
        // authenticator never supported one (stored value 0). The store is
        // left untouched on violation.
        if record.sign_count > 0 && verified.new_sign_count <= record.sign_count {
            tracing::error!(
                %handle,
                credential_id = %record.encoded_id(),
                stored_count = record.sign_count,
                reported_count = verified.new_sign_count,
                security_event = true,
                "signature counter did not advance; possible cloned authenticator"
            );
            return Err(CeremonyError::PossibleCloneDetected);
        }

        self.store
            .update_sign_count(claimed_credential_id, verified.new_sign_count)
            .await?;

        tracing::info!(
            %handle,
            username = %record.username,
            credential_id = %record.encoded_id(),
            sign_count = verified.new_sign_count,
            user_verified = verified.user_verified,
            "authentication ceremony completed"
        );

        Ok(AuthenticatedCredential {
            username: record.username,
            credential_id: record.credential_id,
            sign_count: verified.new_sign_count,
        })
    }
}
