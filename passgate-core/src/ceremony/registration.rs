//! Registration ceremony controller

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::IssuedOptions;
use crate::credential::CredentialRecord;
use crate::error::{CeremonyError, Result};
use crate::session::{CeremonyContext, SessionHandle, SessionManager};
use crate::store::CredentialStore;
use crate::verifier::{CredentialVerifier, VerifierError};

/// Drives new-credential enrollment: challenge issuance, response
/// verification, and credential creation.
pub struct RegistrationController {
    sessions: Arc<SessionManager>,
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl RegistrationController {
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

    /// Start enrollment for `username`.
    ///
    /// One credential per username: a second enrollment without an
    /// administrative reset fails with `AlreadyRegistered`.
    pub async fn begin(&self, username: &str) -> Result<IssuedOptions> {
        if self.store.username_registered(username).await? {
            return Err(CeremonyError::AlreadyRegistered);
        }

        let issued = self
            .verifier
            .begin_registration(username)
            .map_err(|e| CeremonyError::Verifier(e.to_string()))?;

        let session = self
            .sessions
            .open_registration(username, issued.challenge, issued.state);

        tracing::info!(%session, username, "registration ceremony started");

        Ok(IssuedOptions {
            session,
            options: issued.options,
        })
    }

    /// Complete enrollment with the authenticator's attestation response.
    pub async fn complete(
        &self,
        handle: SessionHandle,
        presented_challenge: &[u8],
        response: &Value,
    ) -> Result<CredentialRecord> {
        let (username, verifier_state) = match self.sessions.consume(handle, presented_challenge)? {
            CeremonyContext::Registration {
                username,
                verifier_state,
            } => (username, verifier_state),
            CeremonyContext::Authentication { .. } => {
                return Err(CeremonyError::WrongCeremonyKind)
            }
        };

        let verified = self
            .verifier
            .verify_registration(response, presented_challenge, &verifier_state)
            .map_err(|e| match e {
                VerifierError::UserVerificationRequired => CeremonyError::UserVerificationRequired,
                _ => {
                    tracing::warn!(%handle, username, error = %e, "attestation rejected");
                    CeremonyError::AttestationInvalid
                }
            })?;

        let record = CredentialRecord {
            credential_id: verified.credential_id,
            public_key: verified.public_key,
            sign_count: verified.initial_sign_count,
            username: username.clone(),
            registered_at: Utc::now(),
        };
        let encoded_id = record.encoded_id();

        self.store.put(record.clone()).await?;

        tracing::info!(
            %handle,
            username,
            credential_id = %encoded_id,
            "registration ceremony completed"
        );

        Ok(record)
    }
}
