//! webauthn-rs backed verifier
//!
//! Production [`CredentialVerifier`] delegating all attestation and
//! assertion cryptography to `webauthn-rs`. Ceremony states round-trip
//! through serde (the `danger-allow-state-serialisation` feature) so the
//! session manager can hold them as opaque bytes. Authentication uses the
//! discoverable flow: the allow-list stays empty at begin and the claimed
//! credential is supplied at completion.

use serde_json::Value;
use url::Url;
use webauthn_rs::prelude::*;

use super::{
    CredentialVerifier, IssuedCeremony, VerifiedAssertion, VerifiedRegistration, VerifierError,
};
use crate::credential::CredentialRecord;

/// Relying Party verifier over `webauthn-rs`.
pub struct WebauthnVerifier {
    webauthn: Webauthn,
    require_user_verification: bool,
}

impl WebauthnVerifier {
    /// Build a verifier for one RP deployment.
    ///
    /// `rp_id` and `rp_origin` are fixed here for the verifier's lifetime,
    /// so every begin/complete pair verifies against the same values.
    pub fn new(
        rp_id: &str,
        rp_origin: &Url,
        rp_name: &str,
        require_user_verification: bool,
    ) -> Result<Self, WebauthnError> {
        let webauthn = WebauthnBuilder::new(rp_id, rp_origin)?
            .rp_name(rp_name)
            .allow_subdomains(false)
            .build()?;

        Ok(Self {
            webauthn,
            require_user_verification,
        })
    }
}

impl CredentialVerifier for WebauthnVerifier {
    fn begin_registration(&self, username: &str) -> Result<IssuedCeremony, VerifierError> {
        let user_id = Uuid::new_v4();
        let (ccr, reg_state) = self
            .webauthn
            .start_passkey_registration(user_id, username, username, None)
            .map_err(|e| VerifierError::Attestation(format!("failed to mint options: {e:?}")))?;

        let challenge: &[u8] = ccr.public_key.challenge.as_ref();
        let challenge = challenge.to_vec();
        let state = serde_json::to_vec(&reg_state).map_err(|e| VerifierError::State(e.to_string()))?;
        let options = serde_json::to_value(&ccr).map_err(|e| VerifierError::State(e.to_string()))?;

        Ok(IssuedCeremony {
            options,
            challenge,
            state,
        })
    }

    fn verify_registration(
        &self,
        response: &Value,
        _expected_challenge: &[u8],
        state: &[u8],
    ) -> Result<VerifiedRegistration, VerifierError> {
        // The serialized state was minted together with the session's
        // challenge; its embedded challenge is what the library checks
        // against clientDataJSON.
        let reg_state: PasskeyRegistration =
            serde_json::from_slice(state).map_err(|e| VerifierError::State(e.to_string()))?;
        let credential: RegisterPublicKeyCredential = serde_json::from_value(response.clone())
            .map_err(|e| VerifierError::Attestation(format!("malformed response: {e}")))?;

        let passkey = self
            .webauthn
            .finish_passkey_registration(&credential, &reg_state)
            .map_err(|e| VerifierError::Attestation(format!("{e:?}")))?;

        let credential_id: &[u8] = passkey.cred_id().as_ref();
        let credential_id = credential_id.to_vec();
        let public_key =
            serde_json::to_vec(&passkey).map_err(|e| VerifierError::State(e.to_string()))?;

        Ok(VerifiedRegistration {
            credential_id,
            public_key,
            // Counters start advancing with the first assertion; the
            // attested value travels inside the serialized passkey.
            initial_sign_count: 0,
        })
    }

    fn begin_authentication(&self) -> Result<IssuedCeremony, VerifierError> {
        let (rcr, auth_state) = self
            .webauthn
            .start_discoverable_authentication()
            .map_err(|e| VerifierError::Assertion(format!("failed to mint options: {e:?}")))?;

        let challenge: &[u8] = rcr.public_key.challenge.as_ref();
        let challenge = challenge.to_vec();
        let state =
            serde_json::to_vec(&auth_state).map_err(|e| VerifierError::State(e.to_string()))?;
        let options = serde_json::to_value(&rcr).map_err(|e| VerifierError::State(e.to_string()))?;

        Ok(IssuedCeremony {
            options,
            challenge,
            state,
        })
    }

    fn verify_assertion(
        &self,
        response: &Value,
        _expected_challenge: &[u8],
        state: &[u8],
        credential: &CredentialRecord,
    ) -> Result<VerifiedAssertion, VerifierError> {
        let auth_state: DiscoverableAuthentication =
            serde_json::from_slice(state).map_err(|e| VerifierError::State(e.to_string()))?;
        let assertion: PublicKeyCredential = serde_json::from_value(response.clone())
            .map_err(|e| VerifierError::Assertion(format!("malformed response: {e}")))?;

        let passkey: Passkey = serde_json::from_slice(&credential.public_key)
            .map_err(|e| VerifierError::State(format!("stored key material: {e}")))?;
        let keys = [DiscoverableKey::from(&passkey)];

        let result = self
            .webauthn
            .finish_discoverable_authentication(&assertion, auth_state, &keys)
            .map_err(|e| VerifierError::Assertion(format!("{e:?}")))?;

        if self.require_user_verification && !result.user_verified() {
            return Err(VerifierError::UserVerificationRequired);
        }

        Ok(VerifiedAssertion {
            new_sign_count: result.counter(),
            user_verified: result.user_verified(),
        })
    }
}

impl std::fmt::Debug for WebauthnVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebauthnVerifier")
            .field("require_user_verification", &self.require_user_verification)
            .finish()
    }
}
