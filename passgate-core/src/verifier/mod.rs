//! Cryptographic verifier adapter
//!
//! Boundary to the trusted WebAuthn crypto library. Option documents and
//! client responses cross it as JSON values (they are wire shapes the
//! transport forwards verbatim); the per-ceremony verification state is an
//! opaque byte blob held inside the session.

mod webauthn;

pub use webauthn::WebauthnVerifier;

use serde_json::Value;

use crate::credential::CredentialRecord;

/// Verifier-side failures.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("attestation rejected: {0}")]
    Attestation(String),

    #[error("assertion rejected: {0}")]
    Assertion(String),

    #[error("user verification was required but not performed")]
    UserVerificationRequired,

    #[error("ceremony state malformed: {0}")]
    State(String),
}

/// Challenge and options minted for one ceremony round.
#[derive(Debug)]
pub struct IssuedCeremony {
    /// Options document for the client (`navigator.credentials.*`).
    pub options: Value,
    /// Raw challenge bytes embedded in the options; the session manager
    /// records these for exact-byte matching at completion.
    pub challenge: Vec<u8>,
    /// Opaque verification state to present back at completion.
    pub state: Vec<u8>,
}

/// Outcome of a verified registration response.
#[derive(Debug)]
pub struct VerifiedRegistration {
    pub credential_id: Vec<u8>,
    /// Opaque public key material for the credential record.
    pub public_key: Vec<u8>,
    pub initial_sign_count: u32,
}

/// Outcome of a verified assertion.
#[derive(Debug)]
pub struct VerifiedAssertion {
    pub new_sign_count: u32,
    pub user_verified: bool,
}

/// Contract the ceremony controllers consume.
///
/// Implementations delegate to a trusted crypto library; the engine never
/// parses attestation objects or checks signatures itself. Expected origin
/// and RP id are fixed deployment configuration baked in at construction,
/// so begin and complete of one ceremony necessarily agree on them.
pub trait CredentialVerifier: Send + Sync {
    /// Build creation options for enrolling `username`.
    fn begin_registration(&self, username: &str) -> Result<IssuedCeremony, VerifierError>;

    /// Verify an attestation response against the issued state.
    fn verify_registration(
        &self,
        response: &Value,
        expected_challenge: &[u8],
        state: &[u8],
    ) -> Result<VerifiedRegistration, VerifierError>;

    /// Build request options for a usernameless authentication round.
    fn begin_authentication(&self) -> Result<IssuedCeremony, VerifierError>;

    /// Verify an assertion response against the issued state and the
    /// stored credential.
    fn verify_assertion(
        &self,
        response: &Value,
        expected_challenge: &[u8],
        state: &[u8],
        credential: &CredentialRecord,
    ) -> Result<VerifiedAssertion, VerifierError>;
}
