//! End-to-end ceremony tests
//!
//! Drive both controllers against the in-memory store and a scripted
//! verifier, so attestation/assertion outcomes can be chosen per test while
//! the session, policy, and counter logic under test stays real.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};

use passgate_core::{
    AuthenticationController, CeremonyError, CredentialRecord, CredentialStore, CredentialVerifier,
    IssuedCeremony, MemoryCredentialStore, RegistrationController, SessionManager,
    VerifiedAssertion, VerifiedRegistration, VerifierError, DEFAULT_SESSION_TTL,
};

/// Verifier with scripted outcomes: unique challenges, a fixed credential
/// id, and per-test sign counts and user-verification results.
struct ScriptedVerifier {
    round: AtomicU32,
    credential_id: Vec<u8>,
    initial_sign_count: u32,
    assertion_sign_count: AtomicU32,
    user_verified: bool,
    require_user_verification: bool,
}

impl Default for ScriptedVerifier {
    fn default() -> Self {
        Self {
            round: AtomicU32::new(0),
            credential_id: b"scripted-cred".to_vec(),
            initial_sign_count: 0,
            assertion_sign_count: AtomicU32::new(1),
            user_verified: true,
            require_user_verification: true,
        }
    }
}

impl ScriptedVerifier {
    fn issue(&self) -> IssuedCeremony {
        let n = self.round.fetch_add(1, Ordering::SeqCst);
        let challenge = format!("challenge-{n}").into_bytes();
        IssuedCeremony {
            options: json!({ "challenge": URL_SAFE_NO_PAD.encode(&challenge) }),
            challenge,
            state: b"scripted-state".to_vec(),
        }
    }
}

impl CredentialVerifier for ScriptedVerifier {
    fn begin_registration(&self, _username: &str) -> Result<IssuedCeremony, VerifierError> {
        Ok(self.issue())
    }

    fn verify_registration(
        &self,
        _response: &Value,
        _expected_challenge: &[u8],
        _state: &[u8],
    ) -> Result<VerifiedRegistration, VerifierError> {
        Ok(VerifiedRegistration {
            credential_id: self.credential_id.clone(),
            public_key: b"scripted-public-key".to_vec(),
            initial_sign_count: self.initial_sign_count,
        })
    }

    fn begin_authentication(&self) -> Result<IssuedCeremony, VerifierError> {
        Ok(self.issue())
    }

    fn verify_assertion(
        &self,
        _response: &Value,
        _expected_challenge: &[u8],
        _state: &[u8],
        _credential: &CredentialRecord,
    ) -> Result<VerifiedAssertion, VerifierError> {
        if self.require_user_verification && !self.user_verified {
            return Err(VerifierError::UserVerificationRequired);
        }
        Ok(VerifiedAssertion {
            new_sign_count: self.assertion_sign_count.load(Ordering::SeqCst),
            user_verified: self.user_verified,
        })
    }
}

struct Harness {
    store: Arc<MemoryCredentialStore>,
    verifier: Arc<ScriptedVerifier>,
    registration: RegistrationController,
    authentication: AuthenticationController,
}

fn harness(verifier: ScriptedVerifier) -> Harness {
    let sessions = Arc::new(SessionManager::new(DEFAULT_SESSION_TTL));
    let store = Arc::new(MemoryCredentialStore::new());
    let verifier = Arc::new(verifier);
    Harness {
        store: store.clone(),
        verifier: verifier.clone(),
        registration: RegistrationController::new(sessions.clone(), store.clone(), verifier.clone()),
        authentication: AuthenticationController::new(sessions, store, verifier),
    }
}

fn challenge_of(options: &Value) -> Vec<u8> {
    URL_SAFE_NO_PAD
        .decode(options["challenge"].as_str().unwrap())
        .unwrap()
}

/// Register one credential for `username`, returning its id.
async fn enroll(h: &Harness, username: &str) -> Vec<u8> {
    let issued = h.registration.begin(username).await.unwrap();
    let challenge = challenge_of(&issued.options);
    let record = h
        .registration
        .complete(issued.session, &challenge, &json!({}))
        .await
        .unwrap();
    record.credential_id
}

#[tokio::test]
async fn test_register_then_authenticate() {
    let h = harness(ScriptedVerifier::default());

    let cred_id = enroll(&h, "alice").await;
    assert_eq!(cred_id, b"scripted-cred");
    assert_eq!(h.store.get(&cred_id).await.unwrap().sign_count, 0);

    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    let outcome = h
        .authentication
        .complete(issued.session, &challenge, &cred_id, &json!({}))
        .await
        .unwrap();

    assert_eq!(outcome.username, "alice");
    assert_eq!(outcome.sign_count, 1);
    assert_eq!(h.store.get(&cred_id).await.unwrap().sign_count, 1);
}

#[tokio::test]
async fn test_second_registration_rejected() {
    let h = harness(ScriptedVerifier::default());
    enroll(&h, "alice").await;

    assert_eq!(
        h.registration.begin("alice").await.unwrap_err(),
        CeremonyError::AlreadyRegistered
    );
}

#[tokio::test]
async fn test_ceremony_kind_isolation() {
    let h = harness(ScriptedVerifier::default());
    enroll(&h, "alice").await;

    // Registration session presented on the authentication path.
    let issued = h.registration.begin("bob").await.unwrap();
    let challenge = challenge_of(&issued.options);
    assert_eq!(
        h.authentication
            .complete(issued.session, &challenge, b"scripted-cred", &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::WrongCeremonyKind
    );

    // Authentication session presented on the registration path.
    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    assert_eq!(
        h.registration
            .complete(issued.session, &challenge, &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::WrongCeremonyKind
    );
}

#[tokio::test]
async fn test_challenge_mismatch_leaves_store_empty() {
    let h = harness(ScriptedVerifier::default());

    let issued = h.registration.begin("bob").await.unwrap();
    assert_eq!(
        h.registration
            .complete(issued.session, b"attacker-challenge", &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::ChallengeMismatch
    );

    assert!(!h.store.username_registered("bob").await.unwrap());
    assert_eq!(h.store.credential_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_completed_session_cannot_be_replayed() {
    let h = harness(ScriptedVerifier::default());
    let cred_id = enroll(&h, "alice").await;

    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    h.authentication
        .complete(issued.session, &challenge, &cred_id, &json!({}))
        .await
        .unwrap();

    assert_eq!(
        h.authentication
            .complete(issued.session, &challenge, &cred_id, &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::SessionNotFound
    );
}

#[tokio::test]
async fn test_counter_regression_detected() {
    let h = harness(ScriptedVerifier {
        initial_sign_count: 5,
        ..ScriptedVerifier::default()
    });
    let cred_id = enroll(&h, "alice").await;

    for stale in [5u32, 4] {
        h.verifier.assertion_sign_count.store(stale, Ordering::SeqCst);
        let issued = h.authentication.begin().await.unwrap();
        let challenge = challenge_of(&issued.options);
        assert_eq!(
            h.authentication
                .complete(issued.session, &challenge, &cred_id, &json!({}))
                .await
                .unwrap_err(),
            CeremonyError::PossibleCloneDetected
        );
        // Rejection must not touch the stored counter.
        assert_eq!(h.store.get(&cred_id).await.unwrap().sign_count, 5);
    }

    h.verifier.assertion_sign_count.store(6, Ordering::SeqCst);
    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    let outcome = h
        .authentication
        .complete(issued.session, &challenge, &cred_id, &json!({}))
        .await
        .unwrap();
    assert_eq!(outcome.sign_count, 6);
    assert_eq!(h.store.get(&cred_id).await.unwrap().sign_count, 6);
}

#[tokio::test]
async fn test_zero_counter_exemption() {
    let h = harness(ScriptedVerifier::default());
    let cred_id = enroll(&h, "alice").await;
    assert_eq!(h.store.get(&cred_id).await.unwrap().sign_count, 0);

    // Counter-less authenticators report 0 forever; that is not a clone.
    h.verifier.assertion_sign_count.store(0, Ordering::SeqCst);
    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    let outcome = h
        .authentication
        .complete(issued.session, &challenge, &cred_id, &json!({}))
        .await
        .unwrap();
    assert_eq!(outcome.sign_count, 0);
}

#[tokio::test]
async fn test_unknown_credential() {
    let h = harness(ScriptedVerifier::default());

    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    assert_eq!(
        h.authentication
            .complete(issued.session, &challenge, b"never-registered", &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::UnknownCredential
    );
}

#[tokio::test]
async fn test_user_verification_enforced() {
    let h = harness(ScriptedVerifier {
        user_verified: false,
        ..ScriptedVerifier::default()
    });
    let cred_id = enroll(&h, "alice").await;

    let issued = h.authentication.begin().await.unwrap();
    let challenge = challenge_of(&issued.options);
    assert_eq!(
        h.authentication
            .complete(issued.session, &challenge, &cred_id, &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::UserVerificationRequired
    );
}

#[tokio::test]
async fn test_duplicate_credential_id_rejected() {
    // The scripted verifier mints the same credential id every time, so a
    // second user's enrollment collides in the store.
    let h = harness(ScriptedVerifier::default());
    enroll(&h, "alice").await;

    let issued = h.registration.begin("carol").await.unwrap();
    let challenge = challenge_of(&issued.options);
    assert_eq!(
        h.registration
            .complete(issued.session, &challenge, &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::DuplicateCredential
    );
}

#[tokio::test]
async fn test_expired_session() {
    let sessions = Arc::new(SessionManager::new(Duration::ZERO));
    let store = Arc::new(MemoryCredentialStore::new());
    let verifier = Arc::new(ScriptedVerifier::default());
    let registration = RegistrationController::new(sessions, store, verifier);

    let issued = registration.begin("alice").await.unwrap();
    let challenge = challenge_of(&issued.options);
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(
        registration
            .complete(issued.session, &challenge, &json!({}))
            .await
            .unwrap_err(),
        CeremonyError::SessionExpired
    );
}
