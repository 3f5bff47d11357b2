//! Passgate Core - WebAuthn Relying Party ceremony engine
//!
//! This crate drives the two-phase WebAuthn registration and authentication
//! ceremonies: minting bound challenges, tracking in-flight sessions with
//! one-shot consumption and expiry, verifying authenticator responses
//! through a pluggable crypto adapter, and keeping per-user credential
//! state with signature-counter clone detection.
//!
//! # Architecture
//!
//! - [`SessionManager`]: outstanding challenges, one-shot use, TTL
//! - [`CredentialStore`]: credential records keyed by credential id
//! - [`CredentialVerifier`]: boundary to the crypto library
//!   ([`WebauthnVerifier`] is the `webauthn-rs` implementation)
//! - [`RegistrationController`] / [`AuthenticationController`]: the
//!   ceremony state machines
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use passgate_core::{
//!     AuthenticationController, MemoryCredentialStore, RegistrationController,
//!     SessionManager, WebauthnVerifier, DEFAULT_SESSION_TTL,
//! };
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let origin = Url::parse("https://localhost:5000")?;
//! let verifier = Arc::new(WebauthnVerifier::new("localhost", &origin, "Example RP", true)?);
//! let sessions = Arc::new(SessionManager::new(DEFAULT_SESSION_TTL));
//! let store = Arc::new(MemoryCredentialStore::new());
//!
//! let registration =
//!     RegistrationController::new(sessions.clone(), store.clone(), verifier.clone());
//! let authentication = AuthenticationController::new(sessions, store, verifier);
//!
//! // Phase one: issue options for the browser and track the session.
//! let issued = registration.begin("alice").await?;
//! // ... forward issued.options to navigator.credentials.create(),
//! // then complete with the authenticator's response:
//! // registration.complete(issued.session, &challenge, &response).await?;
//! # Ok(())
//! # }
//! ```

pub mod ceremony;
pub mod credential;
pub mod error;
pub mod session;
pub mod store;
pub mod verifier;

// Re-export main types for convenience
pub use ceremony::{AuthenticatedCredential, AuthenticationController, IssuedOptions, RegistrationController};
pub use credential::CredentialRecord;
pub use error::{CeremonyError, Result};
pub use session::{CeremonyContext, CeremonyKind, SessionHandle, SessionManager, DEFAULT_SESSION_TTL};
pub use store::{CredentialStore, MemoryCredentialStore, StoreError};
pub use verifier::{
    CredentialVerifier, IssuedCeremony, VerifiedAssertion, VerifiedRegistration, VerifierError,
    WebauthnVerifier,
};
