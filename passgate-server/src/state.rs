//! Application state module
//!
//! Defines shared state accessible across all request handlers. The engine
//! components are constructed once at startup and injected, so tests can
//! assemble the same state around substitute stores or verifiers.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use passgate_core::{
    AuthenticationController, CredentialStore, CredentialVerifier, MemoryCredentialStore,
    RegistrationController, SessionManager, WebauthnVerifier,
};

use crate::config::Config;
use crate::error::ApiError;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Registration ceremony controller
    pub registration: Arc<RegistrationController>,
    /// Authentication ceremony controller
    pub authentication: Arc<AuthenticationController>,
    /// Session manager, exposed for the sweep task and health stats
    pub sessions: Arc<SessionManager>,
    /// Credential store, exposed for health stats
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    /// Assemble the engine from deployment configuration, with the
    /// webauthn-rs verifier and an in-memory store.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let origin = Url::parse(&config.rp_origin)
            .map_err(|e| ApiError::internal(format!("Invalid RP origin: {e}")))?;
        let verifier = WebauthnVerifier::new(
            &config.rp_id,
            &origin,
            &config.rp_name,
            config.require_user_verification,
        )
        .map_err(|e| ApiError::internal(format!("Failed to build verifier: {e:?}")))?;

        Ok(Self::with_components(
            Arc::new(SessionManager::new(Duration::from_secs(config.session_ttl_secs))),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(verifier),
        ))
    }

    /// Assemble state around explicit components (used by tests).
    pub fn with_components(
        sessions: Arc<SessionManager>,
        store: Arc<dyn CredentialStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            registration: Arc::new(RegistrationController::new(
                sessions.clone(),
                store.clone(),
                verifier.clone(),
            )),
            authentication: Arc::new(AuthenticationController::new(
                sessions.clone(),
                store.clone(),
                verifier,
            )),
            sessions,
            store,
        }
    }
}
