//! Ceremony controllers
//!
//! Drive the two-phase registration and authentication ceremonies over the
//! shared session manager, credential store, and verifier adapter. Each
//! ceremony attempt moves `begin -> complete`; any completion failure is
//! terminal and the client restarts with a fresh `begin`.

mod authentication;
mod registration;

pub use authentication::{AuthenticatedCredential, AuthenticationController};
pub use registration::RegistrationController;

use serde_json::Value;

use crate::session::SessionHandle;

/// Challenge options handed back from a ceremony begin.
#[derive(Debug)]
pub struct IssuedOptions {
    /// Handle the client must present at completion.
    pub session: SessionHandle,
    /// Options document to forward to the browser credential API.
    pub options: Value,
}
