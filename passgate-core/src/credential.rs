//! Registered credential record
//!
//! One record per authenticator credential, created exactly once at
//! successful registration completion and owned by the credential store.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered authenticator credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Opaque credential identifier, globally unique, the store key.
    pub credential_id: Vec<u8>,

    /// Public key material as produced by the verifier adapter.
    ///
    /// Opaque to the engine; it is handed back verbatim on every assertion
    /// verification.
    pub public_key: Vec<u8>,

    /// Authenticator signature counter. Monotonically non-decreasing;
    /// 0 means the authenticator does not support a counter.
    pub sign_count: u32,

    /// The user this credential is bound to.
    pub username: String,

    /// When registration completed.
    pub registered_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// URL-safe base64 form of the credential id, as used at the transport
    /// boundary.
    pub fn encoded_id(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.credential_id)
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("credential_id", &self.encoded_id())
            .field("sign_count", &self.sign_count)
            .field("username", &self.username)
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_id_is_base64url() {
        let record = CredentialRecord {
            credential_id: vec![0xfb, 0xef, 0xff],
            public_key: vec![],
            sign_count: 0,
            username: "alice".into(),
            registered_at: Utc::now(),
        };
        // URL-safe alphabet, no padding
        assert_eq!(record.encoded_id(), "--__");
    }
}
