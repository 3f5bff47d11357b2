//! Credential storage
//!
//! The engine owns exactly one [`CredentialStore`]; records are appended on
//! registration and read/updated on authentication, never deleted here.
//! The in-memory implementation covers a process lifetime; a persistent
//! backend can be substituted behind the trait without touching ceremony
//! logic.

mod memory;

pub use memory::MemoryCredentialStore;

use async_trait::async_trait;

use crate::credential::CredentialRecord;
use crate::error::CeremonyError;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential identifier already present")]
    Duplicate,

    #[error("credential identifier not present")]
    Unknown,

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CeremonyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => CeremonyError::DuplicateCredential,
            StoreError::Unknown => CeremonyError::UnknownCredential,
            StoreError::Backend(msg) => CeremonyError::Storage(msg),
        }
    }
}

/// Durable mapping from credential identifier to credential record.
///
/// Single calls are atomic; calls for different keys must not interfere.
/// Implementations may suspend on I/O, so callers treat every method as
/// potentially blocking.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new record keyed by its credential id.
    async fn put(&self, record: CredentialRecord) -> Result<(), StoreError>;

    /// Fetch a record by credential id.
    async fn get(&self, credential_id: &[u8]) -> Result<CredentialRecord, StoreError>;

    /// Overwrite the stored signature counter.
    ///
    /// Monotonicity is not enforced here; the authentication controller
    /// checks it first so the violation carries ceremony context.
    async fn update_sign_count(&self, credential_id: &[u8], new_count: u32)
        -> Result<(), StoreError>;

    /// Whether any credential is bound to this username.
    async fn username_registered(&self, username: &str) -> Result<bool, StoreError>;

    /// Number of stored credentials, for monitoring.
    async fn credential_count(&self) -> Result<usize, StoreError>;
}
