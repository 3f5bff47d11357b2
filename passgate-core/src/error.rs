use thiserror::Error;

/// Errors a ceremony can end with.
///
/// Every failure is terminal for the current ceremony attempt; clients
/// recover by restarting with a fresh `begin`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CeremonyError {
    #[error("username already owns a registered credential")]
    AlreadyRegistered,

    #[error("no ceremony session matches the supplied handle")]
    SessionNotFound,

    #[error("ceremony session has expired")]
    SessionExpired,

    #[error("presented challenge does not match the issued challenge")]
    ChallengeMismatch,

    #[error("session belongs to a different ceremony kind")]
    WrongCeremonyKind,

    #[error("attestation verification failed")]
    AttestationInvalid,

    #[error("assertion verification failed")]
    AssertionInvalid,

    #[error("no credential registered under the claimed identifier")]
    UnknownCredential,

    #[error("authenticator did not perform required user verification")]
    UserVerificationRequired,

    #[error("signature counter did not advance; credential may be cloned")]
    PossibleCloneDetected,

    #[error("a credential with this identifier already exists")]
    DuplicateCredential,

    #[error("storage backend failure: {0}")]
    Storage(String),

    #[error("verifier failure: {0}")]
    Verifier(String),
}

impl CeremonyError {
    /// Stable internal code for structured logging and diagnostics.
    pub fn diagnostic_code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::ChallengeMismatch => "CHALLENGE_MISMATCH",
            Self::WrongCeremonyKind => "WRONG_CEREMONY_KIND",
            Self::AttestationInvalid => "ATTESTATION_INVALID",
            Self::AssertionInvalid => "ASSERTION_INVALID",
            Self::UnknownCredential => "UNKNOWN_CREDENTIAL",
            Self::UserVerificationRequired => "USER_VERIFICATION_REQUIRED",
            Self::PossibleCloneDetected => "POSSIBLE_CLONE_DETECTED",
            Self::DuplicateCredential => "DUPLICATE_CREDENTIAL",
            Self::Storage(_) => "STORAGE_FAILURE",
            Self::Verifier(_) => "VERIFIER_FAILURE",
        }
    }

    /// Sanitized message safe to show the caller.
    ///
    /// The authentication-sensitive kinds all share one message so a probe
    /// cannot distinguish an unknown credential id from a failed assertion
    /// (credential-id enumeration resistance).
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered => "User already registered",
            Self::SessionNotFound | Self::SessionExpired | Self::ChallengeMismatch => {
                "Ceremony session is invalid or has expired"
            }
            Self::WrongCeremonyKind => "Ceremony session is invalid or has expired",
            Self::AttestationInvalid | Self::DuplicateCredential => "Registration failed",
            Self::UnknownCredential
            | Self::AssertionInvalid
            | Self::UserVerificationRequired
            | Self::PossibleCloneDetected => "Authentication failed",
            Self::Storage(_) | Self::Verifier(_) => "Internal error",
        }
    }

    /// True for failures that indicate a possible security incident and
    /// must be logged distinctly even though the client message is generic.
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::PossibleCloneDetected)
    }
}

pub type Result<T> = std::result::Result<T, CeremonyError>;
