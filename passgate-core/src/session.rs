//! Ceremony session tracking
//!
//! Every outstanding challenge lives in exactly one session. A session is
//! consumed atomically on the first completion attempt, matched or not, so
//! a challenge value can never be replayed across rounds. Abandoned
//! sessions fall to the periodic TTL sweep.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CeremonyError, Result};

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(300);

/// Which ceremony a session was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeremonyKind {
    Registration,
    Authentication,
}

/// Opaque handle identifying an outstanding session at the transport
/// boundary. Crosses the wire in its UUID text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionHandle {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One outstanding challenge.
struct CeremonySession {
    kind: CeremonyKind,
    /// Bound username; registration always has one, authentication is
    /// unbound (usernameless discovery).
    username: Option<String>,
    challenge: Vec<u8>,
    verifier_state: Vec<u8>,
    created_at: Instant,
}

/// What a consumed session hands back to its controller.
///
/// The kind is carried structurally so a session consumed on the wrong
/// completion path shows up as a mismatched variant.
#[derive(Debug)]
pub enum CeremonyContext {
    Registration {
        username: String,
        verifier_state: Vec<u8>,
    },
    Authentication {
        verifier_state: Vec<u8>,
    },
}

/// Tracks outstanding challenges and enforces one-shot use and expiry.
pub struct SessionManager {
    sessions: DashMap<SessionHandle, CeremonySession>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Record a registration ceremony bound to `username`.
    pub fn open_registration(
        &self,
        username: &str,
        challenge: Vec<u8>,
        verifier_state: Vec<u8>,
    ) -> SessionHandle {
        self.open(CeremonySession {
            kind: CeremonyKind::Registration,
            username: Some(username.to_owned()),
            challenge,
            verifier_state,
            created_at: Instant::now(),
        })
    }

    /// Record an authentication ceremony, unbound to any username.
    pub fn open_authentication(&self, challenge: Vec<u8>, verifier_state: Vec<u8>) -> SessionHandle {
        self.open(CeremonySession {
            kind: CeremonyKind::Authentication,
            username: None,
            challenge,
            verifier_state,
            created_at: Instant::now(),
        })
    }

    fn open(&self, session: CeremonySession) -> SessionHandle {
        let handle = SessionHandle::mint();
        self.sessions.insert(handle, session);
        handle
    }

    /// Atomically remove the matching session and return its context.
    ///
    /// The removal happens before any check: whether the attempt succeeds
    /// or not, the session is gone and its challenge cannot be retried.
    /// Challenge comparison is exact-byte, never text-normalized.
    pub fn consume(&self, handle: SessionHandle, presented_challenge: &[u8]) -> Result<CeremonyContext> {
        let (_, session) = self
            .sessions
            .remove(&handle)
            .ok_or(CeremonyError::SessionNotFound)?;

        if session.created_at.elapsed() > self.ttl {
            return Err(CeremonyError::SessionExpired);
        }

        if session.challenge != presented_challenge {
            return Err(CeremonyError::ChallengeMismatch);
        }

        Ok(match session.kind {
            CeremonyKind::Registration => CeremonyContext::Registration {
                // Registration sessions are always opened with a username.
                username: session.username.unwrap_or_default(),
                verifier_state: session.verifier_state,
            },
            CeremonyKind::Authentication => CeremonyContext::Authentication {
                verifier_state: session.verifier_state,
            },
        })
    }

    /// Drop sessions past their TTL. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.created_at.elapsed() <= ttl);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of outstanding sessions, for monitoring.
    pub fn outstanding(&self) -> usize {
        self.sessions.len()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("outstanding", &self.sessions.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
