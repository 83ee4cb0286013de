//! Session state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!                  SessionRestored
//! ┌─────────────┐ ─────────────────► ┌─────────────┐
//! │  Anonymous  │                    │ Rehydrating │
//! └──────┬──────┘ ◄───────────────── └──────┬──────┘
//!        │         SessionCleared           │
//!        │ LoginAttempt                     │ RefreshSucceeded
//!        ▼                                  ▼
//! ┌────────────────┐  LoginSucceeded  ┌───────────────┐
//! │ Authenticating │ ───────────────► │ Authenticated │ ◄─┐ RefreshSucceeded
//! └───────┬────────┘                  └───────┬───────┘ ──┘
//!         │ LoginFailed                       │ SessionCleared
//!         ▼                                   ▼
//!     Anonymous                           Anonymous
//! ```
//!
//! `LoginAttempt` is also accepted from `Rehydrating`, `Authenticated` and
//! `Authenticating` (overlapping attempts), and `SessionCleared` from every
//! state.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Anonymous)

    Anonymous => {
        SessionRestored => Rehydrating,
        LoginAttempt => Authenticating,
        SessionCleared => Anonymous
    },
    Rehydrating => {
        RefreshSucceeded => Authenticated,
        LoginAttempt => Authenticating,
        SessionCleared => Anonymous
    },
    Authenticating => {
        LoginAttempt => Authenticating,
        LoginSucceeded => Authenticated,
        LoginFailed => Anonymous,
        SessionCleared => Anonymous
    },
    Authenticated => {
        RefreshSucceeded => Authenticated,
        LoginAttempt => Authenticating,
        SessionCleared => Anonymous
    }
}

pub use session_machine::Input as SessionInput;
pub use session_machine::State as SessionState;
pub use session_machine::StateMachine as SessionMachine;

/// Where the session stands, for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nobody is signed in.
    Anonymous,
    /// Restored from storage, not yet confirmed by a refresh.
    Rehydrating,
    /// A login or signup is in flight.
    Authenticating,
    /// Signed in and confirmed by the server.
    Authenticated,
}

impl SessionPhase {
    /// Returns true only for a confirmed session.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated)
    }

    /// Returns true while waiting on the server.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionPhase::Rehydrating | SessionPhase::Authenticating)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Anonymous => "anonymous",
            SessionPhase::Rehydrating => "rehydrating",
            SessionPhase::Authenticating => "authenticating",
            SessionPhase::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&SessionState> for SessionPhase {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Anonymous => SessionPhase::Anonymous,
            SessionState::Rehydrating => SessionPhase::Rehydrating,
            SessionState::Authenticating => SessionPhase::Authenticating,
            SessionState::Authenticated => SessionPhase::Authenticated,
        }
    }
}

impl From<SessionPhase> for SessionState {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Anonymous => SessionState::Anonymous,
            SessionPhase::Rehydrating => SessionState::Rehydrating,
            SessionPhase::Authenticating => SessionState::Authenticating,
            SessionPhase::Authenticated => SessionState::Authenticated,
        }
    }
}
