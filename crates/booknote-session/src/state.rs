//! Session data and the snapshots observers receive.

use crate::SessionPhase;
use booknote_api::{AuthResponse, User};
use serde::Serialize;

/// Mutable session data owned by the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) user: Option<User>,
    pub(crate) access_token: Option<String>,
    pub(crate) refresh_token: Option<String>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
}

impl Session {
    /// Derived: a user and an access token are both held.
    pub(crate) fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// Adopt the user and token pair from an auth response.
    pub(crate) fn apply_auth(&mut self, response: AuthResponse) {
        self.user = Some(response.user);
        self.access_token = Some(response.access_token);
        self.refresh_token = Some(response.refresh_token);
    }

    /// Drop user and tokens. `is_loading` is left alone.
    pub(crate) fn clear(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.error = None;
    }
}

/// Immutable view of the session at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user: Option<User>,
    #[serde(skip)]
    pub access_token: Option<String>,
    #[serde(skip)]
    pub refresh_token: Option<String>,
    /// True iff `user` and `access_token` are both present.
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionSnapshot {
    pub(crate) fn capture(phase: SessionPhase, session: &Session) -> Self {
        Self {
            phase,
            user: session.user.clone(),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            is_authenticated: session.is_authenticated(),
            is_loading: session.is_loading,
            error: session.error.clone(),
        }
    }

    /// Empty anonymous session.
    pub fn anonymous() -> Self {
        Self::capture(SessionPhase::Anonymous, &Session::default())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}
