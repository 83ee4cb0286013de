//! The part of the session that survives restarts.

use crate::state::Session;
use booknote_api::User;
use booknote_storage::{LocalStore, StorageKeys};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Record stored under [`StorageKeys::AUTH_SESSION`].
///
/// Loading and error flags are transient and never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl PersistedSession {
    pub(crate) fn from_session(session: &Session) -> Self {
        Self {
            user: session.user.clone(),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            is_authenticated: session.is_authenticated(),
        }
    }

    /// Read the stored record. Missing or unreadable records load as empty.
    pub fn load(store: &LocalStore) -> Self {
        match store.get_json::<PersistedSession>(StorageKeys::AUTH_SESSION) {
            Ok(record) => record.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                Self::default()
            }
        }
    }

    /// Write the record. Failures are logged; the in-memory session stays
    /// authoritative.
    pub fn save(&self, store: &LocalStore) {
        if let Err(e) = store.set_json(StorageKeys::AUTH_SESSION, self) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    /// A record worth restoring claims authentication, carries the user and
    /// access token that claim implies, and has a refresh token to confirm
    /// it with.
    pub fn is_restorable(&self) -> bool {
        self.is_authenticated
            && self.user.is_some()
            && self.access_token.is_some()
            && self.refresh_token.is_some()
    }

    pub(crate) fn into_session(self) -> Session {
        Session {
            user: self.user,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            ..Session::default()
        }
    }
}
