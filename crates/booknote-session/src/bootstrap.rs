//! Start-up reconciliation of a persisted session.

use crate::SessionManager;
use serde::Serialize;
use tracing::{info, warn};

/// What [`bootstrap`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// The session was already confirmed; nothing to do.
    AlreadyAuthenticated,
    /// No access token was stored; nothing to refresh.
    NoStoredToken,
    /// A silent refresh confirmed the session.
    Refreshed,
    /// The silent refresh did not succeed. A refresh the server rejected
    /// also clears the session.
    RefreshFailed,
}

/// Run once at start-up.
///
/// When the session is not confirmed but an access token is stored, a single
/// silent refresh is attempted. This settles a session restored in the
/// rehydrating phase either way.
pub async fn bootstrap(manager: &SessionManager) -> BootstrapOutcome {
    if manager.phase().is_authenticated() {
        return BootstrapOutcome::AlreadyAuthenticated;
    }

    let has_token = match manager.store().access_token() {
        Ok(token) => token.is_some(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored access token");
            false
        }
    };
    if !has_token {
        return BootstrapOutcome::NoStoredToken;
    }

    if manager.refresh_tokens().await {
        info!("Stored session confirmed");
        BootstrapOutcome::Refreshed
    } else {
        info!("Stored session could not be refreshed");
        BootstrapOutcome::RefreshFailed
    }
}
