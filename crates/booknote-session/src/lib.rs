//! Client session management for BookNote.
//!
//! This crate provides:
//! - [`SessionManager`]: the single source of truth for who is signed in,
//!   driven by an explicit state machine and published as snapshots
//! - [`bootstrap()`]: the start-up silent refresh
//! - [`AvailabilityChecker`]: debounced email/nickname availability checks
//! - [`ProfileService`]: onboarding and profile reloads

mod bootstrap;
mod debounce;
mod error;
mod manager;
mod persistence;
mod profile;
mod session_fsm;
mod state;

#[cfg(test)]
mod test_support;

pub use bootstrap::{bootstrap, BootstrapOutcome};
pub use debounce::{AvailabilityChecker, CheckField, CheckStatus, Debouncer};
pub use error::{AuthError, AuthResult};
pub use manager::SessionManager;
pub use persistence::PersistedSession;
pub use profile::{needs_onboarding, ProfileService};
pub use session_fsm::{SessionInput, SessionMachine, SessionPhase, SessionState};
pub use state::SessionSnapshot;
