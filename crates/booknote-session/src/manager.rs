//! Session management with FSM-based state tracking.
//!
//! `SessionManager` owns the session data and an explicit state machine.
//! Every operation applies its data change and phase change under one lock
//! and publishes the result as a single [`SessionSnapshot`], so observers
//! never see a half-applied update.

use crate::persistence::PersistedSession;
use crate::session_fsm::{SessionInput, SessionMachine, SessionPhase};
use crate::state::{Session, SessionSnapshot};
use crate::{AuthError, AuthResult};
use booknote_api::{ApiResult, AuthClient, AuthResponse, LoginRequest, SignupRequest, User};
use booknote_storage::LocalStore;
use parking_lot::Mutex;
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How the machine moves alongside a data mutation.
enum Step {
    Stay,
    Input(SessionInput),
    /// A sign-in attempt started from the given phase failed.
    AttemptFailed(SessionPhase),
}

struct Inner {
    session: Session,
    fsm: SessionMachine,
}

/// Feed one input to the machine.
fn advance(fsm: &mut SessionMachine, input: &SessionInput) -> AuthResult<()> {
    fsm.consume(input).map(|_| ()).map_err(|_| {
        AuthError::InvalidStateTransition(format!(
            "Cannot apply {:?} in state {:?}",
            input,
            fsm.state()
        ))
    })
}

/// Phase implied by the data alone.
fn phase_from_data(session: &Session) -> SessionPhase {
    if session.is_authenticated() {
        SessionPhase::Authenticated
    } else {
        SessionPhase::Anonymous
    }
}

/// Phase to settle on when a sign-in attempt fails.
///
/// The pre-attempt phase is only restored when this attempt is the one
/// holding the machine in `Authenticating` and it started from a settled
/// phase. Anything else means another operation interleaved, so the phase
/// is re-derived from the data.
fn phase_after_failed_attempt(
    current: SessionPhase,
    previous: SessionPhase,
    session: &Session,
) -> SessionPhase {
    if current != SessionPhase::Authenticating || previous.is_transient() {
        let phase = phase_from_data(session);
        debug!(
            current = %current,
            previous = %previous,
            phase = %phase,
            "Failed sign-in overlapped another operation"
        );
        return phase;
    }
    match previous {
        // A held session is left in place.
        SessionPhase::Rehydrating | SessionPhase::Authenticated if session.is_authenticated() => {
            previous
        }
        _ => phase_from_data(session),
    }
}

/// Session manager for authentication state.
///
/// Construct one per application and share it (e.g. in an `Arc`). Login and
/// refresh calls are not serialized against each other; when an interleaving
/// asks the machine for a transition it does not allow, the phase is
/// re-derived from the data and a warning is logged.
pub struct SessionManager {
    auth: AuthClient,
    store: LocalStore,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionManager {
    /// Create a manager, restoring any persisted session.
    ///
    /// A restored session starts in [`SessionPhase::Rehydrating`] until a
    /// refresh confirms it.
    pub fn new(auth: AuthClient, store: LocalStore) -> Self {
        let persisted = PersistedSession::load(&store);
        let mut fsm = SessionMachine::new();

        let session = if persisted.is_restorable() {
            if let Err(e) = advance(&mut fsm, &SessionInput::SessionRestored) {
                warn!(error = %e, "Could not mark restored session");
            }
            let session = persisted.into_session();
            info!(
                user_id = ?session.user.as_ref().map(|u| u.id),
                "Restored persisted session, awaiting refresh"
            );
            session
        } else {
            Session::default()
        };

        let snapshot = SessionSnapshot::capture(SessionPhase::from(fsm.state()), &session);
        let (snapshots, _) = watch::channel(snapshot);

        Self {
            auth,
            store,
            inner: Mutex::new(Inner { session, fsm }),
            snapshots,
        }
    }

    // ========================================
    // Observation
    // ========================================

    /// The latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from(self.inner.lock().fsm.state())
    }

    pub fn user(&self) -> Option<User> {
        self.inner.lock().session.user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.lock().session.access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.lock().session.refresh_token.clone()
    }

    /// The local store tokens are persisted to.
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn auth_client(&self) -> &AuthClient {
        &self.auth
    }

    // ========================================
    // Operations
    // ========================================

    /// Sign in with email and password.
    ///
    /// On failure the session's `error` holds the API message and the error
    /// is returned. A session held before the attempt is left in place.
    pub async fn login(&self, credentials: &LoginRequest) -> AuthResult<User> {
        self.authenticate("login", self.auth.login(credentials)).await
    }

    /// Create an account and sign in as it.
    pub async fn signup(&self, registration: &SignupRequest) -> AuthResult<User> {
        self.authenticate("signup", self.auth.signup(registration)).await
    }

    async fn authenticate<Fut>(&self, action: &'static str, call: Fut) -> AuthResult<User>
    where
        Fut: Future<Output = ApiResult<AuthResponse>>,
    {
        let previous = self.apply(Step::Input(SessionInput::LoginAttempt), |s| {
            s.is_loading = true;
            s.error = None;
        });

        match call.await {
            Ok(response) => {
                let user = response.user.clone();
                let access_token = response.access_token.clone();

                self.apply(Step::Input(SessionInput::LoginSucceeded), |s| {
                    s.apply_auth(response);
                    s.is_loading = false;
                });
                self.save_access_token(&access_token);
                self.persist();

                info!(user_id = user.id, action = action, "Signed in");
                Ok(user)
            }
            Err(err) => {
                let message = err.message.clone();
                self.apply(Step::AttemptFailed(previous), |s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });

                warn!(status = err.status, action = action, error = %err, "Sign-in failed");
                Err(AuthError::Api(err))
            }
        }
    }

    /// Sign out. Never fails.
    ///
    /// The server is asked to revoke the refresh token when one is held; a
    /// failure there is logged and the local session is cleared regardless.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.refresh_token() {
            if let Err(e) = self.auth.logout(&refresh_token).await {
                warn!(status = e.status, error = %e, "Remote logout failed, clearing local session anyway");
            }
        }

        self.apply(Step::Input(SessionInput::SessionCleared), Session::clear);
        if let Err(e) = self.store.clear_access_token() {
            warn!(error = %e, "Failed to remove stored access token");
        }
        self.persist();

        info!("Signed out");
    }

    /// Exchange the refresh token for a new token pair.
    ///
    /// Returns `false` without a request when no refresh token is held. A
    /// failed refresh signs out and returns `false`. Never fails.
    pub async fn refresh_tokens(&self) -> bool {
        let Some(refresh_token) = self.refresh_token() else {
            debug!("No refresh token held, skipping refresh");
            return false;
        };

        match self.auth.refresh(&refresh_token).await {
            Ok(response) => {
                let user_id = response.user.id;
                let access_token = response.access_token.clone();

                self.apply(Step::Input(SessionInput::RefreshSucceeded), |s| {
                    s.apply_auth(response);
                });
                self.save_access_token(&access_token);
                self.persist();

                info!(user_id = user_id, "Session refreshed");
                true
            }
            Err(e) => {
                warn!(status = e.status, error = %e, "Token refresh failed, signing out");
                self.logout().await;
                false
            }
        }
    }

    /// Replace the stored profile. Tokens and flags are untouched.
    pub fn set_user(&self, user: User) {
        self.apply(Step::Stay, |s| s.user = Some(user));
        self.persist();
    }

    pub fn clear_error(&self) {
        self.apply(Step::Stay, |s| s.error = None);
    }

    pub fn set_loading(&self, loading: bool) {
        self.apply(Step::Stay, |s| s.is_loading = loading);
    }

    // ========================================
    // Internals
    // ========================================

    /// Mutate the session and move the machine under one lock, then publish
    /// the snapshot if anything changed. Returns the phase held before.
    fn apply<F>(&self, step: Step, mutate: F) -> SessionPhase
    where
        F: FnOnce(&mut Session),
    {
        let mut inner = self.inner.lock();
        let old_phase = SessionPhase::from(inner.fsm.state());

        mutate(&mut inner.session);

        match step {
            Step::Stay => {}
            Step::Input(input) => {
                if let Err(e) = advance(&mut inner.fsm, &input) {
                    let phase = phase_from_data(&inner.session);
                    warn!(error = %e, phase = %phase, "Resynchronizing session phase from data");
                    inner.fsm = SessionMachine::from_state(phase.into());
                }
            }
            Step::AttemptFailed(previous) => {
                let target = phase_after_failed_attempt(old_phase, previous, &inner.session);
                let consumed = old_phase == SessionPhase::Authenticating
                    && target == SessionPhase::Anonymous
                    && advance(&mut inner.fsm, &SessionInput::LoginFailed).is_ok();
                if !consumed {
                    inner.fsm = SessionMachine::from_state(target.into());
                }
            }
        }

        let new_phase = SessionPhase::from(inner.fsm.state());
        if old_phase != new_phase {
            debug!(
                old_state = %old_phase,
                new_state = %new_phase,
                "Session state transition"
            );
        }

        let snapshot = SessionSnapshot::capture(new_phase, &inner.session);
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });

        old_phase
    }

    fn save_access_token(&self, token: &str) {
        if let Err(e) = self.store.set_access_token(token) {
            warn!(error = %e, "Failed to store access token");
        }
    }

    fn persist(&self) {
        let record = PersistedSession::from_session(&self.inner.lock().session);
        record.save(&self.store);
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
