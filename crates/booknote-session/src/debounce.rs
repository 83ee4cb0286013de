//! Debounced availability checks for the signup form.
//!
//! [`Debouncer`] is a cancellable timer: scheduling a task aborts the one
//! still pending. [`AvailabilityChecker`] uses it so that only the value
//! that stays unchanged for the full delay is sent to the server.

use booknote_api::{validation, AuthClient};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs at most one delayed task at a time.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the delay, cancelling any task still pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending task. Returns true if one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Which signup field is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckField {
    Email,
    Nickname,
}

impl CheckField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckField::Email => "email",
            CheckField::Nickname => "nickname",
        }
    }
}

/// State of one availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Nothing to check, or the last check failed.
    Idle,
    /// Waiting for input to settle.
    Pending,
    /// Request in flight.
    Checking,
    Available { message: String },
    Taken { message: String },
}

impl CheckStatus {
    /// Returns true once no check is waiting or in flight.
    pub fn is_settled(&self) -> bool {
        !matches!(self, CheckStatus::Pending | CheckStatus::Checking)
    }

    pub fn is_taken(&self) -> bool {
        matches!(self, CheckStatus::Taken { .. })
    }
}

/// Debounced email or nickname availability checker.
///
/// Feed it every edit through [`input_changed`](Self::input_changed); values
/// that fail the field's format rules are never sent.
#[derive(Debug)]
pub struct AvailabilityChecker {
    field: CheckField,
    auth: AuthClient,
    debouncer: Debouncer,
    status: Arc<watch::Sender<CheckStatus>>,
}

impl AvailabilityChecker {
    pub fn new(field: CheckField, auth: AuthClient, delay: Duration) -> Self {
        let (status, _) = watch::channel(CheckStatus::Idle);
        Self {
            field,
            auth,
            debouncer: Debouncer::new(delay),
            status: Arc::new(status),
        }
    }

    pub fn field(&self) -> CheckField {
        self.field
    }

    /// React to a new field value.
    pub fn input_changed(&mut self, value: &str) {
        let value = value.trim().to_string();

        let valid = match self.field {
            CheckField::Email => validation::validate_email(&value),
            CheckField::Nickname => validation::validate_nickname(&value),
        };
        if valid.is_err() {
            self.debouncer.cancel();
            self.status.send_replace(CheckStatus::Idle);
            return;
        }

        self.debouncer.cancel();
        self.status.send_replace(CheckStatus::Pending);

        let field = self.field;
        let auth = self.auth.clone();
        let status = Arc::clone(&self.status);
        self.debouncer.schedule(async move {
            status.send_replace(CheckStatus::Checking);

            let result = match field {
                CheckField::Email => auth.check_email(&value).await,
                CheckField::Nickname => auth.check_nickname(&value).await,
            };

            let next = match result {
                Ok(response) if response.available => CheckStatus::Available {
                    message: response.message,
                },
                Ok(response) => CheckStatus::Taken {
                    message: response.message,
                },
                Err(e) => {
                    debug!(field = field.as_str(), error = %e, "Availability check failed");
                    CheckStatus::Idle
                }
            };
            status.send_replace(next);
        });
    }

    /// Drop any pending check and return to idle.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.status.send_replace(CheckStatus::Idle);
    }

    pub fn status(&self) -> CheckStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckStatus> {
        self.status.subscribe()
    }

    /// Wait until no check is pending or in flight.
    pub async fn settled(&self) -> CheckStatus {
        let mut rx = self.status.subscribe();
        let settled = match rx.wait_for(CheckStatus::is_settled).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        settled
    }
}
