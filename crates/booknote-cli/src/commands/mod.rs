//! CLI command implementations.

mod auth;
mod profile;

pub use auth::{check_email, check_nickname, login, logout, refresh, signup, status};
pub use profile::{me, onboarding};

use anyhow::{Context as _, Result};
use booknote_api::{ApiGateway, AuthClient};
use booknote_config::{Config, Paths};
use booknote_session::{bootstrap, SessionManager};
use booknote_storage::{FileStorage, LocalStore};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything a command needs, built once per invocation.
pub struct Context {
    pub config: Config,
    pub manager: Arc<SessionManager>,
}

impl Context {
    /// Open local storage, restore the session and run the start-up refresh.
    pub async fn init(paths: &Paths, config: Config) -> Result<Self> {
        let api_url = config.api_url()?;
        let storage = FileStorage::open(paths.storage_file())
            .with_context(|| format!("Failed to open {}", paths.storage_file().display()))?;
        let store = LocalStore::new(storage);

        let auth = AuthClient::new(ApiGateway::new(api_url.as_str(), store.clone()));
        let manager = Arc::new(SessionManager::new(auth, store));

        let outcome = bootstrap(&manager).await;
        debug!(outcome = ?outcome, phase = %manager.phase(), "Bootstrap finished");

        Ok(Self { config, manager })
    }

    pub fn check_delay(&self) -> Duration {
        Duration::from_millis(self.config.check_debounce_ms)
    }

    /// Fail unless the session is confirmed.
    pub fn require_login(&self) -> Result<()> {
        if !self.manager.phase().is_authenticated() {
            anyhow::bail!("Not logged in. Run 'booknote login' first");
        }
        Ok(())
    }
}

/// Read one trimmed line from stdin.
async fn prompt_line(label: &'static str) -> Result<String> {
    tokio::task::spawn_blocking(move || -> io::Result<String> {
        print!("{}: ", label);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    })
    .await?
    .map_err(Into::into)
}

/// Read a password without echo.
async fn prompt_password(label: &'static str) -> Result<String> {
    tokio::task::spawn_blocking(move || rpassword::prompt_password(format!("{}: ", label)))
        .await?
        .map_err(Into::into)
}
