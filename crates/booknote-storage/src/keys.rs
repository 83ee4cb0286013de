//! Storage keys.

/// Keys used in local storage.
pub struct StorageKeys;

impl StorageKeys {
    /// Current access token, read by the HTTP gateway on every request.
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    /// Persisted session record used for restart recovery.
    pub const AUTH_SESSION: &'static str = "auth-storage";
}
