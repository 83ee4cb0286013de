//! Fixtures shared by the unit tests.

use crate::SessionManager;
use booknote_api::{ApiGateway, AuthClient, PrivacyLevel, User};
use booknote_storage::LocalStore;
use wiremock::MockServer;

pub(crate) fn sample_user() -> User {
    User {
        id: 1,
        email: "test@example.com".to_string(),
        nickname: "testuser".to_string(),
        profile_image_url: None,
        favorite_genres: Vec::new(),
        reading_goal_monthly: None,
        privacy_level: PrivacyLevel::Private,
        onboarding_completed: false,
        created_at: None,
        updated_at: None,
        last_login_at: None,
    }
}

pub(crate) fn auth_client_for(server: &MockServer, store: LocalStore) -> AuthClient {
    AuthClient::new(ApiGateway::new(server.uri(), store))
}

pub(crate) fn manager_for(server: &MockServer, store: LocalStore) -> SessionManager {
    SessionManager::new(auth_client_for(server, store.clone()), store)
}
