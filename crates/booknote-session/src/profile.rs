//! Onboarding and profile reloads for the signed-in reader.

use crate::{AuthResult, SessionManager, SessionSnapshot};
use booknote_api::{OnboardingRequest, OnboardingStatus, User, UserClient};
use std::sync::Arc;
use tracing::{debug, info};

/// True when a confirmed session belongs to a reader who has not finished
/// onboarding yet.
pub fn needs_onboarding(snapshot: &SessionSnapshot) -> bool {
    snapshot.phase.is_authenticated()
        && snapshot
            .user
            .as_ref()
            .is_some_and(|user| !user.onboarding_completed)
}

/// Profile operations that keep the session's copy of the user current.
#[derive(Debug, Clone)]
pub struct ProfileService {
    users: UserClient,
    manager: Arc<SessionManager>,
}

impl ProfileService {
    pub fn new(users: UserClient, manager: Arc<SessionManager>) -> Self {
        Self { users, manager }
    }

    /// Build a service that talks through the manager's own gateway.
    pub fn for_manager(manager: Arc<SessionManager>) -> Self {
        let users = UserClient::new(manager.auth_client().gateway().clone());
        Self::new(users, manager)
    }

    /// Validate and submit the onboarding answers.
    ///
    /// The returned profile replaces the session's user when one is held.
    pub async fn complete_onboarding(&self, request: &OnboardingRequest) -> AuthResult<User> {
        request.validate()?;

        let user = self.users.complete_onboarding(request).await?;
        if self.manager.user().is_some() {
            self.manager.set_user(user.clone());
        }

        info!(user_id = user.id, "Onboarding completed");
        Ok(user)
    }

    /// Fetch the full profile and store it in the session.
    pub async fn reload_current_user(&self) -> AuthResult<User> {
        let user = self.users.current_user().await?;
        debug!(user_id = user.id, "Reloaded profile");
        self.manager.set_user(user.clone());
        Ok(user)
    }

    pub async fn onboarding_status(&self) -> AuthResult<OnboardingStatus> {
        Ok(self.users.onboarding_status().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{manager_for, sample_user};
    use crate::{AuthError, SessionPhase};
    use booknote_api::{Genre, ValidationError};
    use booknote_storage::LocalStore;
    use serde_json::json;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn onboarded_profile() -> serde_json::Value {
        json!({
            "id": 1,
            "email": "test@example.com",
            "nickname": "testuser",
            "favoriteGenres": ["FICTION", "SCIENCE"],
            "readingGoalMonthly": 5,
            "privacyLevel": "PRIVATE",
            "onboardingCompleted": true
        })
    }

    fn service(server: &MockServer) -> ProfileService {
        let manager = Arc::new(manager_for(server, LocalStore::in_memory()));
        ProfileService::for_manager(manager)
    }

    #[tokio::test]
    async fn test_invalid_onboarding_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let service = service(&server);

        let err = service
            .complete_onboarding(&OnboardingRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Validation(ValidationError::GenreCount));
    }

    #[tokio::test]
    async fn test_onboarding_without_session_user_leaves_session_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/onboarding"))
            .respond_with(ResponseTemplate::new(200).set_body_json(onboarded_profile()))
            .mount(&server)
            .await;
        let service = service(&server);

        let request = OnboardingRequest {
            favorite_genres: vec![Genre::Fiction, Genre::Science],
            ..OnboardingRequest::default()
        };
        let user = service.complete_onboarding(&request).await.unwrap();

        assert!(user.onboarding_completed);
        assert!(service.manager.user().is_none());
    }

    #[tokio::test]
    async fn test_reload_current_user_updates_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(onboarded_profile()))
            .mount(&server)
            .await;
        let service = service(&server);

        let user = service.reload_current_user().await.unwrap();
        assert_eq!(service.manager.user(), Some(user));
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Unauthorized"
            })))
            .mount(&server)
            .await;
        let service = service(&server);
        service.manager.set_user(sample_user());

        let err = service.reload_current_user().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(service.manager.user(), Some(sample_user()));
    }

    #[tokio::test]
    async fn test_onboarding_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/onboarding-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "onboardingCompleted": false })),
            )
            .mount(&server)
            .await;

        let status = service(&server).onboarding_status().await.unwrap();
        assert!(!status.onboarding_completed);
    }

    #[test]
    fn test_needs_onboarding() {
        let mut snapshot = SessionSnapshot::anonymous();
        snapshot.user = Some(sample_user());
        snapshot.access_token = Some("a".to_string());
        snapshot.is_authenticated = true;
        // Not yet confirmed.
        assert!(!needs_onboarding(&snapshot));

        snapshot.phase = SessionPhase::Authenticated;
        assert!(needs_onboarding(&snapshot));

        if let Some(user) = snapshot.user.as_mut() {
            user.onboarding_completed = true;
        }
        assert!(!needs_onboarding(&snapshot));
    }
}
