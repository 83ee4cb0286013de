//! Profile endpoints. All of them require a bearer token.

use crate::{ApiGateway, ApiResult, OnboardingRequest, OnboardingStatus, User};
use tracing::debug;

/// Typed client for `/users/*`.
#[derive(Debug, Clone)]
pub struct UserClient {
    gateway: ApiGateway,
}

impl UserClient {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Submit the onboarding questionnaire and return the updated profile.
    pub async fn complete_onboarding(&self, request: &OnboardingRequest) -> ApiResult<User> {
        debug!(
            genres = request.favorite_genres.len(),
            reading_goal = request.reading_goal_monthly,
            "Completing onboarding"
        );
        self.gateway.post("/users/onboarding", request).await
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.gateway.get("/users/me").await
    }

    pub async fn onboarding_status(&self) -> ApiResult<OnboardingStatus> {
        self.gateway.get("/users/onboarding-status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Genre, PrivacyLevel};
    use booknote_storage::LocalStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, token: Option<&str>) -> UserClient {
        let store = LocalStore::in_memory();
        if let Some(token) = token {
            store.set_access_token(token).unwrap();
        }
        UserClient::new(ApiGateway::new(server.uri(), store))
    }

    fn profile() -> serde_json::Value {
        json!({
            "id": 1,
            "email": "test@example.com",
            "nickname": "testuser",
            "favoriteGenres": ["FICTION", "SCIENCE"],
            "readingGoalMonthly": 5,
            "privacyLevel": "PRIVATE",
            "onboardingCompleted": true,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        })
    }

    #[tokio::test]
    async fn test_complete_onboarding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/onboarding"))
            .and(header("authorization", "Bearer mock-access-token"))
            .and(body_json(json!({
                "favoriteGenres": ["FICTION", "SCIENCE"],
                "readingGoalMonthly": 5,
                "privacyLevel": "PRIVATE"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .expect(1)
            .mount(&server)
            .await;

        let user = client(&server, Some("mock-access-token"))
            .complete_onboarding(&OnboardingRequest {
                favorite_genres: vec![Genre::Fiction, Genre::Science],
                reading_goal_monthly: 5,
                privacy_level: PrivacyLevel::Private,
            })
            .await
            .unwrap();

        assert!(user.onboarding_completed);
        assert_eq!(user.favorite_genres, vec![Genre::Fiction, Genre::Science]);
    }

    #[tokio::test]
    async fn test_current_user_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/onboarding-status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "onboardingCompleted": true })),
            )
            .mount(&server)
            .await;

        let client = client(&server, Some("mock-access-token"));
        let user = client.current_user().await.unwrap();
        assert_eq!(user.nickname, "testuser");

        let status = client.onboarding_status().await.unwrap();
        assert!(status.onboarding_completed);
    }

    #[tokio::test]
    async fn test_unauthorized_profile_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "UNAUTHORIZED",
                "message": "Authentication required",
                "timestamp": "2024-01-01T00:00:00"
            })))
            .mount(&server)
            .await;

        let err = client(&server, None).current_user().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Authentication required");
    }
}
