//! Authentication endpoints.

use crate::{
    ApiGateway, ApiResult, AuthResponse, CheckResponse, Envelope, LoginRequest,
    RefreshTokenRequest, SignupRequest,
};
use serde::de::IgnoredAny;
use tracing::debug;

/// Typed client for `/auth/*`.
///
/// Each call is a single request; nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct AuthClient {
    gateway: ApiGateway,
}

impl AuthClient {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Create an account. The new user has not completed onboarding.
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        debug!(email = %request.email, nickname = %request.nickname, "Signing up");
        let envelope: Envelope<AuthResponse> =
            self.gateway.post("/auth/signup", request).await?;
        Ok(envelope.data)
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        debug!(email = %request.email, "Logging in");
        let envelope: Envelope<AuthResponse> = self.gateway.post("/auth/login", request).await?;
        Ok(envelope.data)
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<AuthResponse> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        let envelope: Envelope<AuthResponse> = self.gateway.post("/auth/refresh", &body).await?;
        Ok(envelope.data)
    }

    /// Revoke a refresh token. The response body is ignored.
    pub async fn logout(&self, refresh_token: &str) -> ApiResult<()> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        let _: IgnoredAny = self.gateway.post("/auth/logout", &body).await?;
        Ok(())
    }

    pub async fn check_email(&self, email: &str) -> ApiResult<CheckResponse> {
        let endpoint = format!("/auth/check-email?email={}", urlencoding::encode(email));
        self.gateway.get(&endpoint).await
    }

    pub async fn check_nickname(&self, nickname: &str) -> ApiResult<CheckResponse> {
        let endpoint = format!(
            "/auth/check-nickname?nickname={}",
            urlencoding::encode(nickname)
        );
        self.gateway.get(&endpoint).await
    }
}
