//! HTTP access to the BookNote API.
//!
//! This crate provides:
//! - [`ApiGateway`]: base-URL resolution, JSON bodies, bearer-token
//!   attachment and uniform error translation
//! - [`AuthClient`] and [`UserClient`]: typed operations per endpoint
//! - Wire types and client-side input validation

mod auth;
mod error;
mod gateway;
mod types;
mod user;
pub mod validation;

pub use auth::AuthClient;
pub use error::{
    ApiError, ApiResult, DEFAULT_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
pub use gateway::{ApiGateway, AUTH_PREFIX};
pub use types::{
    AuthResponse, CheckResponse, Envelope, Genre, LoginRequest, OnboardingRequest,
    OnboardingStatus, ParseEnumError, PrivacyLevel, RefreshTokenRequest, SignupRequest, User,
};
pub use user::UserClient;
pub use validation::ValidationError;
