//! Wire types for the BookNote API.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error returned when parsing a [`Genre`] or [`PrivacyLevel`] from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Normalize user input such as `non-fiction` or `Friends Only` to the wire form.
fn wire_name(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name (e.g. `NON_FICTION`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wire = wire_name(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wire)
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum! {
    /// Book genres a reader can mark as favorites.
    Genre, "genre" {
        Fiction => ("FICTION", "Fiction"),
        NonFiction => ("NON_FICTION", "Non-fiction"),
        SelfDevelopment => ("SELF_DEVELOPMENT", "Self-development"),
        History => ("HISTORY", "History"),
        Science => ("SCIENCE", "Science"),
        Philosophy => ("PHILOSOPHY", "Philosophy"),
        Art => ("ART", "Art"),
        Travel => ("TRAVEL", "Travel"),
        Cooking => ("COOKING", "Cooking"),
        Health => ("HEALTH", "Health"),
        Business => ("BUSINESS", "Business"),
        Technology => ("TECHNOLOGY", "Technology"),
        Romance => ("ROMANCE", "Romance"),
        Mystery => ("MYSTERY", "Mystery"),
        Fantasy => ("FANTASY", "Fantasy"),
        Biography => ("BIOGRAPHY", "Biography"),
        Education => ("EDUCATION", "Education"),
        Children => ("CHILDREN", "Children"),
        Comic => ("COMIC", "Comics"),
        Other => ("OTHER", "Other"),
    }
}

wire_enum! {
    /// Who can see a reader's profile and activity.
    PrivacyLevel, "privacy level" {
        Public => ("PUBLIC", "Public"),
        FriendsOnly => ("FRIENDS_ONLY", "Friends only"),
        Private => ("PRIVATE", "Private"),
    }
}

impl Default for PrivacyLevel {
    fn default() -> Self {
        PrivacyLevel::Private
    }
}

/// A reader's profile.
///
/// Auth responses carry only the identifying fields; the preference fields
/// default until the full profile is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorite_genres: Vec<Genre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_goal_monthly: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub privacy_level: PrivacyLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl User {
    /// Account creation time, when the server sent a parseable one.
    pub fn created_at_time(&self) -> Option<NaiveDateTime> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse server timestamps, with or without an offset
/// (`2024-01-01T00:00:00.000Z`, `2024-01-01T00:00:00`).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// `{ data: ... }` wrapper used by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Session material returned by signup, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("nickname", &self.nickname)
            .finish()
    }
}

/// Body of the refresh and logout calls.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenRequest").finish_non_exhaustive()
    }
}

/// Result of an email or nickname availability check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckResponse {
    pub available: bool,
    #[serde(default)]
    pub message: String,
}

/// Answers to the onboarding questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub favorite_genres: Vec<Genre>,
    pub reading_goal_monthly: u32,
    pub privacy_level: PrivacyLevel,
}

impl OnboardingRequest {
    /// Monthly goal offered before the reader picks one.
    pub const DEFAULT_READING_GOAL: u32 = 5;
}

impl Default for OnboardingRequest {
    fn default() -> Self {
        Self {
            favorite_genres: Vec::new(),
            reading_goal_monthly: Self::DEFAULT_READING_GOAL,
            privacy_level: PrivacyLevel::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub onboarding_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_profile_decodes_with_defaults() {
        // Auth responses carry only the identifying fields.
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "email": "test@example.com",
            "nickname": "testuser",
            "profileImageUrl": null,
            "onboardingCompleted": false
        }))
        .unwrap();

        assert_eq!(user.id, 1);
        assert!(user.favorite_genres.is_empty());
        assert_eq!(user.reading_goal_monthly, None);
        assert_eq!(user.privacy_level, PrivacyLevel::Private);
        assert!(!user.onboarding_completed);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_full_profile_decodes() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "email": "reader@example.com",
            "nickname": "reader",
            "favoriteGenres": ["FICTION", "SCIENCE"],
            "readingGoalMonthly": 5,
            "privacyLevel": "FRIENDS_ONLY",
            "onboardingCompleted": true,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T10:30:00"
        }))
        .unwrap();

        assert_eq!(user.favorite_genres, vec![Genre::Fiction, Genre::Science]);
        assert_eq!(user.reading_goal_monthly, Some(5));
        assert_eq!(user.privacy_level, PrivacyLevel::FriendsOnly);
        assert_eq!(
            user.created_at_time().unwrap().to_string(),
            "2024-01-01 00:00:00"
        );
    }

    #[test]
    fn test_null_collections_default() {
        let user: User = serde_json::from_value(json!({
            "id": 2,
            "email": "a@b.co",
            "nickname": "ab",
            "favoriteGenres": null,
            "privacyLevel": null
        }))
        .unwrap();

        assert!(user.favorite_genres.is_empty());
        assert_eq!(user.privacy_level, PrivacyLevel::Private);
    }

    #[test]
    fn test_local_timestamp_parses() {
        assert!(parse_timestamp("2024-03-05T08:09:10").is_some());
        assert!(parse_timestamp("2024-03-05T08:09:10.123456").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_onboarding_request_wire_shape() {
        let request = OnboardingRequest {
            favorite_genres: vec![Genre::NonFiction, Genre::SelfDevelopment],
            reading_goal_monthly: 12,
            privacy_level: PrivacyLevel::Public,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "favoriteGenres": ["NON_FICTION", "SELF_DEVELOPMENT"],
                "readingGoalMonthly": 12,
                "privacyLevel": "PUBLIC"
            })
        );
    }

    #[test]
    fn test_onboarding_defaults() {
        let request = OnboardingRequest::default();
        assert!(request.favorite_genres.is_empty());
        assert_eq!(request.reading_goal_monthly, 5);
        assert_eq!(request.privacy_level, PrivacyLevel::Private);
    }

    #[test]
    fn test_refresh_request_uses_camel_case() {
        let body = RefreshTokenRequest {
            refresh_token: "r".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "refreshToken": "r" })
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let login = LoginRequest {
            email: "a@b.co".to_string(),
            password: "hunter22".to_string(),
        };
        let refresh = RefreshTokenRequest {
            refresh_token: "secret-refresh".to_string(),
        };

        assert!(!format!("{:?}", login).contains("hunter22"));
        assert!(!format!("{:?}", refresh).contains("secret-refresh"));
    }

    #[test]
    fn test_enum_parsing_accepts_loose_spelling() {
        assert_eq!("non-fiction".parse::<Genre>().unwrap(), Genre::NonFiction);
        assert_eq!("Self Development".parse::<Genre>().unwrap(), Genre::SelfDevelopment);
        assert_eq!("friends_only".parse::<PrivacyLevel>().unwrap(), PrivacyLevel::FriendsOnly);
        assert!("poetry".parse::<Genre>().is_err());
    }

    #[test]
    fn test_genre_catalogue() {
        assert_eq!(Genre::ALL.len(), 20);
        assert_eq!(Genre::Comic.label(), "Comics");
        assert_eq!(Genre::Comic.to_string(), "COMIC");
        assert_eq!(PrivacyLevel::ALL.len(), 3);
    }
}
