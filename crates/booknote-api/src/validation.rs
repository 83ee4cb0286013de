//! Client-side input constraints.
//!
//! These mirror the server's own checks so obviously bad input is rejected
//! before a round trip. The server stays authoritative.

use crate::{Genre, LoginRequest, OnboardingRequest, SignupRequest};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NICKNAME_LEN: usize = 2;
pub const MAX_NICKNAME_LEN: usize = 20;
pub const MIN_FAVORITE_GENRES: usize = 1;
pub const MAX_FAVORITE_GENRES: usize = 5;
pub const MIN_READING_GOAL: u32 = 1;
pub const MAX_READING_GOAL: u32 = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A rejected input field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Enter a valid email address")]
    EmailFormat,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Password must contain both letters and numbers")]
    PasswordComposition,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Nickname must be between {} and {} characters", MIN_NICKNAME_LEN, MAX_NICKNAME_LEN)]
    NicknameLength,

    #[error("Select between {} and {} genres", MIN_FAVORITE_GENRES, MAX_FAVORITE_GENRES)]
    GenreCount,

    #[error("Each genre can only be selected once")]
    DuplicateGenre,

    #[error("Reading goal must be between {} and {} books", MIN_READING_GOAL, MAX_READING_GOAL)]
    ReadingGoalRange,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::EmailFormat);
    }
    Ok(())
}

/// Password rules for new accounts: a minimum length with at least one
/// ASCII letter and one digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(ValidationError::PasswordComposition);
    }
    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let len = nickname.chars().count();
    if !(MIN_NICKNAME_LEN..=MAX_NICKNAME_LEN).contains(&len) {
        return Err(ValidationError::NicknameLength);
    }
    Ok(())
}

pub fn validate_genres(genres: &[Genre]) -> Result<(), ValidationError> {
    if !(MIN_FAVORITE_GENRES..=MAX_FAVORITE_GENRES).contains(&genres.len()) {
        return Err(ValidationError::GenreCount);
    }
    let mut seen = HashSet::with_capacity(genres.len());
    if !genres.iter().all(|g| seen.insert(*g)) {
        return Err(ValidationError::DuplicateGenre);
    }
    Ok(())
}

pub fn validate_reading_goal(goal: u32) -> Result<(), ValidationError> {
    if !(MIN_READING_GOAL..=MAX_READING_GOAL).contains(&goal) {
        return Err(ValidationError::ReadingGoalRange);
    }
    Ok(())
}

impl LoginRequest {
    /// Login only needs a well-formed email and some password.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(())
    }
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_nickname(&self.nickname)
    }
}

impl OnboardingRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_genres(&self.favorite_genres)?;
        validate_reading_goal(self.reading_goal_monthly)
    }
}
