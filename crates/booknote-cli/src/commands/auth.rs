//! Authentication commands.

use super::{prompt_line, prompt_password, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use booknote_api::validation::{self, validate_password_confirmation};
use booknote_api::{CheckResponse, LoginRequest, SignupRequest};
use booknote_session::{
    needs_onboarding, AvailabilityChecker, CheckField, CheckStatus, SessionSnapshot,
};
use serde::Serialize;

/// Create an account.
///
/// Email and nickname availability is checked in the background while the
/// password is being typed.
pub async fn signup(ctx: &Context, format: &OutputFormat) -> Result<()> {
    let auth = ctx.manager.auth_client().clone();
    let mut email_check = AvailabilityChecker::new(CheckField::Email, auth.clone(), ctx.check_delay());
    let mut nickname_check = AvailabilityChecker::new(CheckField::Nickname, auth, ctx.check_delay());

    let email = prompt_line("Email").await?;
    validation::validate_email(&email)?;
    email_check.input_changed(&email);

    let nickname = prompt_line("Nickname").await?;
    validation::validate_nickname(&nickname)?;
    nickname_check.input_changed(&nickname);

    let password = prompt_password("Password").await?;
    validation::validate_password(&password)?;
    let confirmation = prompt_password("Confirm password").await?;
    validate_password_confirmation(&password, &confirmation)?;

    let request = SignupRequest {
        email,
        password,
        nickname,
    };
    request.validate()?;

    for status in [email_check.settled().await, nickname_check.settled().await] {
        if let CheckStatus::Taken { message } = status {
            anyhow::bail!("{}", message);
        }
    }

    println!("Creating account...");
    let user = ctx.manager.signup(&request).await?;

    output::print_success(
        &format!("Welcome, {}! Run 'booknote onboarding' to finish setting up.", user.nickname),
        format,
    );
    Ok(())
}

/// Login with email and password.
pub async fn login(ctx: &Context, format: &OutputFormat) -> Result<()> {
    if let Some(user) = ctx.manager.user().filter(|_| ctx.manager.phase().is_authenticated()) {
        output::print_success(&format!("Already logged in as {}", user.email), format);
        return Ok(());
    }

    let email = prompt_line("Email").await?;
    let password = prompt_password("Password").await?;
    let request = LoginRequest { email, password };
    request.validate()?;

    println!("Logging in...");
    let user = ctx.manager.login(&request).await?;

    output::print_success(&format!("Logged in as {}", user.email), format);
    if needs_onboarding(&ctx.manager.snapshot()) {
        println!("Run 'booknote onboarding' to finish setting up your profile.");
    }
    Ok(())
}

/// Logout and clear session.
pub async fn logout(ctx: &Context, format: &OutputFormat) -> Result<()> {
    ctx.manager.logout().await;
    output::print_success("Logged out successfully", format);
    Ok(())
}

#[derive(Serialize)]
struct StatusReport<'a> {
    api_url: &'a str,
    #[serde(flatten)]
    session: &'a SessionSnapshot,
    needs_onboarding: bool,
}

/// Show the current session.
pub async fn status(ctx: &Context, format: &OutputFormat) -> Result<()> {
    let snapshot = ctx.manager.snapshot();

    match format {
        OutputFormat::Text => {
            output::print_row("API", &ctx.config.api_url);
            output::print_row("Session", snapshot.phase.as_str());
            match &snapshot.user {
                Some(user) => {
                    output::print_row("User", &format!("{} <{}>", user.nickname, user.email));
                    let onboarding = if user.onboarding_completed {
                        "complete"
                    } else {
                        "pending"
                    };
                    output::print_row("Onboarding", onboarding);
                }
                None => output::print_row("User", "not logged in"),
            }
        }
        OutputFormat::Json => output::print_json(&StatusReport {
            api_url: &ctx.config.api_url,
            session: &snapshot,
            needs_onboarding: needs_onboarding(&snapshot),
        }),
    }
    Ok(())
}

/// Exchange the refresh token for a new pair.
pub async fn refresh(ctx: &Context, format: &OutputFormat) -> Result<()> {
    if ctx.manager.refresh_tokens().await {
        output::print_success("Session refreshed", format);
        Ok(())
    } else {
        anyhow::bail!("Could not refresh the session. Run 'booknote login'")
    }
}

pub async fn check_email(ctx: &Context, email: &str, format: &OutputFormat) -> Result<()> {
    validation::validate_email(email)?;
    let response = ctx.manager.auth_client().check_email(email).await?;
    print_check(CheckField::Email, &response, format);
    Ok(())
}

pub async fn check_nickname(ctx: &Context, nickname: &str, format: &OutputFormat) -> Result<()> {
    validation::validate_nickname(nickname)?;
    let response = ctx.manager.auth_client().check_nickname(nickname).await?;
    print_check(CheckField::Nickname, &response, format);
    Ok(())
}

fn print_check(field: CheckField, response: &CheckResponse, format: &OutputFormat) {
    match format {
        OutputFormat::Text => {
            let verdict = if response.available { "available" } else { "taken" };
            output::print_row(field.as_str(), verdict);
            if !response.message.is_empty() {
                println!("  {}", response.message);
            }
        }
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "field": field,
            "available": response.available,
            "message": response.message,
        })),
    }
}
