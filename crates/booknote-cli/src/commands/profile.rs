//! Profile commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use booknote_api::{Genre, OnboardingRequest, PrivacyLevel};
use booknote_session::ProfileService;

/// Submit the onboarding questionnaire.
pub async fn onboarding(
    ctx: &Context,
    genres: Vec<Genre>,
    goal: u32,
    privacy: PrivacyLevel,
    format: &OutputFormat,
) -> Result<()> {
    ctx.require_login()?;

    if genres.is_empty() {
        let choices: Vec<&str> = Genre::ALL.iter().map(|g| g.as_str()).collect();
        anyhow::bail!(
            "Pick at least one --genre. Choices: {}",
            choices.join(", ")
        );
    }

    let request = OnboardingRequest {
        favorite_genres: genres,
        reading_goal_monthly: goal,
        privacy_level: privacy,
    };

    let service = ProfileService::for_manager(ctx.manager.clone());
    let user = service.complete_onboarding(&request).await?;

    output::print_success(
        &format!("Profile set up for {}. Happy reading!", user.nickname),
        format,
    );
    Ok(())
}

/// Fetch and show the signed-in reader's profile.
pub async fn me(ctx: &Context, format: &OutputFormat) -> Result<()> {
    ctx.require_login()?;

    let service = ProfileService::for_manager(ctx.manager.clone());
    let user = service.reload_current_user().await?;

    match format {
        OutputFormat::Text => {
            output::print_row("ID", &user.id.to_string());
            output::print_row("Email", &user.email);
            output::print_row("Nickname", &user.nickname);
            let genres: Vec<&str> = user.favorite_genres.iter().map(|g| g.label()).collect();
            output::print_row("Genres", &genres.join(", "));
            if let Some(goal) = user.reading_goal_monthly {
                output::print_row("Monthly goal", &format!("{} books", goal));
            }
            output::print_row("Privacy", user.privacy_level.label());
            output::print_row(
                "Onboarding",
                if user.onboarding_completed {
                    "complete"
                } else {
                    "pending"
                },
            );
            if let Some(created) = user.created_at_time() {
                output::print_row("Member since", &created.format("%Y-%m-%d").to_string());
            }
        }
        OutputFormat::Json => output::print_json(&user),
    }
    Ok(())
}
