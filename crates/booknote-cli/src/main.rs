//! BookNote CLI - sign in, sign up and onboard from the terminal.

mod commands;
mod output;

use anyhow::Result;
use booknote_api::{Genre, OnboardingRequest, PrivacyLevel};
use booknote_config::{init_logging, Config, LogConfig, Paths};
use clap::{Parser, Subcommand};
use commands::Context;

/// BookNote CLI - manage your BookNote account.
#[derive(Parser)]
#[command(name = "booknote")]
#[command(about = "BookNote CLI for account and profile management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup,

    /// Login with email and password
    Login,

    /// Logout and clear session
    Logout,

    /// Show the current session
    Status,

    /// Refresh the session tokens
    Refresh,

    /// Check whether an email is free to register
    CheckEmail {
        email: String,
    },

    /// Check whether a nickname is free to register
    CheckNickname {
        nickname: String,
    },

    /// Set favorite genres, monthly goal and privacy
    Onboarding {
        /// Favorite genre (repeat up to five times)
        #[arg(short, long = "genre")]
        genres: Vec<Genre>,

        /// Books per month
        #[arg(long, default_value_t = OnboardingRequest::DEFAULT_READING_GOAL)]
        goal: u32,

        /// Profile visibility (public, friends-only, private)
        #[arg(long, default_value_t = PrivacyLevel::default())]
        privacy: PrivacyLevel,
    },

    /// Show your profile
    Me,
}

async fn run(cli: Cli, paths: Paths, config: Config) -> Result<()> {
    let ctx = Context::init(&paths, config).await?;
    let format = &cli.format;

    match cli.command {
        Commands::Signup => commands::signup(&ctx, format).await,
        Commands::Login => commands::login(&ctx, format).await,
        Commands::Logout => commands::logout(&ctx, format).await,
        Commands::Status => commands::status(&ctx, format).await,
        Commands::Refresh => commands::refresh(&ctx, format).await,
        Commands::CheckEmail { email } => commands::check_email(&ctx, &email, format).await,
        Commands::CheckNickname { nickname } => {
            commands::check_nickname(&ctx, &nickname, format).await
        }
        Commands::Onboarding {
            genres,
            goal,
            privacy,
        } => commands::onboarding(&ctx, genres, goal, privacy, format).await,
        Commands::Me => commands::me(&ctx, format).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    let setup = Paths::new().and_then(|paths| {
        paths.ensure_dirs()?;
        let config = Config::load(&paths)?;
        Ok((paths, config))
    });
    let (paths, config) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            output::print_error(&e.to_string(), &format);
            std::process::exit(1);
        }
    };

    let log_config = LogConfig {
        default_level: cli.log_level.clone().unwrap_or_else(|| config.log_level.clone()),
        log_path: Some(paths.log_file()),
        also_stderr: false, // commands print their own errors
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = run(cli, paths, config).await {
        output::print_error(&e.to_string(), &format);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_onboarding_args() {
        let cli = Cli::try_parse_from([
            "booknote",
            "onboarding",
            "--genre",
            "fiction",
            "-g",
            "non-fiction",
            "--goal",
            "3",
            "--privacy",
            "friends-only",
        ])
        .unwrap();

        match cli.command {
            Commands::Onboarding {
                genres,
                goal,
                privacy,
            } => {
                assert_eq!(genres, vec![Genre::Fiction, Genre::NonFiction]);
                assert_eq!(goal, 3);
                assert_eq!(privacy, PrivacyLevel::FriendsOnly);
            }
            _ => panic!("expected onboarding"),
        }
    }

    #[test]
    fn test_onboarding_defaults() {
        let cli = Cli::try_parse_from(["booknote", "onboarding"]).unwrap();
        match cli.command {
            Commands::Onboarding {
                genres,
                goal,
                privacy,
            } => {
                assert!(genres.is_empty());
                assert_eq!(goal, 5);
                assert_eq!(privacy, PrivacyLevel::Private);
            }
            _ => panic!("expected onboarding"),
        }
    }

    #[test]
    fn test_unknown_genre_is_rejected() {
        assert!(Cli::try_parse_from(["booknote", "onboarding", "--genre", "gardening"]).is_err());
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::try_parse_from(["booknote", "status", "--format", "json"]).unwrap();
        assert!(matches!(cli.format, output::OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Status));
    }
}
