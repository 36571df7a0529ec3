//! followcheck CLI - analyze GitHub follower relationships.

mod commands;
mod config;
mod messages;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::limits::OutputFormat;

#[derive(Parser)]
#[command(name = "followcheck")]
#[command(version)]
#[command(about = "Analyze GitHub follower relationships")]
#[command(
    long_about = "Followcheck fetches a GitHub user's complete followers and following \
lists and partitions every related account into mutual, following-only, and \
follower-only. Works without a token, but an authenticated client gets a far \
higher API quota."
)]
#[command(after_long_help = r#"EXAMPLES
    Analyze a user:
        $ followcheck analyze octocat

    Analyze and write the export document:
        $ followcheck analyze octocat --export

    Check the remaining API quota:
        $ followcheck limits

    Save a personal access token:
        $ followcheck token set ghp_...

    Generate shell completions:
        $ followcheck completions bash > ~/.local/share/bash-completion/completions/followcheck

CONFIGURATION
    Followcheck reads configuration from:
      1. ~/.config/followcheck/config.toml (or $XDG_CONFIG_HOME/followcheck/config.toml)
      2. ./followcheck.toml
      3. Environment variables (FOLLOWCHECK_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    FOLLOWCHECK_GITHUB_TOKEN    GitHub personal access token
    FOLLOWCHECK_UI_LANGUAGE     Display language for the summary (en or ko)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a user's follower/following relationships
    Analyze {
        /// GitHub username to analyze
        login: String,

        #[command(flatten)]
        opts: AnalyzeOptions,
    },
    /// Show current rate limit status
    Limits {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Manage the stored GitHub token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Show or re-export recent analyses
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Set the display language for analysis summaries
    Language {
        /// Language code (en or ko)
        language: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options for the analyze command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeOptions {
    /// Write the export document next to the summary
    #[arg(short = 'e', long)]
    pub export: bool,

    /// Write the export document to this path (implies --export)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the raw export document instead of the summary
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Token to use for this run (overrides config)
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// Disable proactive request pacing (may cause API throttling)
    #[arg(short = 'R', long)]
    pub no_rate_limit: bool,
}

#[derive(Subcommand)]
pub(crate) enum TokenAction {
    /// Validate and save a personal access token to the config file
    Set {
        /// The token (classic ghp_..., fine-grained github_pat_..., or legacy hex)
        token: String,
    },
    /// Check whether the configured token is accepted by the server
    Validate,
    /// Remove the stored token from the config file
    Remove,
}

#[derive(Subcommand)]
pub(crate) enum HistoryAction {
    /// List recent analyses (default)
    List,
    /// Re-export a stored analysis
    Export {
        /// Login of the stored analysis
        login: String,

        /// Output path (defaults to the conventional export filename)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Drop all stored analyses
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging for non-TTY runs; progress bars own the terminal
    // otherwise.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("followcheck=info,followcheck_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { login, opts } => {
            commands::analyze::handle_analyze(&login, &opts, &config).await?;
        }
        Commands::Limits { output } => {
            commands::limits::handle_limits(output, &config).await?;
        }
        Commands::Token { action } => {
            commands::token::handle_token(action, &config).await?;
        }
        Commands::History { action } => {
            commands::history::handle_history(action)?;
        }
        Commands::Language { language } => {
            commands::language::handle_language(&language)?;
        }
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell);
        }
    }

    Ok(())
}
