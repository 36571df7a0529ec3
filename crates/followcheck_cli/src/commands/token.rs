use followcheck::github::token::is_valid_token_format;
use followcheck::GitHubClient;

use crate::config::Config;
use crate::TokenAction;

pub(crate) async fn handle_token(
    action: TokenAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TokenAction::Set { token } => handle_set(&token).await,
        TokenAction::Validate => handle_validate(config).await,
        TokenAction::Remove => handle_remove(),
    }
}

async fn handle_set(token: &str) -> Result<(), Box<dyn std::error::Error>> {
    // Format check first: a malformed token is rejected without spending
    // any quota.
    if !is_valid_token_format(token) {
        return Err(
            "that does not look like a GitHub token (expected ghp_..., github_pat_..., \
             or a 40-char hex token)"
                .into(),
        );
    }

    let client = GitHubClient::new(Some(token.to_string()), None)?;
    let validation = client.validate_token().await?;
    if !validation.valid {
        return Err(format!(
            "the server rejected this token: {}",
            validation.error.as_deref().unwrap_or("unknown reason")
        )
        .into());
    }

    let path = Config::save_github_token(token)?;
    match validation.account {
        Some(account) => println!(
            "Authenticated as @{}. Token saved to {}",
            account.login,
            path.display()
        ),
        None => println!("Token saved to {}", path.display()),
    }
    Ok(())
}

async fn handle_validate(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(token) = config.github_token() else {
        return Err("no token configured; set one with: followcheck token set <TOKEN>".into());
    };

    let client = GitHubClient::new(Some(token), None)?;
    let validation = client.validate_token().await?;
    if validation.valid {
        match validation.account {
            Some(account) => println!("Token is valid. Authenticated as @{}", account.login),
            None => println!("Token is valid."),
        }
        Ok(())
    } else {
        Err(format!(
            "token rejected: {}",
            validation.error.as_deref().unwrap_or("unknown reason")
        )
        .into())
    }
}

fn handle_remove() -> Result<(), Box<dyn std::error::Error>> {
    let path = Config::remove_github_token()?;
    println!("Token removed from {}", path.display());
    Ok(())
}
