//! Local credential and username format checks.
//!
//! These run before any network call, so a malformed token can be rejected
//! without spending quota.

/// Check whether a string looks like a GitHub personal access token.
///
/// Recognized forms: classic PATs (`ghp_` + 36 chars), fine-grained PATs
/// (`github_pat_` prefix), and the legacy 40-hex format.
#[must_use]
pub fn is_valid_token_format(token: &str) -> bool {
    if token.starts_with("ghp_") {
        return token.len() == 40;
    }
    if token.starts_with("github_pat_") {
        return token.len() > 40;
    }
    token.len() == 40 && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// Check whether a string is a syntactically valid GitHub username:
/// alphanumerics and hyphens, no leading/trailing hyphen, at most 39 chars.
#[must_use]
pub fn is_valid_login(login: &str) -> bool {
    if login.is_empty() || login.len() > 39 {
        return false;
    }
    let first_last_ok = login.starts_with(|c: char| c.is_ascii_alphanumeric())
        && login.ends_with(|c: char| c.is_ascii_alphanumeric());
    first_last_ok
        && login
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
