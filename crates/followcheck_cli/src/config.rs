//! Configuration file support.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `FOLLOWCHECK_`)
//! 3. Config file (~/.config/followcheck/config.toml or ./followcheck.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use FOLLOWCHECK_GITHUB_TOKEN env var
//!
//! [ui]
//! language = "en"    # or "ko"
//! ```

use std::path::PathBuf;
use std::{fs, io};

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use followcheck::Language;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Display preferences.
    pub ui: UiConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub personal access token.
    /// Can also be set via FOLLOWCHECK_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
}

/// Display preferences.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Summary language, "en" or "ko".
    /// Can also be set via FOLLOWCHECK_UI_LANGUAGE environment variable.
    pub language: Option<String>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/followcheck/config.toml)
    /// 3. Local config file (./followcheck.toml)
    /// 4. Environment variables with FOLLOWCHECK_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "followcheck") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Local config file (higher priority than XDG)
        let local_config = PathBuf::from("followcheck.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./followcheck.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // FOLLOWCHECK_GITHUB_TOKEN -> github.token, etc.
        builder = builder.add_source(
            Environment::with_prefix("FOLLOWCHECK")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Get the configured display language, defaulting to English. An
    /// unrecognized value falls back to the default rather than erroring.
    pub fn language(&self) -> Language {
        self.ui
            .language
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "followcheck").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save a GitHub token to the config file.
    ///
    /// Creates the config file and parent directories if they don't exist.
    /// If a config file already exists, only the `[github]` section is
    /// updated, preserving formatting, comments, and other settings.
    pub fn save_github_token(token: &str) -> io::Result<PathBuf> {
        Self::edit_config(|doc| {
            if !doc.contains_key("github") {
                doc["github"] = toml_edit::table();
            }
            doc["github"]["token"] = toml_edit::value(token);
        })
    }

    /// Remove the stored GitHub token from the config file, if present.
    pub fn remove_github_token() -> io::Result<PathBuf> {
        Self::edit_config(|doc| {
            if let Some(github) = doc.get_mut("github") {
                if let Some(table) = github.as_table_mut() {
                    table.remove("token");
                }
            }
        })
    }

    /// Save the display language to the config file.
    pub fn save_language(language: Language) -> io::Result<PathBuf> {
        Self::edit_config(|doc| {
            if !doc.contains_key("ui") {
                doc["ui"] = toml_edit::table();
            }
            doc["ui"]["language"] = toml_edit::value(language.to_string());
        })
    }

    /// Apply an edit to the config file, preserving unrelated content.
    fn edit_config(apply: impl FnOnce(&mut toml_edit::DocumentMut)) -> io::Result<PathBuf> {
        let config_path = Self::default_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = if config_path.exists() {
            fs::read_to_string(&config_path)?
        } else {
            String::new()
        };

        // Parse as TOML document (preserves formatting and comments)
        let mut doc: toml_edit::DocumentMut = content.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid TOML: {}", e))
        })?;

        apply(&mut doc);

        fs::write(&config_path, doc.to_string())?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_token_and_english_summaries() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert!(config.ui.language.is_none());
        assert_eq!(config.language(), Language::En);
    }

    #[test]
    fn toml_content_parses_into_the_config() {
        let toml_content = r#"
            [github]
            token = "ghp_test123"

            [ui]
            language = "ko"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.github_token(), Some("ghp_test123".to_string()));
        assert_eq!(config.language(), Language::Ko);
    }

    #[test]
    fn an_unrecognized_language_falls_back_to_the_default() {
        let config = Config {
            github: GitHubConfig::default(),
            ui: UiConfig {
                language: Some("zz".to_string()),
            },
        };
        assert_eq!(config.language(), Language::En);
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let toml_content = r#"
            [github]
            token = "ghp_only"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.github_token(), Some("ghp_only".to_string()));
        assert_eq!(config.language(), Language::En);
    }

    #[test]
    fn invalid_toml_fails_to_build() {
        let invalid_toml = r#"
            [github
            token = "x"
        "#;

        let result = ConfigBuilder::builder()
            .add_source(config::File::from_str(invalid_toml, FileFormat::Toml))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let toml_content = r#"
            [ui]
            language = "en"
            theme = "does not exist"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.language(), Language::En);
    }
}
