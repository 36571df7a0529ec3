//! Bounded local history of recent analyses.
//!
//! A JSON state file keyed under a fixed name: the most recent analyses,
//! newest first, capped at [`MAX_RECENT_ANALYSES`], a new entry replacing
//! any older entry for the same login. An absent or corrupt file falls back
//! to an empty history, never an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::analysis::types::AnalysisResult;

/// How many recent analyses are retained.
pub const MAX_RECENT_ANALYSES: usize = 10;

/// File name of the state file inside the state directory.
const STATE_FILE_NAME: &str = "state.json";

/// The two supported display languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ko,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ko" => Ok(Self::Ko),
            other => Err(format!("unsupported language: {other} (expected en or ko)")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Ko => write!(f, "ko"),
        }
    }
}

/// On-disk shape of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredState {
    /// Recent analyses, newest first.
    pub analyses: Vec<AnalysisResult>,
}

/// JSON-file-backed store for recent analyses.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store at the platform state directory
    /// (`~/.local/state/followcheck/state.json` on Linux).
    #[must_use]
    pub fn open_default() -> Option<Self> {
        let dirs = ProjectDirs::from("", "", "followcheck")?;
        let state_dir = dirs
            .state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.data_dir().to_path_buf());
        Some(Self::at(state_dir.join(STATE_FILE_NAME)))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state, falling back to defaults on a missing or
    /// unreadable file.
    #[must_use]
    pub fn load(&self) -> StoredState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return StoredState::default(),
        };
        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "state file corrupt, starting fresh");
                StoredState::default()
            }
        }
    }

    /// Write the state file, creating parent directories as needed.
    pub fn save(&self, state: &StoredState) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, content)
    }

    /// Record a completed analysis: newest first, same-login replacement
    /// (logins compare case-insensitively), capped at
    /// [`MAX_RECENT_ANALYSES`].
    pub fn record_analysis(&self, result: &AnalysisResult) -> io::Result<()> {
        let mut state = self.load();
        state
            .analyses
            .retain(|a| !a.target_login.eq_ignore_ascii_case(&result.target_login));
        state.analyses.insert(0, result.clone());
        state.analyses.truncate(MAX_RECENT_ANALYSES);
        self.save(&state)
    }

    /// Find the most recent analysis for a login.
    #[must_use]
    pub fn find(&self, login: &str) -> Option<AnalysisResult> {
        self.load()
            .analyses
            .into_iter()
            .find(|a| a.target_login.eq_ignore_ascii_case(login))
    }

    /// Drop all stored analyses.
    pub fn clear(&self) -> io::Result<()> {
        self.save(&StoredState::default())
    }
}
