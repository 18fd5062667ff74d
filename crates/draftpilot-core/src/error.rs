use thiserror::Error;

use crate::settings::Role;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("client connection details not found: {0}")]
    CredentialsNotFound(String),

    #[error("malformed lockfile: {0}")]
    InvalidLockfile(String),

    #[error("request {method} {path} failed: {reason}")]
    Transport {
        method: &'static str,
        path: String,
        reason: String,
    },

    #[error("{what} failed with status {status}: {body}")]
    UnexpectedStatus {
        what: String,
        status: u16,
        body: String,
    },

    #[error("champion list unavailable (status {0})")]
    ChampionsUnavailable(u16),

    #[error("{}", champion_not_found_message(.name, .suggestions))]
    ChampionNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("'random' is only allowed as the primary pick")]
    RandomNotAllowed,

    #[error("no primary {0} champion configured")]
    NothingConfigured(Role),

    #[error("not in champion select")]
    NotInChampSelect,

    #[error("cannot build lobby lookup: {0}")]
    RevealUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unexpected response from {path}: {reason}")]
    MalformedResponse { path: String, reason: String },

    #[error("monitor thread could not be spawned: {0}")]
    MonitorSpawn(String),

    #[error("previous monitor is still shutting down, try again shortly")]
    MonitorBusy,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn champion_not_found_message(name: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        format!("champion '{name}' not found")
    } else {
        format!(
            "champion '{name}' not found (did you mean: {}?)",
            suggestions.join(", ")
        )
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
