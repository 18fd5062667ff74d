//! Connection details for the local client API.
//!
//! The client writes a lockfile while it runs:
//! ```text
//! LeagueClient:<pid>:<port>:<password>:<protocol>
//! ```

use std::path::{Path, PathBuf};

use crate::error::{DraftError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub port: u16,
    pub password: String,
    pub protocol: String,
}

impl Credentials {
    pub fn new(port: u16, password: impl Into<String>) -> Self {
        Self {
            port,
            password: password.into(),
            protocol: "https".to_string(),
        }
    }

    pub fn parse_lockfile(content: &str) -> Result<Self> {
        let parts: Vec<&str> = content.trim().split(':').collect();
        if parts.len() < 5 {
            return Err(DraftError::InvalidLockfile(format!(
                "expected 5 fields, found {}",
                parts.len()
            )));
        }
        let port: u16 = parts[2]
            .parse()
            .map_err(|_| DraftError::InvalidLockfile(format!("bad port '{}'", parts[2])))?;
        let password = parts[3];
        if password.is_empty() {
            return Err(DraftError::InvalidLockfile("empty password".into()));
        }
        let protocol = if parts[4].is_empty() { "https" } else { parts[4] };
        Ok(Self {
            port,
            password: password.to_string(),
            protocol: protocol.to_string(),
        })
    }

    pub fn from_lockfile(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DraftError::CredentialsNotFound(format!(
                "no lockfile at {} (is the client running?)",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse_lockfile(&content)
    }

    pub fn base_url(&self) -> String {
        format!("{}://127.0.0.1:{}", self.protocol, self.port)
    }
}

/// Where the client keeps its lockfile on this platform.
pub fn default_lockfile_path() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        let candidates = [
            PathBuf::from(r"C:\Riot Games\League of Legends\lockfile"),
            PathBuf::from(r"C:\Program Files\Riot Games\League of Legends\lockfile"),
            PathBuf::from(r"C:\Program Files (x86)\Riot Games\League of Legends\lockfile"),
        ];
        if let Some(found) = candidates.iter().find(|p| p.exists()) {
            return Some(found.clone());
        }
        return std::env::var_os("LOCALAPPDATA")
            .map(|dir| PathBuf::from(dir).join(r"Riot Games\League of Legends\lockfile"));
    }

    let home = home::home_dir()?;
    if cfg!(target_os = "macos") {
        Some(home.join("Library/Application Support/Riot Games/League of Legends/lockfile"))
    } else {
        Some(home.join(".local/share/Riot Games/League of Legends/lockfile"))
    }
}
