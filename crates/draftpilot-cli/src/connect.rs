use anyhow::Context;
use draftpilot_core::config::ConnectionConfig;
use draftpilot_core::credentials::{default_lockfile_path, Credentials};
use draftpilot_core::HttpGateway;
use std::path::PathBuf;
use std::time::Duration;

/// Connection flags from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConnectFlags {
    pub base_url: Option<String>,
    pub port: Option<u16>,
    pub password: Option<String>,
    pub lockfile: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Where the client API will be reached, before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url {
        base_url: String,
        password: Option<String>,
    },
    Lockfile(PathBuf),
}

/// Resolve the client API target.
///
/// Priority:
/// 1. `--base-url` (with `--password` if given)
/// 2. `--port` + `--password`
/// 3. `--lockfile`
/// 4. the `connection` section of the config file, in the same order
/// 5. the platform's default lockfile location
pub fn resolve_target(flags: &ConnectFlags, config: &ConnectionConfig) -> anyhow::Result<Target> {
    if let Some(base_url) = &flags.base_url {
        return Ok(Target::Url {
            base_url: base_url.clone(),
            password: flags.password.clone().or_else(|| config.password.clone()),
        });
    }
    if let (Some(port), Some(password)) = (flags.port, &flags.password) {
        return Ok(url_for(port, password));
    }
    if let Some(lockfile) = &flags.lockfile {
        return Ok(Target::Lockfile(lockfile.clone()));
    }

    if let Some(base_url) = &config.base_url {
        return Ok(Target::Url {
            base_url: base_url.clone(),
            password: config.password.clone(),
        });
    }
    if let (Some(port), Some(password)) = (config.port, &config.password) {
        return Ok(url_for(port, password));
    }
    if let Some(lockfile) = &config.lockfile {
        return Ok(Target::Lockfile(lockfile.clone()));
    }

    default_lockfile_path()
        .map(Target::Lockfile)
        .context("cannot locate the client lockfile; pass --lockfile or --port and --password")
}

fn url_for(port: u16, password: &str) -> Target {
    let creds = Credentials::new(port, password);
    Target::Url {
        base_url: creds.base_url(),
        password: Some(creds.password),
    }
}

pub fn gateway(flags: &ConnectFlags, config: &ConnectionConfig) -> anyhow::Result<HttpGateway> {
    let timeout = flags
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout());

    let gateway = match resolve_target(flags, config)? {
        Target::Url { base_url, password } => HttpGateway::new(base_url, password, timeout),
        Target::Lockfile(path) => {
            let creds = Credentials::from_lockfile(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            HttpGateway::from_credentials(&creds, timeout)
        }
    }
    .context("failed to build http client")?;

    tracing::debug!(base_url = gateway.base_url(), "client api target");
    Ok(gateway)
}
