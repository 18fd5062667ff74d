use crate::autopilot::DISABLE_KEYWORDS;
use crate::error::Result;
use crate::monitor::MonitorTiming;
use crate::settings::{ChampionChoice, Options, Role, SelectionConfig, SettingsSnapshot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ConnectionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub lockfile: Option<PathBuf>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            lockfile: None,
            port: None,
            password: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_active_interval_ms")]
    pub active_interval_ms: u64,
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
    #[serde(default = "default_seat_interval_ms")]
    pub seat_interval_ms: u64,
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

fn default_active_interval_ms() -> u64 {
    200
}

fn default_idle_interval_ms() -> u64 {
    500
}

fn default_seat_interval_ms() -> u64 {
    300
}

fn default_error_backoff_ms() -> u64 {
    1000
}

fn default_max_consecutive_errors() -> u32 {
    10
}

fn default_stop_timeout_ms() -> u64 {
    2000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            active_interval_ms: default_active_interval_ms(),
            idle_interval_ms: default_idle_interval_ms(),
            seat_interval_ms: default_seat_interval_ms(),
            error_backoff_ms: default_error_backoff_ms(),
            max_consecutive_errors: default_max_consecutive_errors(),
            stop_timeout_ms: default_stop_timeout_ms(),
        }
    }
}

impl MonitorConfig {
    pub fn timing(&self) -> MonitorTiming {
        MonitorTiming {
            active_interval: Duration::from_millis(self.active_interval_ms),
            idle_interval: Duration::from_millis(self.idle_interval_ms),
            seat_interval: Duration::from_millis(self.seat_interval_ms),
            error_backoff: Duration::from_millis(self.error_backoff_ms),
            max_consecutive_errors: self.max_consecutive_errors.max(1),
            stop_timeout: Duration::from_millis(self.stop_timeout_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionNames
// ---------------------------------------------------------------------------

/// Champion names as written in the file; resolved when the autopilot runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionNames {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub backup_2: Option<String>,
    #[serde(default)]
    pub backup_3: Option<String>,
}

impl SelectionNames {
    fn slots(&self) -> [(&'static str, &Option<String>); 3] {
        [
            ("primary", &self.primary),
            ("backup_2", &self.backup_2),
            ("backup_3", &self.backup_3),
        ]
    }

    fn to_selection(&self, role: Role) -> SelectionConfig {
        let primary = choice_from(self.primary.as_deref(), role == Role::Pick);
        SelectionConfig {
            enabled: !primary.is_none(),
            primary,
            backup_2: choice_from(self.backup_2.as_deref(), false),
            backup_3: choice_from(self.backup_3.as_deref(), false),
        }
    }
}

fn choice_from(name: Option<&str>, allow_random: bool) -> ChampionChoice {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return ChampionChoice::None;
    };
    let lowered = name.to_lowercase();
    if DISABLE_KEYWORDS.contains(&lowered.as_str()) {
        ChampionChoice::None
    } else if lowered == "random" {
        if allow_random {
            ChampionChoice::Random
        } else {
            ChampionChoice::None
        }
    } else {
        ChampionChoice::Named(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// OptionsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default = "default_true")]
    pub pre_hover: bool,
    #[serde(default = "default_true")]
    pub avoid_ally_hovers: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            pre_hover: true,
            avoid_ally_hovers: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub pick: SelectionNames,
    #[serde(default)]
    pub ban: SelectionNames,
    #[serde(default)]
    pub options: OptionsConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: AppConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Initial autopilot settings. `random` outside the primary pick is dropped.
    pub fn settings(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            pick: self.pick.to_selection(Role::Pick),
            ban: self.ban.to_selection(Role::Ban),
            options: Options {
                pre_hover_enabled: self.options.pre_hover,
                avoid_ally_hovers: self.options.avoid_ally_hovers,
            },
        }
    }

    pub fn timing(&self) -> MonitorTiming {
        self.monitor.timing()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let intervals = [
            ("active_interval_ms", self.monitor.active_interval_ms),
            ("idle_interval_ms", self.monitor.idle_interval_ms),
            ("seat_interval_ms", self.monitor.seat_interval_ms),
        ];
        for (key, value) in intervals {
            if value == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("monitor.{key} is 0; the client will be polled without pause"),
                });
            }
        }

        if self.monitor.max_consecutive_errors == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "monitor.max_consecutive_errors is 0; treated as 1".to_string(),
            });
        }

        if self.connection.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "connection.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.connection.port.is_some() != self.connection.password.is_some() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "connection.port and connection.password are only used together"
                    .to_string(),
            });
        }

        for (role, names) in [("pick", &self.pick), ("ban", &self.ban)] {
            for (slot, name) in names.slots() {
                let is_random = name
                    .as_deref()
                    .is_some_and(|n| n.trim().eq_ignore_ascii_case("random"));
                if is_random && !(role == "pick" && slot == "primary") {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "{role}.{slot}: 'random' is only allowed as the primary pick; ignored"
                        ),
                    });
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.connection.timeout_secs, 5);
        assert_eq!(cfg.timing(), MonitorTiming::default());
        assert_eq!(cfg.settings(), SettingsSnapshot::default());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let yaml = r#"
monitor:
  active_interval_ms: 100
options:
  pre_hover: false
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.monitor.active_interval_ms, 100);
        assert_eq!(cfg.monitor.idle_interval_ms, 500);
        let settings = cfg.settings();
        assert!(!settings.options.pre_hover_enabled);
        assert!(settings.options.avoid_ally_hovers);
    }

    #[test]
    fn names_become_settings() {
        let yaml = r#"
pick:
  primary: random
  backup_2: Zed
ban:
  primary: "off"
  backup_2: Yasuo
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let settings = cfg.settings();
        assert_eq!(settings.pick.primary, ChampionChoice::Random);
        assert!(settings.pick.enabled);
        assert_eq!(settings.pick.backup_2, ChampionChoice::Named("Zed".into()));
        assert!(settings.ban.primary.is_none());
        assert!(!settings.ban.enabled);
    }

    #[test]
    fn validate_flags_random_ban_and_zero_interval() {
        let yaml = r#"
monitor:
  idle_interval_ms: 0
ban:
  primary: Random
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.message.contains("idle_interval_ms")));
        assert!(warnings.iter().any(|w| w.message.contains("ban.primary")));
        assert!(cfg.settings().ban.primary.is_none());
    }

    #[test]
    fn validate_zero_timeout_is_error() {
        let mut cfg = AppConfig::default();
        cfg.connection.timeout_secs = 0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn loads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draftpilot.yaml");
        std::fs::write(
            &path,
            "connection:\n  port: 2999\n  password: pw\npick:\n  primary: Ahri\n",
        )
        .unwrap();
        let cfg = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(cfg.connection.port, Some(2999));
        assert_eq!(cfg.pick.primary.as_deref(), Some("Ahri"));
        assert!(AppConfig::load(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn zero_error_threshold_is_clamped() {
        let mut cfg = AppConfig::default();
        cfg.monitor.max_consecutive_errors = 0;
        assert_eq!(cfg.timing().max_consecutive_errors, 1);
    }
}
