//! Pick/ban priority lists and autopilot options.
//!
//! The monitor thread and the foreground surface share one `Settings`; every
//! access goes through its mutex and the tick only ever works on a cloned
//! `SettingsSnapshot`, so a change made mid-tick takes effect on the next one.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};

// ---------------------------------------------------------------------------
// Role / Slot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pick,
    Ban,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Pick => "pick",
            Role::Ban => "ban",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pick" | "instalock" => Ok(Role::Pick),
            "ban" | "autoban" => Ok(Role::Ban),
            other => Err(DraftError::InvalidInput(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Primary,
    Backup2,
    Backup3,
}

impl Slot {
    pub fn all() -> &'static [Slot] {
        &[Slot::Primary, Slot::Backup2, Slot::Backup3]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Primary => "primary",
            Slot::Backup2 => "backup2",
            Slot::Backup3 => "backup3",
        }
    }

    /// "1st", "2nd", "3rd" for log lines.
    pub fn ordinal(self) -> &'static str {
        match self {
            Slot::Primary => "1st",
            Slot::Backup2 => "2nd",
            Slot::Backup3 => "3rd",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Slot {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "1" | "main" => Ok(Slot::Primary),
            "backup2" | "backup_2" | "2" => Ok(Slot::Backup2),
            "backup3" | "backup_3" | "3" => Ok(Slot::Backup3),
            other => Err(DraftError::InvalidInput(format!("unknown slot '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ChampionChoice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum ChampionChoice {
    #[default]
    None,
    Random,
    Named(String),
}

impl ChampionChoice {
    pub fn is_none(&self) -> bool {
        matches!(self, ChampionChoice::None)
    }

    /// Name shown to users; `"None"` / `"Random"` for the sentinels.
    pub fn label(&self) -> &str {
        match self {
            ChampionChoice::None => "None",
            ChampionChoice::Random => "Random",
            ChampionChoice::Named(name) => name,
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionConfig
// ---------------------------------------------------------------------------

/// Priority list for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub primary: ChampionChoice,
    pub backup_2: ChampionChoice,
    pub backup_3: ChampionChoice,
    pub enabled: bool,
}

impl SelectionConfig {
    pub fn get(&self, slot: Slot) -> &ChampionChoice {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Backup2 => &self.backup_2,
            Slot::Backup3 => &self.backup_3,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut ChampionChoice {
        match slot {
            Slot::Primary => &mut self.primary,
            Slot::Backup2 => &mut self.backup_2,
            Slot::Backup3 => &mut self.backup_3,
        }
    }

    /// Configured slots in priority order, sentinels `None` skipped.
    pub fn priority(&self) -> impl Iterator<Item = (Slot, &ChampionChoice)> {
        Slot::all()
            .iter()
            .map(move |&slot| (slot, self.get(slot)))
            .filter(|(_, choice)| !choice.is_none())
    }

    pub fn has_primary(&self) -> bool {
        !self.primary.is_none()
    }

    /// `"Ahri (2nd: Zed, 3rd: Yasuo)"`, or `"None"` without a primary.
    pub fn display(&self) -> String {
        if !self.has_primary() {
            return "None".to_string();
        }
        let mut status = self.primary.label().to_string();
        let backups: Vec<String> = [Slot::Backup2, Slot::Backup3]
            .iter()
            .filter(|&&slot| !self.get(slot).is_none())
            .map(|&slot| format!("{}: {}", slot.ordinal(), self.get(slot).label()))
            .collect();
        if !backups.is_empty() {
            status.push_str(&format!(" ({})", backups.join(", ")));
        }
        status
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub pre_hover_enabled: bool,
    pub avoid_ally_hovers: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pre_hover_enabled: true,
            avoid_ally_hovers: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Consistent copy of everything the tick reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub pick: SelectionConfig,
    pub ban: SelectionConfig,
    pub options: Options,
}

impl SettingsSnapshot {
    pub fn role(&self, role: Role) -> &SelectionConfig {
        match role {
            Role::Pick => &self.pick,
            Role::Ban => &self.ban,
        }
    }

    fn role_mut(&mut self, role: Role) -> &mut SelectionConfig {
        match role {
            Role::Pick => &mut self.pick,
            Role::Ban => &mut self.ban,
        }
    }
}

/// Lock-guarded settings. Callers resolve names before calling in; no method
/// here does I/O while the lock is held.
#[derive(Debug, Default)]
pub struct Settings {
    inner: Mutex<SettingsSnapshot>,
}

impl Settings {
    pub fn new(initial: SettingsSnapshot) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SettingsSnapshot> {
        // Mutations are single assignments; a poisoned guard still holds a whole value.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        self.lock().clone()
    }

    /// Store `choice` in `slot`. Setting a primary enables the role; clearing
    /// it disables the role.
    pub fn set_slot(&self, role: Role, slot: Slot, choice: ChampionChoice) -> Result<()> {
        if choice == ChampionChoice::Random && (role != Role::Pick || slot != Slot::Primary) {
            return Err(DraftError::RandomNotAllowed);
        }
        let mut guard = self.lock();
        let config = guard.role_mut(role);
        if slot == Slot::Primary {
            config.enabled = !choice.is_none();
        }
        *config.slot_mut(slot) = choice;
        Ok(())
    }

    pub fn clear_slot(&self, role: Role, slot: Slot) {
        let mut guard = self.lock();
        let config = guard.role_mut(role);
        *config.slot_mut(slot) = ChampionChoice::None;
        if slot == Slot::Primary {
            config.enabled = false;
        }
    }

    pub fn set_enabled(&self, role: Role, enabled: bool) -> Result<bool> {
        let mut guard = self.lock();
        let config = guard.role_mut(role);
        if enabled && !config.has_primary() {
            return Err(DraftError::NothingConfigured(role));
        }
        config.enabled = enabled;
        Ok(enabled)
    }

    /// Flip a role on or off; returns the new state.
    pub fn toggle(&self, role: Role) -> Result<bool> {
        let mut guard = self.lock();
        let config = guard.role_mut(role);
        if !config.enabled && !config.has_primary() {
            return Err(DraftError::NothingConfigured(role));
        }
        config.enabled = !config.enabled;
        Ok(config.enabled)
    }

    pub fn toggle_pre_hover(&self) -> bool {
        let mut guard = self.lock();
        guard.options.pre_hover_enabled = !guard.options.pre_hover_enabled;
        guard.options.pre_hover_enabled
    }

    pub fn toggle_avoid_ally_hovers(&self) -> bool {
        let mut guard = self.lock();
        guard.options.avoid_ally_hovers = !guard.options.avoid_ally_hovers;
        guard.options.avoid_ally_hovers
    }

    pub fn set_options(&self, options: Options) {
        self.lock().options = options;
    }
}
