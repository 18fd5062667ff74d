//! Foreground handle on the champion select autopilot.
//!
//! `Autopilot` owns the shared settings, the champion registry, and the
//! background monitor thread. Configuration calls resolve champion names
//! before touching the settings lock, so they never block on the network
//! while the monitor is waiting to copy the settings.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DraftError, Result};
use crate::gateway::Gateway;
use crate::monitor::{Monitor, MonitorPhase, MonitorStatus, MonitorTiming};
use crate::registry::{ChampionRegistry, DEFAULT_SUGGESTIONS};
use crate::settings::{ChampionChoice, Options, Role, SelectionConfig, Settings, SettingsSnapshot, Slot};

/// Words that clear a slot instead of naming a champion.
pub const DISABLE_KEYWORDS: &[&str] = &["none", "off", "disable", "99"];

const RANDOM_KEYWORD: &str = "random";

const MONITOR_THREAD_NAME: &str = "champ-select-monitor";

struct MonitorHandle {
    stop_tx: Sender<()>,
    done_rx: Receiver<()>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RoleStatus {
    pub enabled: bool,
    pub primary: String,
    pub backup_2: String,
    pub backup_3: String,
    pub display: String,
}

impl From<&SelectionConfig> for RoleStatus {
    fn from(config: &SelectionConfig) -> Self {
        Self {
            enabled: config.enabled,
            primary: config.primary.label().to_string(),
            backup_2: config.backup_2.label().to_string(),
            backup_3: config.backup_3.label().to_string(),
            display: config.display(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AutopilotStatus {
    pub pick: RoleStatus,
    pub ban: RoleStatus,
    pub options: Options,
    pub running: bool,
    pub phase: MonitorPhase,
    pub consecutive_errors: u32,
    pub champions_loaded: usize,
    pub started_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

pub struct Autopilot {
    gateway: Arc<dyn Gateway>,
    registry: Arc<ChampionRegistry>,
    settings: Arc<Settings>,
    timing: MonitorTiming,
    /// Status of the most recent run. Each run gets its own, so a detached
    /// loop that exits late cannot overwrite its successor's.
    status: Mutex<Arc<MonitorStatus>>,
    handle: Mutex<Option<MonitorHandle>>,
    /// Done signal of a run that did not stop within `stop_timeout`.
    draining: Mutex<Option<Receiver<()>>>,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl Autopilot {
    pub fn new(gateway: Arc<dyn Gateway>, initial: SettingsSnapshot, timing: MonitorTiming) -> Self {
        let registry = Arc::new(ChampionRegistry::new(gateway.clone()));
        Self::with_registry(gateway, registry, initial, timing)
    }

    pub fn with_registry(
        gateway: Arc<dyn Gateway>,
        registry: Arc<ChampionRegistry>,
        initial: SettingsSnapshot,
        timing: MonitorTiming,
    ) -> Self {
        Self {
            gateway,
            registry,
            settings: Arc::new(Settings::new(initial)),
            timing,
            status: Mutex::new(Arc::new(MonitorStatus::default())),
            handle: Mutex::new(None),
            draining: Mutex::new(None),
            started_at: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &ChampionRegistry {
        &self.registry
    }

    pub fn settings(&self) -> SettingsSnapshot {
        self.settings.snapshot()
    }

    pub fn reload_champions(&self) -> Result<usize> {
        self.registry.load()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Configure one slot from user input. Returns what was stored.
    ///
    /// `none`/`off`/`disable`/`99` clear the slot; `random` is accepted only
    /// for the primary pick. Unknown names fail with suggestions and leave the
    /// settings untouched.
    pub fn set_champion(&self, role: Role, slot: Slot, name: &str) -> Result<ChampionChoice> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DraftError::InvalidInput("champion name is empty".into()));
        }
        let lowered = trimmed.to_lowercase();

        if DISABLE_KEYWORDS.contains(&lowered.as_str()) {
            self.settings.clear_slot(role, slot);
            tracing::info!(role = %role, slot = %slot, "slot cleared");
            return Ok(ChampionChoice::None);
        }

        let choice = if lowered == RANDOM_KEYWORD {
            ChampionChoice::Random
        } else {
            match self.registry.find(trimmed) {
                Some(entry) => ChampionChoice::Named(entry.display),
                None => {
                    return Err(DraftError::ChampionNotFound {
                        name: trimmed.to_string(),
                        suggestions: self.registry.suggestions(trimmed, DEFAULT_SUGGESTIONS),
                    })
                }
            }
        };

        self.settings.set_slot(role, slot, choice.clone())?;
        tracing::info!(role = %role, slot = %slot, champion = choice.label(), "slot set");
        Ok(choice)
    }

    pub fn clear_champion(&self, role: Role, slot: Slot) {
        self.settings.clear_slot(role, slot);
    }

    pub fn set_enabled(&self, role: Role, enabled: bool) -> Result<bool> {
        self.settings.set_enabled(role, enabled)
    }

    pub fn toggle(&self, role: Role) -> Result<bool> {
        self.settings.toggle(role)
    }

    pub fn toggle_pre_hover(&self) -> bool {
        self.settings.toggle_pre_hover()
    }

    pub fn toggle_avoid_ally_hovers(&self) -> bool {
        self.settings.toggle_avoid_ally_hovers()
    }

    pub fn set_options(&self, options: Options) {
        self.settings.set_options(options);
    }

    /// Clear configured names the loaded registry cannot resolve, e.g. typos
    /// in a config file. Clearing a primary disables its role. Returns the
    /// cleared names; does nothing until the champion list is loaded.
    pub fn reconcile_names(&self) -> Vec<(Role, Slot, String)> {
        if !self.registry.is_loaded() {
            return Vec::new();
        }
        let snapshot = self.settings.snapshot();
        let mut cleared = Vec::new();
        for role in [Role::Pick, Role::Ban] {
            for (slot, choice) in snapshot.role(role).priority() {
                let ChampionChoice::Named(name) = choice else {
                    continue;
                };
                if self.registry.find(name).is_none() {
                    self.settings.clear_slot(role, slot);
                    tracing::warn!(role = %role, slot = %slot, name = %name, "unknown champion cleared");
                    cleared.push((role, slot, name.clone()));
                }
            }
        }
        cleared
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    fn handle(&self) -> MutexGuard<'_, Option<MonitorHandle>> {
        self.handle.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn draining(&self) -> MutexGuard<'_, Option<Receiver<()>>> {
        self.draining.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn current_status(&self) -> Arc<MonitorStatus> {
        self.status.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Wait up to `stop_timeout` for an old run to signal exit. If it is still
    /// busy its receiver is parked in `draining` and `MonitorBusy` returned.
    fn await_exit(&self, done_rx: Receiver<()>) -> Result<()> {
        match done_rx.recv_timeout(self.timing.stop_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => Ok(()),
            Err(RecvTimeoutError::Timeout) => {
                *self.draining() = Some(done_rx);
                Err(DraftError::MonitorBusy)
            }
        }
    }

    /// Start the monitor thread. Returns `false` if it was already running,
    /// `MonitorBusy` while a previous run is still finishing its last request.
    pub fn start(&self) -> Result<bool> {
        let mut handle = self.handle();
        if handle.is_some() && self.current_status().is_running() {
            return Ok(false);
        }
        // A run that stopped itself is exiting; one that timed out on stop
        // may still be inside a request.
        if let Some(previous) = handle.take() {
            self.await_exit(previous.done_rx)?;
        }
        let lingering = self.draining().take();
        if let Some(done_rx) = lingering {
            self.await_exit(done_rx)?;
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let status = Arc::new(MonitorStatus::default());
        let monitor = Monitor::new(
            self.gateway.clone(),
            self.registry.clone(),
            self.settings.clone(),
            self.timing,
            status.clone(),
        );

        status.set_running(true);
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = status.clone();
        let spawned = thread::Builder::new()
            .name(MONITOR_THREAD_NAME.to_string())
            .spawn(move || {
                monitor.run(&stop_rx);
                let _ = done_tx.send(());
            });
        if let Err(e) = spawned {
            status.set_running(false);
            status.set_phase(MonitorPhase::Stopped);
            return Err(DraftError::MonitorSpawn(e.to_string()));
        }

        *handle = Some(MonitorHandle { stop_tx, done_rx });
        *self.started_at.lock().unwrap_or_else(|p| p.into_inner()) = Some(Utc::now());
        tracing::info!("autopilot started");
        Ok(true)
    }

    /// Ask the monitor to exit and wait a bounded time for it. Returns `false`
    /// if nothing was running. A run that does not exit in time is remembered
    /// so `start` will not overlap it.
    pub fn stop(&self) -> bool {
        let Some(handle) = self.handle().take() else {
            return false;
        };
        let _ = handle.stop_tx.send(());
        match handle.done_rx.recv_timeout(self.timing.stop_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    timeout_ms = self.timing.stop_timeout.as_millis() as u64,
                    "monitor did not stop in time, detaching"
                );
                *self.draining() = Some(handle.done_rx);
            }
        }
        *self.started_at.lock().unwrap_or_else(|p| p.into_inner()) = None;
        true
    }

    pub fn is_running(&self) -> bool {
        self.current_status().is_running()
    }

    pub fn status(&self) -> AutopilotStatus {
        let settings = self.settings.snapshot();
        let status = self.current_status();
        AutopilotStatus {
            pick: RoleStatus::from(&settings.pick),
            ban: RoleStatus::from(&settings.ban),
            options: settings.options,
            running: status.is_running(),
            phase: status.phase(),
            consecutive_errors: status.consecutive_errors(),
            champions_loaded: self.registry.len(),
            started_at: *self.started_at.lock().unwrap_or_else(|p| p.into_inner()),
        }
    }
}
