//! The champion select tick engine.
//!
//! One `Monitor` lives on the background thread for as long as the autopilot
//! runs. Each tick reads the session, pre-hovers the intended pick once per
//! session, then locks in or bans for every action that is currently the local
//! player's turn. Per-session bookkeeping (`SessionState`) is dropped whenever
//! the session disappears or its identity changes.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gateway::Gateway;
use crate::registry::ChampionRegistry;
use crate::selector::{select_ban, select_pick};
use crate::session::ChampSelect;
use crate::settings::{Settings, SettingsSnapshot};
use crate::snapshot::{ActionId, ActionKind, CellId, SessionSnapshot};

// ---------------------------------------------------------------------------
// MonitorPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPhase {
    /// No champion select in progress (or the client is unreachable).
    #[default]
    Idle,
    /// A session exists but has not assigned the local seat yet.
    AwaitingSeat,
    Active,
    /// The loop has exited; only `start()` brings it back.
    Stopped,
}

impl MonitorPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MonitorPhase::Idle => "idle",
            MonitorPhase::AwaitingSeat => "awaiting_seat",
            MonitorPhase::Active => "active",
            MonitorPhase::Stopped => "stopped",
        }
    }
}

impl fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MonitorTiming
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorTiming {
    pub active_interval: Duration,
    pub idle_interval: Duration,
    pub seat_interval: Duration,
    pub error_backoff: Duration,
    pub max_consecutive_errors: u32,
    /// How long `stop()` waits for the loop to acknowledge.
    pub stop_timeout: Duration,
}

impl Default for MonitorTiming {
    fn default() -> Self {
        Self {
            active_interval: Duration::from_millis(200),
            idle_interval: Duration::from_millis(500),
            seat_interval: Duration::from_millis(300),
            error_backoff: Duration::from_millis(1000),
            max_consecutive_errors: 10,
            stop_timeout: Duration::from_millis(2000),
        }
    }
}

impl MonitorTiming {
    pub fn interval_for(&self, phase: MonitorPhase) -> Duration {
        match phase {
            MonitorPhase::Active => self.active_interval,
            MonitorPhase::AwaitingSeat => self.seat_interval,
            MonitorPhase::Idle | MonitorPhase::Stopped => self.idle_interval,
        }
    }
}

// ---------------------------------------------------------------------------
// MonitorStatus
// ---------------------------------------------------------------------------

/// Loop state visible from the foreground thread.
#[derive(Debug, Default)]
pub struct MonitorStatus {
    running: AtomicBool,
    consecutive_errors: AtomicU32,
    phase: Mutex<MonitorPhase>,
}

impl MonitorStatus {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub fn phase(&self) -> MonitorPhase {
        *self.phase.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Store `phase`, returning the previous one.
    pub(crate) fn set_phase(&self, phase: MonitorPhase) -> MonitorPhase {
        let mut guard = self.phase.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::replace(&mut *guard, phase)
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SessionState {
    processed: HashSet<ActionId>,
    pre_hover_done: bool,
    last_session: Option<String>,
}

impl SessionState {
    fn reset(&mut self) {
        self.processed.clear();
        self.pre_hover_done = false;
        self.last_session = None;
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

pub struct Monitor {
    registry: Arc<ChampionRegistry>,
    champ_select: ChampSelect,
    settings: Arc<Settings>,
    timing: MonitorTiming,
    status: Arc<MonitorStatus>,
    state: SessionState,
}

impl Monitor {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        registry: Arc<ChampionRegistry>,
        settings: Arc<Settings>,
        timing: MonitorTiming,
        status: Arc<MonitorStatus>,
    ) -> Self {
        Self {
            registry,
            champ_select: ChampSelect::new(gateway),
            settings,
            timing,
            status,
            state: SessionState::default(),
        }
    }

    /// Tick until `stop` fires (or its sender is dropped) or the failure
    /// threshold is reached. Leaves this run's status at `Stopped`.
    pub fn run(mut self, stop: &Receiver<()>) {
        self.status.set_running(true);
        let mut failures: u32 = 0;

        loop {
            let wait = match self.tick() {
                Ok(phase) => {
                    failures = 0;
                    self.status.consecutive_errors.store(0, Ordering::SeqCst);
                    let previous = self.status.set_phase(phase);
                    if previous != phase {
                        tracing::info!(from = %previous, to = %phase, "monitor phase changed");
                    }
                    self.timing.interval_for(phase)
                }
                Err(e) => {
                    failures += 1;
                    self.status.consecutive_errors.store(failures, Ordering::SeqCst);
                    if failures >= self.timing.max_consecutive_errors {
                        tracing::error!(
                            error = %e,
                            failures,
                            "too many consecutive failures, stopping autopilot"
                        );
                        break;
                    }
                    tracing::warn!(error = %e, failures, "monitor tick failed");
                    self.timing.error_backoff
                }
            };

            match stop.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("autopilot stopped");
                    break;
                }
            }
        }

        self.status.set_phase(MonitorPhase::Stopped);
        self.status.set_running(false);
    }

    /// One pass over the current session. `Err` only for failures worth
    /// counting toward the stop threshold.
    pub fn tick(&mut self) -> Result<MonitorPhase> {
        if !self.registry.is_loaded() {
            if let Err(e) = self.registry.load() {
                tracing::debug!(error = %e, "champion list not loaded yet");
            }
        }

        let Some(snapshot) = self.champ_select.fetch()? else {
            if self.state.last_session.is_some() {
                tracing::info!("champion select ended");
            }
            self.state.reset();
            return Ok(MonitorPhase::Idle);
        };

        let Some(seat) = snapshot.local_seat() else {
            return Ok(MonitorPhase::AwaitingSeat);
        };

        let identity = snapshot.identity();
        if identity != self.state.last_session {
            self.state.reset();
            tracing::info!(session = identity.as_deref().unwrap_or("?"), seat, "champion select detected");
            self.state.last_session = identity;
        }

        let settings = self.settings.snapshot();
        self.pre_hover(&snapshot, seat, &settings);
        self.process_actions(&snapshot, seat, &settings);
        Ok(MonitorPhase::Active)
    }

    /// Show the intended pick before our turn. Once a hover is accepted it is
    /// not sent again this session; a rejected one is retried next tick.
    fn pre_hover(&mut self, snapshot: &SessionSnapshot, seat: CellId, settings: &SettingsSnapshot) {
        if self.state.pre_hover_done
            || !settings.options.pre_hover_enabled
            || !settings.pick.enabled
            || !settings.pick.has_primary()
        {
            return;
        }
        let Some(action) = snapshot.pending_pick_for(seat) else {
            return;
        };
        let Some(champion) = select_pick(&settings.pick, snapshot, self.registry.as_ref()) else {
            tracing::debug!("no champion available to pre-hover yet");
            return;
        };

        let name = self.registry.name_of(champion);
        match self.champ_select.hover(action.id, champion) {
            Ok(resp) if resp.is_success() => {
                self.state.pre_hover_done = true;
                tracing::info!(champion = %name, action = action.id, "pre-hovered pick")
            }
            Ok(resp) => tracing::warn!(
                champion = %name,
                status = resp.status,
                "pre-hover rejected, retrying next tick"
            ),
            Err(e) => tracing::warn!(
                champion = %name,
                error = %e,
                "pre-hover failed, retrying next tick"
            ),
        }
    }

    fn process_actions(
        &mut self,
        snapshot: &SessionSnapshot,
        seat: CellId,
        settings: &SettingsSnapshot,
    ) {
        for action in snapshot.actions_for(seat) {
            if self.state.processed.contains(&action.id) {
                continue;
            }
            if action.completed {
                self.state.processed.insert(action.id);
                continue;
            }
            if !action.is_in_progress {
                continue;
            }

            let choice = match action.kind {
                ActionKind::Pick if settings.pick.enabled => {
                    select_pick(&settings.pick, snapshot, self.registry.as_ref())
                }
                ActionKind::Ban if settings.ban.enabled => select_ban(
                    &settings.ban,
                    snapshot,
                    self.registry.as_ref(),
                    seat,
                    settings.options.avoid_ally_hovers,
                ),
                _ => continue,
            };
            let kind = action.kind.as_str();
            let Some(champion) = choice else {
                tracing::warn!(kind, action = action.id, "no configured champion is available");
                continue;
            };

            let name = self.registry.name_of(champion);
            match self.champ_select.complete(action.id, champion) {
                Ok(resp) if resp.is_success() => {
                    self.state.processed.insert(action.id);
                    tracing::info!(kind, champion = %name, action = action.id, "action completed");
                }
                Ok(resp) => tracing::warn!(
                    kind,
                    champion = %name,
                    status = resp.status,
                    "action rejected, retrying next tick"
                ),
                Err(e) => tracing::warn!(
                    kind,
                    champion = %name,
                    error = %e,
                    "action failed, retrying next tick"
                ),
            }
        }
    }
}
