//! Typed view of a champion select session.
//!
//! The client reports the session as one JSON document; it is decoded once per
//! tick into `SessionSnapshot` and then only queried through the predicates
//! below. Snapshots are never cached across ticks.

use serde::{Deserialize, Serialize};

pub type ChampionId = i64;
pub type ActionId = i64;
pub type CellId = i64;

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Pick,
    Ban,
    /// Phases the autopilot never acts on (e.g. `ten_bans_reveal`).
    #[default]
    #[serde(other)]
    Other,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Pick => "pick",
            ActionKind::Ban => "ban",
            ActionKind::Other => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One pick or ban slot in the turn order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Action {
    pub id: ActionId,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub actor_cell_id: CellId,
    /// Champion currently attached to the slot; 0 when none.
    pub champion_id: ChampionId,
    pub completed: bool,
    /// True exactly while it is this actor's turn.
    pub is_in_progress: bool,
}

// ---------------------------------------------------------------------------
// Bans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bans {
    pub my_team_bans: Vec<ChampionId>,
    pub their_team_bans: Vec<ChampionId>,
}

impl Bans {
    pub fn contains(&self, champion: ChampionId) -> bool {
        self.my_team_bans.contains(&champion) || self.their_team_bans.contains(&champion)
    }
}

// ---------------------------------------------------------------------------
// SessionToken
// ---------------------------------------------------------------------------

/// The session `id` field; older clients send a number, newer ones a uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionToken {
    Text(String),
    Number(u64),
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    pub id: Option<SessionToken>,
    pub game_id: Option<u64>,
    pub local_player_cell_id: Option<CellId>,
    pub actions: Vec<Vec<Action>>,
    pub bans: Bans,
}

impl SessionSnapshot {
    pub fn local_seat(&self) -> Option<CellId> {
        self.local_player_cell_id
    }

    /// Identity used to tell one champion select apart from the next.
    pub fn identity(&self) -> Option<String> {
        match (&self.id, self.game_id) {
            (Some(SessionToken::Text(id)), _) if !id.is_empty() => Some(id.clone()),
            (Some(SessionToken::Number(id)), _) if *id != 0 => Some(id.to_string()),
            (_, Some(game_id)) if game_id != 0 => Some(format!("game-{game_id}")),
            _ => None,
        }
    }

    pub fn all_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().flatten()
    }

    pub fn actions_for(&self, seat: CellId) -> impl Iterator<Item = &Action> {
        self.all_actions().filter(move |a| a.actor_cell_id == seat)
    }

    /// First not-yet-completed pick slot belonging to `seat`, in progress or not.
    pub fn pending_pick_for(&self, seat: CellId) -> Option<&Action> {
        self.actions_for(seat)
            .find(|a| a.kind == ActionKind::Pick && !a.completed)
    }

    pub fn is_banned(&self, champion: ChampionId) -> bool {
        let banned_by_action = self
            .all_actions()
            .any(|a| a.kind == ActionKind::Ban && a.completed && a.champion_id == champion);
        banned_by_action || self.bans.contains(champion)
    }

    /// Champions other seats are hovering, in first-seen order.
    pub fn ally_hovers(&self, seat: CellId) -> Vec<ChampionId> {
        let mut hovers = Vec::new();
        for action in self.all_actions() {
            if action.actor_cell_id == seat
                || action.kind != ActionKind::Pick
                || action.completed
                || action.champion_id <= 0
            {
                continue;
            }
            if !hovers.contains(&action.champion_id) {
                hovers.push(action.champion_id);
            }
        }
        hovers
    }
}
