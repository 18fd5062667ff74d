//! Decides which champion to pick or ban.
//!
//! Both entry points are pure over the settings and the snapshot; the only
//! outside input is name resolution through [`ChampionLookup`] (and, for a
//! random pick, the random source).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::settings::{ChampionChoice, SelectionConfig, Slot};
use crate::snapshot::{CellId, ChampionId, SessionSnapshot};

/// Name → id resolution used while walking a priority list.
pub trait ChampionLookup {
    fn resolve(&self, name: &str) -> Option<ChampionId>;

    fn all_ids(&self) -> Vec<ChampionId>;

    fn display_name(&self, id: ChampionId) -> String {
        id.to_string()
    }
}

/// Champion to lock in for a pick, or `None` when every option is gone.
pub fn select_pick(
    config: &SelectionConfig,
    snapshot: &SessionSnapshot,
    lookup: &dyn ChampionLookup,
) -> Option<ChampionId> {
    select_pick_with(config, snapshot, lookup, &mut rand::thread_rng())
}

pub fn select_pick_with<R: Rng + ?Sized>(
    config: &SelectionConfig,
    snapshot: &SessionSnapshot,
    lookup: &dyn ChampionLookup,
    rng: &mut R,
) -> Option<ChampionId> {
    if config.primary == ChampionChoice::Random {
        let available: Vec<ChampionId> = lookup
            .all_ids()
            .into_iter()
            .filter(|&id| !snapshot.is_banned(id))
            .collect();
        let chosen = available.choose(rng).copied();
        match chosen {
            Some(id) => tracing::info!(
                champion = %lookup.display_name(id),
                pool = available.len(),
                "random pick"
            ),
            None => tracing::warn!("random pick: no unbanned champions available"),
        }
        return chosen;
    }

    walk_priority(config, lookup, "pick", |id| {
        if snapshot.is_banned(id) {
            Some("banned")
        } else {
            None
        }
    })
}

/// Champion to ban. With `avoid_ally_hovers`, champions a teammate is
/// hovering are skipped as well.
pub fn select_ban(
    config: &SelectionConfig,
    snapshot: &SessionSnapshot,
    lookup: &dyn ChampionLookup,
    seat: CellId,
    avoid_ally_hovers: bool,
) -> Option<ChampionId> {
    let hovered = if avoid_ally_hovers {
        snapshot.ally_hovers(seat)
    } else {
        Vec::new()
    };

    walk_priority(config, lookup, "ban", |id| {
        if snapshot.is_banned(id) {
            Some("already banned")
        } else if hovered.contains(&id) {
            Some("hovered by a teammate")
        } else {
            None
        }
    })
}

/// First configured slot whose champion resolves and is not rejected.
fn walk_priority(
    config: &SelectionConfig,
    lookup: &dyn ChampionLookup,
    role: &str,
    rejects: impl Fn(ChampionId) -> Option<&'static str>,
) -> Option<ChampionId> {
    for (slot, choice) in config.priority() {
        let ChampionChoice::Named(name) = choice else {
            // Random is only meaningful for the pick primary.
            continue;
        };
        let Some(id) = lookup.resolve(name) else {
            tracing::debug!(role, slot = slot.ordinal(), name = %name, "name does not resolve");
            continue;
        };
        if let Some(reason) = rejects(id) {
            tracing::info!(role, slot = slot.ordinal(), name = %name, reason, "skipping choice");
            continue;
        }
        if slot != Slot::Primary {
            tracing::info!(role, slot = slot.ordinal(), name = %name, "falling back");
        }
        return Some(id);
    }
    None
}
