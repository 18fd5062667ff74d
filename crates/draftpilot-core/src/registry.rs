//! Champion name ↔ id registry.
//!
//! Loaded from the client's champion grid, falling back to the local player's
//! inventory (which reports unowned placeholder entries with id `-1`). Every
//! successful load replaces the whole map so entries from a previous client
//! session never linger; a failed load keeps what was there.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};
use crate::gateway::{Gateway, GatewayResponse};
use crate::selector::ChampionLookup;
use crate::snapshot::ChampionId;

pub const GRID_CHAMPIONS_PATH: &str = "/lol-champ-select/v1/all-grid-champions";
pub const INVENTORY_CHAMPIONS_PATH: &str = "/lol-champions/v1/inventories/local-player/champions";

/// Id the inventory endpoint uses for "no champion".
const PLACEHOLDER_ID: ChampionId = -1;

/// Minimum similarity for a name to be offered as a suggestion.
const SUGGESTION_CUTOFF: f64 = 0.6;

pub const DEFAULT_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// Lowercase lookup key.
    pub name: String,
    /// Name as the client spells it.
    pub display: String,
    pub id: ChampionId,
}

#[derive(Debug, Deserialize)]
struct RawChampion {
    #[serde(default)]
    id: ChampionId,
    #[serde(default)]
    name: String,
}

pub struct ChampionRegistry {
    gateway: Arc<dyn Gateway>,
    entries: RwLock<BTreeMap<String, RegistryEntry>>,
}

impl ChampionRegistry {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, RegistryEntry>> {
        self.entries.read().unwrap_or_else(|p| p.into_inner())
    }

    /// Fetch the champion list and replace the map. Returns the entry count.
    pub fn load(&self) -> Result<usize> {
        let resp = self.gateway.get(GRID_CHAMPIONS_PATH)?;
        let fresh = if resp.is_success() {
            parse_champions(&resp, GRID_CHAMPIONS_PATH, false)?
        } else {
            tracing::debug!(
                status = resp.status,
                "champion grid unavailable, trying inventory"
            );
            let fallback = self.gateway.get(INVENTORY_CHAMPIONS_PATH)?;
            if !fallback.is_success() {
                return Err(DraftError::ChampionsUnavailable(fallback.status));
            }
            parse_champions(&fallback, INVENTORY_CHAMPIONS_PATH, true)?
        };

        let count = fresh.len();
        *self.entries.write().unwrap_or_else(|p| p.into_inner()) = fresh;
        tracing::info!(count, "loaded champion list");
        Ok(count)
    }

    pub fn is_loaded(&self) -> bool {
        !self.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Resolve a user-typed name: exact key first, then the shortest key that
    /// contains the query or is contained in it (alphabetical among equals).
    /// Loads the list first if nothing has been loaded yet.
    pub fn find(&self, name: &str) -> Option<RegistryEntry> {
        if !self.is_loaded() {
            if let Err(e) = self.load() {
                tracing::debug!(error = %e, "lazy champion load failed");
            }
        }

        let query = normalize(name);
        if query.is_empty() {
            return None;
        }

        let entries = self.read();
        if let Some(entry) = entries.get(&query) {
            return Some(entry.clone());
        }
        entries
            .values()
            .filter(|e| e.name.contains(&query) || query.contains(&e.name))
            .min_by(|a, b| {
                a.name
                    .len()
                    .cmp(&b.name.len())
                    .then_with(|| a.name.cmp(&b.name))
            })
            .cloned()
    }

    pub fn get_id(&self, name: &str) -> Option<ChampionId> {
        self.find(name).map(|e| e.id)
    }

    /// Close spellings first (best match first), then plain substring hits.
    pub fn suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
        let query = normalize(partial);
        let entries = self.read();
        if query.is_empty() || entries.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &RegistryEntry)> = entries
            .values()
            .map(|e| (similarity(&query, &e.name), e))
            .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.name.cmp(&b.1.name))
        });

        let mut out: Vec<String> = scored
            .into_iter()
            .take(limit)
            .map(|(_, e)| e.display.clone())
            .collect();

        for entry in entries.values() {
            if out.len() >= limit {
                break;
            }
            if entry.name.contains(&query) && !out.contains(&entry.display) {
                out.push(entry.display.clone());
            }
        }
        out
    }

    /// Display name for `id`, or `"Unknown"`.
    pub fn name_of(&self, id: ChampionId) -> String {
        self.read()
            .values()
            .find(|e| e.id == id)
            .map(|e| e.display.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn all_ids(&self) -> Vec<ChampionId> {
        self.read().values().map(|e| e.id).collect()
    }

    /// All entries in key order.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.read().values().cloned().collect()
    }
}

impl ChampionLookup for ChampionRegistry {
    fn resolve(&self, name: &str) -> Option<ChampionId> {
        self.get_id(name)
    }

    fn all_ids(&self) -> Vec<ChampionId> {
        ChampionRegistry::all_ids(self)
    }

    fn display_name(&self, id: ChampionId) -> String {
        self.name_of(id)
    }
}

fn parse_champions(
    resp: &GatewayResponse,
    path: &str,
    drop_placeholders: bool,
) -> Result<BTreeMap<String, RegistryEntry>> {
    let raw: Vec<RawChampion> = resp.decode(path)?;
    let mut map = BTreeMap::new();
    for champ in raw {
        if champ.id == 0 || champ.name.trim().is_empty() {
            continue;
        }
        if drop_placeholders && champ.id == PLACEHOLDER_ID {
            continue;
        }
        let key = normalize(&champ.name);
        map.insert(
            key.clone(),
            RegistryEntry {
                name: key,
                display: champ.name.trim().to_string(),
                id: champ.id,
            },
        );
    }
    Ok(map)
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// `1 - levenshtein / longer length`, in `[0, 1]`.
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    1.0 - prev[b.len()] as f64 / longest as f64
}

#[cfg(test)]
pub(crate) fn preloaded(gateway: Arc<dyn Gateway>, champions: &[(&str, ChampionId)]) -> ChampionRegistry {
    let registry = ChampionRegistry::new(gateway);
    let map = champions
        .iter()
        .map(|(name, id)| {
            let key = normalize(name);
            (
                key.clone(),
                RegistryEntry {
                    name: key,
                    display: name.to_string(),
                    id: *id,
                },
            )
        })
        .collect();
    *registry.entries.write().unwrap() = map;
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use crate::testing::ScriptedGateway;
    use serde_json::json;

    const GRID: &str = r#"[
        {"id": 103, "name": "Ahri", "owned": true},
        {"id": 157, "name": "Yasuo"},
        {"id": 238, "name": "Zed"},
        {"id": 777, "name": "Yone"},
        {"id": 21, "name": "Miss Fortune"}
    ]"#;

    fn loaded() -> (Arc<ScriptedGateway>, ChampionRegistry) {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, GRID_CHAMPIONS_PATH, 200, GRID);
        let registry = ChampionRegistry::new(gw.clone());
        registry.load().unwrap();
        (gw, registry)
    }

    #[test]
    fn loads_primary_list() {
        let (_, registry) = loaded();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get_id("Ahri"), Some(103));
    }

    #[test]
    fn falls_back_to_inventory_and_drops_placeholders() {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, GRID_CHAMPIONS_PATH, 404, "");
        gw.on_json(
            Method::Get,
            INVENTORY_CHAMPIONS_PATH,
            200,
            json!([
                {"id": -1, "name": "None"},
                {"id": 1, "name": "Annie"},
                {"id": 0, "name": "Ghost"},
                {"id": 2, "name": ""}
            ]),
        );
        let registry = ChampionRegistry::new(gw.clone());
        assert_eq!(registry.load().unwrap(), 1);
        assert_eq!(registry.all_ids(), vec![1]);
        assert_eq!(registry.get_id("none"), None);
    }

    #[test]
    fn failed_load_keeps_previous_contents() {
        let (gw, registry) = loaded();
        gw.reset(Method::Get, GRID_CHAMPIONS_PATH);
        gw.on(Method::Get, GRID_CHAMPIONS_PATH, 500, "");
        gw.on(Method::Get, INVENTORY_CHAMPIONS_PATH, 503, "");

        let err = registry.load().unwrap_err();
        assert!(matches!(err, DraftError::ChampionsUnavailable(503)));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn reload_replaces_instead_of_merging() {
        let (gw, registry) = loaded();
        gw.reset(Method::Get, GRID_CHAMPIONS_PATH);
        gw.on(Method::Get, GRID_CHAMPIONS_PATH, 200, r#"[{"id": 1, "name": "Annie"}]"#);
        registry.load().unwrap();
        assert_eq!(registry.all_ids(), vec![1]);
        assert_eq!(registry.get_id("zed"), None);
    }

    #[test]
    fn lookup_normalizes_case_and_whitespace() {
        let (_, registry) = loaded();
        assert_eq!(registry.get_id("  ZED "), Some(238));
        assert_eq!(registry.get_id(""), None);
        assert_eq!(registry.get_id("teemo"), None);
    }

    #[test]
    fn substring_match_prefers_shortest_name() {
        let (_, registry) = loaded();
        // "y" is in both yasuo and yone; yone is shorter.
        assert_eq!(registry.get_id("y"), Some(777));
        assert_eq!(registry.get_id("fortune"), Some(21));
        // query containing the key
        assert_eq!(registry.get_id("ahri mid"), Some(103));
    }

    #[test]
    fn lookup_loads_lazily() {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, GRID_CHAMPIONS_PATH, 200, GRID);
        let registry = ChampionRegistry::new(gw.clone());
        assert!(!registry.is_loaded());
        assert_eq!(registry.get_id("yasuo"), Some(157));
        assert_eq!(gw.calls_to(Method::Get, GRID_CHAMPIONS_PATH).len(), 1);
    }

    #[test]
    fn suggestions_rank_close_spellings_first() {
        let (_, registry) = loaded();
        let suggestions = registry.suggestions("yasou", 5);
        assert_eq!(suggestions.first().map(String::as_str), Some("Yasuo"));
        assert!(!suggestions.contains(&"Ahri".to_string()));
    }

    #[test]
    fn suggestions_include_substrings_and_respect_limit() {
        let (_, registry) = loaded();
        assert_eq!(registry.suggestions("fort", 5), vec!["Miss Fortune"]);
        assert!(registry.suggestions("a", 1).len() <= 1);
        assert!(registry.suggestions("", 5).is_empty());
    }

    #[test]
    fn reverse_lookup_in_display_case() {
        let (_, registry) = loaded();
        assert_eq!(registry.name_of(21), "Miss Fortune");
        assert_eq!(registry.name_of(9999), "Unknown");
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("zed", "zed"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("yasou", "yasuo") - 0.6).abs() < 1e-9);
    }
}
