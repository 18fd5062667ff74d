//! Challenge badge preferences shown on the profile banner.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{DraftError, Result};
use crate::gateway::{Gateway, Method};

pub const PLAYER_DATA_PATH: &str = "/lol-challenges/v1/summary-player-data/local-player";
pub const UPDATE_PREFERENCES_PATH: &str = "/lol-challenges/v1/update-player-preferences/";

/// Badge slots on the banner.
const SLOTS: usize = 3;
pub const MAX_GLITCHED_ID: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerBadges {
    pub title_id: Option<i64>,
    pub banner_accent: Option<String>,
    pub challenge_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryPlayerData {
    title: Option<TitleItem>,
    banner_id: String,
    top_challenges: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TitleItem {
    item_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeChoice {
    /// Clear every slot.
    Empty,
    /// Repeat the first badge in every slot.
    CopyFirst,
    /// Fill every slot with a low id the client renders as a broken badge.
    Glitched(u8),
}

impl BadgeChoice {
    pub fn glitched(id: u8) -> Result<Self> {
        if id > MAX_GLITCHED_ID {
            return Err(DraftError::InvalidInput(format!(
                "glitched badge id must be between 0 and {MAX_GLITCHED_ID}"
            )));
        }
        Ok(BadgeChoice::Glitched(id))
    }

    pub fn challenge_ids(self, current: &PlayerBadges) -> Result<Vec<i64>> {
        match self {
            BadgeChoice::Empty => Ok(Vec::new()),
            BadgeChoice::CopyFirst => current
                .challenge_ids
                .first()
                .map(|&id| vec![id; SLOTS])
                .ok_or_else(|| DraftError::InvalidInput("no badge to copy".into())),
            BadgeChoice::Glitched(id) => Ok(vec![i64::from(id); SLOTS]),
        }
    }
}

impl fmt::Display for BadgeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeChoice::Empty => f.write_str("empty"),
            BadgeChoice::CopyFirst => f.write_str("copy-first"),
            BadgeChoice::Glitched(id) => write!(f, "glitched {id}"),
        }
    }
}

pub fn player_badges(gateway: &dyn Gateway) -> Result<PlayerBadges> {
    let data: SummaryPlayerData = gateway
        .get(PLAYER_DATA_PATH)?
        .expect_status(&[200], "fetch challenge data")?
        .decode(PLAYER_DATA_PATH)?;

    let challenge_ids = data
        .top_challenges
        .iter()
        .filter_map(|c| c.get("id").and_then(value_as_id))
        .collect();
    Ok(PlayerBadges {
        title_id: data.title.map(|t| t.item_id).filter(|&id| id != -1),
        banner_accent: Some(data.banner_id).filter(|b| !b.is_empty()),
        challenge_ids,
    })
}

/// Ids arrive as numbers or numeric strings depending on client version.
fn value_as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Apply `choice`, keeping the current title and banner. Returns the ids sent.
pub fn apply(gateway: &dyn Gateway, choice: BadgeChoice) -> Result<Vec<i64>> {
    let current = player_badges(gateway)?;
    let ids = choice.challenge_ids(&current)?;

    let mut payload = Map::new();
    payload.insert("challengeIds".into(), json!(ids));
    if let Some(title) = current.title_id {
        payload.insert("title".into(), json!(title.to_string()));
    }
    if let Some(accent) = &current.banner_accent {
        payload.insert("bannerAccent".into(), json!(accent));
    }

    gateway
        .request(
            Method::Post,
            UPDATE_PREFERENCES_PATH,
            Some(&Value::Object(payload)),
        )?
        .expect_status(&[200, 201, 204], "update badges")?;
    tracing::info!(choice = %choice, "badges updated");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    const PLAYER_DATA: &str = r#"{
        "title": {"itemId": 4021, "name": "Legendary"},
        "bannerId": "3",
        "topChallenges": [{"id": 202303}, {"id": "101101"}]
    }"#;

    fn scripted() -> std::sync::Arc<ScriptedGateway> {
        let gw = ScriptedGateway::new();
        gw.on(Method::Get, PLAYER_DATA_PATH, 200, PLAYER_DATA);
        gw.on(Method::Post, UPDATE_PREFERENCES_PATH, 204, "");
        gw
    }

    #[test]
    fn reads_current_badges() {
        let gw = scripted();
        let badges = player_badges(gw.as_ref()).unwrap();
        assert_eq!(badges.title_id, Some(4021));
        assert_eq!(badges.banner_accent.as_deref(), Some("3"));
        assert_eq!(badges.challenge_ids, vec![202303, 101101]);
    }

    #[test]
    fn copy_first_keeps_title_and_banner() {
        let gw = scripted();
        let ids = apply(gw.as_ref(), BadgeChoice::CopyFirst).unwrap();
        assert_eq!(ids, vec![202303; 3]);
        let post = &gw.calls_to(Method::Post, UPDATE_PREFERENCES_PATH)[0];
        assert_eq!(
            post.body,
            Some(json!({
                "challengeIds": [202303, 202303, 202303],
                "title": "4021",
                "bannerAccent": "3"
            }))
        );
    }

    #[test]
    fn empty_without_title() {
        let gw = ScriptedGateway::new();
        gw.on(
            Method::Get,
            PLAYER_DATA_PATH,
            200,
            r#"{"title": {"itemId": -1}, "bannerId": "", "topChallenges": []}"#,
        );
        gw.on(Method::Post, UPDATE_PREFERENCES_PATH, 201, "");
        apply(gw.as_ref(), BadgeChoice::Empty).unwrap();
        let post = &gw.calls_to(Method::Post, UPDATE_PREFERENCES_PATH)[0];
        assert_eq!(post.body, Some(json!({"challengeIds": []})));
    }

    #[test]
    fn copy_first_needs_a_badge() {
        let current = PlayerBadges::default();
        assert!(BadgeChoice::CopyFirst.challenge_ids(&current).is_err());
    }

    #[test]
    fn glitched_range() {
        assert_eq!(BadgeChoice::glitched(5).unwrap(), BadgeChoice::Glitched(5));
        assert!(BadgeChoice::glitched(6).is_err());
        let ids = BadgeChoice::Glitched(2)
            .challenge_ids(&PlayerBadges::default())
            .unwrap();
        assert_eq!(ids, vec![2, 2, 2]);
    }
}
