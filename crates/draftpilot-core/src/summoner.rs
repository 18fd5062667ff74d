//! Who is logged in: riot id, region, level and solo queue rank.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gateway::Gateway;

pub const CURRENT_SUMMONER_PATH: &str = "/lol-summoner/v1/current-summoner";
pub const REGION_PATH: &str = "/riotclient/region-locale";
pub const RANKED_STATS_PATH: &str = "/lol-ranked/v1/current-ranked-stats";

const SOLO_QUEUE: &str = "RANKED_SOLO_5x5";

pub fn summoner_path(id: u64) -> String {
    format!("/lol-summoner/v1/summoners/{id}")
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summoner {
    pub summoner_id: u64,
    pub game_name: String,
    pub tag_line: String,
    pub summoner_level: u64,
}

impl Summoner {
    /// `Name#TAG`; `None` when either half is missing.
    pub fn riot_id(&self) -> Option<String> {
        if self.game_name.is_empty() || self.tag_line.is_empty() {
            None
        } else {
            Some(format!("{}#{}", self.game_name, self.tag_line))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummonerSummary {
    pub riot_id: String,
    pub region: String,
    pub level: u64,
    pub rank: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RegionLocale {
    web_region: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RankedStats {
    queues: Vec<QueueStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QueueStats {
    queue_type: String,
    tier: String,
    division: String,
    league_points: i64,
}

impl QueueStats {
    fn label(&self) -> String {
        match self.tier.to_ascii_uppercase().as_str() {
            "" | "NONE" | "UNRANKED" => "Unranked".to_string(),
            _ if self.division.is_empty() || self.division == "NA" => {
                format!("{} {} LP", self.tier, self.league_points)
            }
            _ => format!("{} {} {} LP", self.tier, self.division, self.league_points),
        }
    }
}

pub fn current_summoner(gateway: &dyn Gateway) -> Result<Summoner> {
    gateway
        .get(CURRENT_SUMMONER_PATH)?
        .expect_status(&[200], "fetch current summoner")?
        .decode(CURRENT_SUMMONER_PATH)
}

pub fn summoner_by_id(gateway: &dyn Gateway, id: u64) -> Result<Summoner> {
    let path = summoner_path(id);
    gateway
        .get(&path)?
        .expect_status(&[200], "fetch summoner")?
        .decode(&path)
}

/// Web region code (`euw`, `na`, ...), if the client reports one.
pub fn web_region(gateway: &dyn Gateway) -> Option<String> {
    let resp = gateway.get(REGION_PATH).ok()?;
    if !resp.is_success() {
        return None;
    }
    let locale: RegionLocale = resp.decode(REGION_PATH).ok()?;
    Some(locale.web_region).filter(|r| !r.is_empty())
}

/// Only the summoner lookup is required; region and rank degrade to
/// `"Unknown"`.
pub fn current_summary(gateway: &dyn Gateway) -> Result<SummonerSummary> {
    let summoner = current_summoner(gateway)?;
    let riot_id = summoner.riot_id().unwrap_or_else(|| "Unknown".to_string());
    let region = web_region(gateway).unwrap_or_else(|| "Unknown".to_string());
    let rank = solo_rank(gateway).unwrap_or_else(|| "Unknown".to_string());

    Ok(SummonerSummary {
        riot_id,
        region,
        level: summoner.summoner_level,
        rank,
    })
}

fn solo_rank(gateway: &dyn Gateway) -> Option<String> {
    let resp = gateway.get(RANKED_STATS_PATH).ok()?;
    if !resp.is_success() {
        return None;
    }
    let stats: RankedStats = resp.decode(RANKED_STATS_PATH).ok()?;
    Some(
        stats
            .queues
            .iter()
            .find(|q| q.queue_type == SOLO_QUEUE)
            .map(QueueStats::label)
            .unwrap_or_else(|| "Unranked".to_string()),
    )
}
