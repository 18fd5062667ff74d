//! Lobby utilities: look up teammates on porofessor, dodge, restart the UI.

use serde::Deserialize;

use crate::error::{DraftError, Result};
use crate::gateway::{Gateway, Method};
use crate::session::SESSION_PATH;
use crate::summoner::{summoner_by_id, web_region};

pub const CHAT_PARTICIPANTS_PATH: &str = "/chat/v5/participants";
pub const DODGE_PATH: &str = r#"/lol-login/v1/session/invoke?destination=lcdsServiceProxy&method=call&args=["","teambuilder-draft","quitV2",""]"#;
pub const RESTART_UX_PATH: &str = "/riotclient/kill-and-restart-ux";

const REVEAL_BASE: &str = "https://porofessor.gg/pregame";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LobbySession {
    my_team: Vec<TeamMember>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TeamMember {
    summoner_id: u64,
    name_visibility_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Participants {
    participants: Vec<Participant>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Participant {
    cid: String,
    game_name: String,
    game_tag: String,
}

/// Porofessor pregame URL for the current champion select.
///
/// Ranked lobbies hide teammates' names, so those are read from the
/// champion select chat room instead of the summoner endpoint.
pub fn reveal_url(gateway: &dyn Gateway) -> Result<String> {
    let resp = gateway.get(SESSION_PATH)?;
    if !resp.is_success() || resp.text.contains("RPC_ERROR") {
        return Err(DraftError::NotInChampSelect);
    }
    let session: LobbySession = resp.decode(SESSION_PATH)?;

    let hidden = session
        .my_team
        .iter()
        .any(|m| m.name_visibility_type == "HIDDEN");
    let names = if hidden {
        names_from_chat(gateway)?
    } else {
        names_from_summoners(gateway, &session.my_team)
    };
    if names.is_empty() {
        return Err(DraftError::RevealUnavailable("no teammate names found".into()));
    }

    let region = web_region(gateway)
        .ok_or_else(|| DraftError::RevealUnavailable("region unknown".into()))?;
    let joined: Vec<String> = names.iter().map(|n| encode_riot_id(n)).collect();
    Ok(format!(
        "{REVEAL_BASE}/{region}/{}/soloqueue/season",
        joined.join(",")
    ))
}

fn names_from_summoners(gateway: &dyn Gateway, team: &[TeamMember]) -> Vec<String> {
    team.iter()
        .filter(|m| m.summoner_id != 0)
        .filter_map(|m| match summoner_by_id(gateway, m.summoner_id) {
            Ok(summoner) => summoner.riot_id(),
            Err(e) => {
                tracing::debug!(summoner_id = m.summoner_id, error = %e, "teammate lookup failed");
                None
            }
        })
        .collect()
}

fn names_from_chat(gateway: &dyn Gateway) -> Result<Vec<String>> {
    let participants: Participants = gateway
        .get(CHAT_PARTICIPANTS_PATH)?
        .expect_status(&[200], "fetch chat participants")?
        .decode(CHAT_PARTICIPANTS_PATH)?;
    Ok(participants
        .participants
        .into_iter()
        .filter(|p| p.cid.contains("champ-select"))
        .filter(|p| !p.game_name.is_empty() && !p.game_tag.is_empty())
        .map(|p| format!("{}#{}", p.game_name, p.game_tag))
        .collect())
}

fn encode_riot_id(riot_id: &str) -> String {
    riot_id.replace('%', "%25").replace('#', "%23").replace(' ', "%20")
}

/// Leave champion select without closing the client.
pub fn dodge(gateway: &dyn Gateway) -> Result<()> {
    gateway
        .request(Method::Post, DODGE_PATH, None)?
        .expect_status(&[200, 204], "dodge")?;
    tracing::info!("left champion select");
    Ok(())
}

pub fn restart_ux(gateway: &dyn Gateway) -> Result<()> {
    gateway
        .request(Method::Post, RESTART_UX_PATH, None)?
        .expect_status(&[200, 204], "restart client ui")?;
    Ok(())
}
