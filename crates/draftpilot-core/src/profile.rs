//! Profile edits: icon, background, status message and riot id.

use serde_json::json;

use crate::error::{DraftError, Result};
use crate::gateway::{Gateway, Method};

pub const ICON_PATH: &str = "/lol-summoner/v1/current-summoner/icon";
pub const PROFILE_PATH: &str = "/lol-summoner/v1/current-summoner/summoner-profile";
pub const CHAT_ME_PATH: &str = "/lol-chat/v1/me";
pub const SAVE_ALIAS_PATH: &str = "/lol-summoner/v1/save-alias";

pub const MAX_GAME_NAME_LEN: usize = 16;
pub const MAX_TAG_LINE_LEN: usize = 5;

pub fn change_icon(gateway: &dyn Gateway, icon_id: u32) -> Result<()> {
    let body = json!({ "profileIconId": icon_id });
    gateway
        .request(Method::Put, ICON_PATH, Some(&body))?
        .expect_status(&[200, 201], "change icon")?;
    tracing::info!(icon_id, "profile icon changed");
    Ok(())
}

/// `skin_id` is the skin whose splash becomes the profile background.
pub fn change_background(gateway: &dyn Gateway, skin_id: u32) -> Result<()> {
    let body = json!({ "key": "backgroundSkinId", "value": skin_id });
    gateway
        .request(Method::Post, PROFILE_PATH, Some(&body))?
        .expect_status(&[200, 204], "change background")?;
    tracing::info!(skin_id, "profile background changed");
    Ok(())
}

pub fn change_status(gateway: &dyn Gateway, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(DraftError::InvalidInput("status message is empty".into()));
    }
    let body = json!({ "statusMessage": message });
    gateway
        .request(Method::Put, CHAT_ME_PATH, Some(&body))?
        .expect_status(&[200, 204], "change status message")?;
    Ok(())
}

pub fn validate_riot_id(name: &str, tag: &str) -> Result<()> {
    if name.is_empty() || tag.is_empty() {
        return Err(DraftError::InvalidInput(
            "riot id needs both a name and a tag".into(),
        ));
    }
    if name.chars().count() > MAX_GAME_NAME_LEN {
        return Err(DraftError::InvalidInput(format!(
            "name is longer than {MAX_GAME_NAME_LEN} characters"
        )));
    }
    if tag.chars().count() > MAX_TAG_LINE_LEN {
        return Err(DraftError::InvalidInput(format!(
            "tag is longer than {MAX_TAG_LINE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validated before any request is made.
pub fn change_riot_id(gateway: &dyn Gateway, name: &str, tag: &str) -> Result<()> {
    let name = name.trim();
    let tag = tag.trim().trim_start_matches('#');
    validate_riot_id(name, tag)?;

    let body = json!({ "gameName": name, "tagLine": tag });
    gateway
        .request(Method::Post, SAVE_ALIAS_PATH, Some(&body))?
        .expect_status(&[200, 204], "change riot id")?;
    tracing::info!(name, tag, "riot id changed");
    Ok(())
}
