use crate::output::print_result;
use draftpilot_core::profile;
use draftpilot_core::Gateway;
use serde_json::json;

pub fn icon(gateway: &dyn Gateway, icon_id: u32, json: bool) -> anyhow::Result<()> {
    profile::change_icon(gateway, icon_id)?;
    print_result(
        json,
        &json!({ "icon_id": icon_id }),
        &format!("Icon changed to {icon_id}."),
    )
}

pub fn background(gateway: &dyn Gateway, skin_id: u32, json: bool) -> anyhow::Result<()> {
    profile::change_background(gateway, skin_id)?;
    print_result(
        json,
        &json!({ "skin_id": skin_id }),
        &format!("Background changed to skin {skin_id}."),
    )
}

pub fn status_message(gateway: &dyn Gateway, text: &str, json: bool) -> anyhow::Result<()> {
    // Shells cannot easily pass newlines; accept a literal \n.
    let message = text.replace("\\n", "\n");
    profile::change_status(gateway, &message)?;
    print_result(
        json,
        &json!({ "status_message": message }),
        "Status message updated.",
    )
}

pub fn riot_id(gateway: &dyn Gateway, name: &str, tag: &str, json: bool) -> anyhow::Result<()> {
    profile::change_riot_id(gateway, name, tag)?;
    let tag = tag.trim().trim_start_matches('#');
    print_result(
        json,
        &json!({ "game_name": name.trim(), "tag_line": tag }),
        &format!("Riot ID changed to {}#{tag}.", name.trim()),
    )
}
