use crate::output::print_result;
use anyhow::Context;
use draftpilot_core::lobby;
use draftpilot_core::Gateway;
use serde_json::json;

pub fn reveal(gateway: &dyn Gateway, no_open: bool, json: bool) -> anyhow::Result<()> {
    let url = lobby::reveal_url(gateway)?;
    if !no_open {
        open::that(&url).with_context(|| format!("failed to open {url}"))?;
    }
    print_result(json, &json!({ "url": url }), &url)
}

pub fn dodge(gateway: &dyn Gateway, json: bool) -> anyhow::Result<()> {
    lobby::dodge(gateway)?;
    print_result(json, &json!({ "dodged": true }), "Left champion select.")
}

pub fn restart_ux(gateway: &dyn Gateway, json: bool) -> anyhow::Result<()> {
    lobby::restart_ux(gateway)?;
    print_result(json, &json!({ "restarted": true }), "Client UI is restarting.")
}
