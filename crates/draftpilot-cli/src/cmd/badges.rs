use crate::output::{print_json, print_table};
use clap::Subcommand;
use draftpilot_core::badges::{self, BadgeChoice};
use draftpilot_core::Gateway;
use serde_json::json;

#[derive(Subcommand)]
pub enum BadgesSubcommand {
    /// Show the current badges, title and banner
    Show,
    /// Clear all badge slots
    Empty,
    /// Repeat the first badge in every slot
    CopyFirst,
    /// Fill every slot with a glitched badge id
    Glitched {
        /// Badge id, 0 to 5
        id: u8,
    },
}

pub fn run(gateway: &dyn Gateway, subcmd: BadgesSubcommand, json: bool) -> anyhow::Result<()> {
    let choice = match subcmd {
        BadgesSubcommand::Show => return show(gateway, json),
        BadgesSubcommand::Empty => BadgeChoice::Empty,
        BadgesSubcommand::CopyFirst => BadgeChoice::CopyFirst,
        BadgesSubcommand::Glitched { id } => BadgeChoice::glitched(id)?,
    };

    let ids = badges::apply(gateway, choice)?;
    if json {
        print_json(&json!({ "choice": choice.to_string(), "challenge_ids": ids }))
    } else {
        println!("Badges updated ({choice}).");
        Ok(())
    }
}

fn show(gateway: &dyn Gateway, json: bool) -> anyhow::Result<()> {
    let current = badges::player_badges(gateway)?;
    if json {
        return print_json(&current);
    }
    let rows = vec![
        vec![
            "title".to_string(),
            current
                .title_id
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".into()),
        ],
        vec![
            "banner".to_string(),
            current.banner_accent.clone().unwrap_or_else(|| "-".into()),
        ],
        vec![
            "badges".to_string(),
            current
                .challenge_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ],
    ];
    print_table(&["FIELD", "VALUE"], &rows);
    Ok(())
}
