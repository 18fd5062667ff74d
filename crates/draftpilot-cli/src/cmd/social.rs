use crate::output::{print_json, print_result};
use anyhow::Context;
use clap::Subcommand;
use draftpilot_core::social;
use draftpilot_core::Gateway;
use serde_json::json;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum FriendsSubcommand {
    /// Remove every friend from the friends list
    RemoveAll {
        /// Required; this cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ChatSubcommand {
    /// Show whether chat is connected
    State,
    /// Appear offline by suspending chat
    Disconnect,
    /// Resume chat
    Reconnect,
    /// Disconnect if connected, reconnect if disconnected
    Toggle,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn friends(gateway: &dyn Gateway, subcmd: FriendsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        FriendsSubcommand::RemoveAll { yes } => {
            if !yes {
                anyhow::bail!("refusing to remove all friends without --yes");
            }
            let summary = social::remove_all_friends(gateway).context("failed to remove friends")?;
            if json {
                return print_json(&summary);
            }
            if summary.total == 0 {
                println!("Friends list is already empty.");
            } else {
                println!("Removed {} of {} friends.", summary.removed, summary.total);
                if summary.failed > 0 {
                    println!("{} could not be removed.", summary.failed);
                }
            }
            Ok(())
        }
    }
}

pub fn chat(gateway: &dyn Gateway, subcmd: ChatSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ChatSubcommand::State => {
            let disconnected = social::chat_disconnected(gateway)?;
            print_state(disconnected, json)
        }
        ChatSubcommand::Disconnect => {
            social::disconnect_chat(gateway)?;
            print_state(true, json)
        }
        ChatSubcommand::Reconnect => {
            social::reconnect_chat(gateway)?;
            print_state(false, json)
        }
        ChatSubcommand::Toggle => {
            if social::chat_disconnected(gateway)? {
                social::reconnect_chat(gateway)?;
                print_state(false, json)
            } else {
                social::disconnect_chat(gateway)?;
                print_state(true, json)
            }
        }
    }
}

fn print_state(disconnected: bool, json: bool) -> anyhow::Result<()> {
    let label = if disconnected { "OFF" } else { "ON" };
    print_result(
        json,
        &json!({ "disconnected": disconnected }),
        &format!("Chat: {label}"),
    )
}
