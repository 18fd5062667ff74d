use crate::output::{on_off, print_json};
use draftpilot_core::config::{AppConfig, WarnLevel};
use draftpilot_core::settings::{Role, Slot};
use draftpilot_core::{Autopilot, Gateway};
use std::io::BufRead;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Control commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleTarget {
    Role(Role),
    PreHover,
    AvoidAllyHovers,
}

/// One line typed while `watch` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Set { role: Role, slot: Slot, name: String },
    Clear { role: Role, slot: Slot },
    Toggle(ToggleTarget),
    Status,
    Reload,
    Start,
    Stop,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  pick|ban [primary|backup2|backup3] <name>   set a champion (none/off to clear, random for pick)
  clear pick|ban [slot]                       clear a slot
  toggle pick|ban|prehover|avoid              flip a setting
  status | reload | start | stop | help | quit";

/// Parse a control line. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<ControlCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "pick" | "ban" => {
            let role = parse_role(head)?;
            let (slot, name) = match rest.split_first() {
                Some((first, tail)) if !tail.is_empty() => match first.parse::<Slot>() {
                    Ok(slot) => (slot, tail.join(" ")),
                    Err(_) => (Slot::Primary, rest.join(" ")),
                },
                Some((only, _)) => {
                    if only.parse::<Slot>().is_ok() {
                        return Err(format!("missing champion name for {head} {only}"));
                    }
                    (Slot::Primary, only.to_string())
                }
                None => return Err(format!("usage: {head} [slot] <name>")),
            };
            ControlCommand::Set { role, slot, name }
        }
        "clear" => {
            let role = rest
                .first()
                .ok_or_else(|| "usage: clear pick|ban [slot]".to_string())
                .and_then(|r| parse_role(r))?;
            let slot = match rest.get(1) {
                Some(s) => s.parse::<Slot>().map_err(|e| e.to_string())?,
                None => Slot::Primary,
            };
            ControlCommand::Clear { role, slot }
        }
        "toggle" => {
            let target = match rest.first().map(|t| t.to_ascii_lowercase()).as_deref() {
                Some("prehover" | "pre-hover" | "hover") => ToggleTarget::PreHover,
                Some("avoid" | "avoid-hovers") => ToggleTarget::AvoidAllyHovers,
                Some(other) => ToggleTarget::Role(parse_role(other)?),
                None => return Err("usage: toggle pick|ban|prehover|avoid".to_string()),
            };
            ControlCommand::Toggle(target)
        }
        "status" => ControlCommand::Status,
        "reload" => ControlCommand::Reload,
        "start" => ControlCommand::Start,
        "stop" => ControlCommand::Stop,
        "help" | "?" => ControlCommand::Help,
        "quit" | "exit" | "q" => ControlCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_role(word: &str) -> Result<Role, String> {
    word.parse::<Role>().map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(gateway: Arc<dyn Gateway>, config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();
    for w in &warnings {
        tracing::warn!("config: {}", w.message);
    }
    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    let autopilot = Autopilot::new(gateway, config.settings(), config.timing());
    match autopilot.reload_champions() {
        Ok(count) => tracing::debug!(count, "champion list ready"),
        Err(e) => tracing::warn!("champion list not loaded yet: {e}"),
    }
    autopilot.reconcile_names();

    autopilot.start()?;
    print_status(&autopilot, json)?;
    if !json {
        println!("type 'help' for commands");
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ControlCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(&autopilot, command, json) {
                    eprintln!("error: {e:#}");
                }
            }
            Err(message) => eprintln!("error: {message}"),
        }
    }

    autopilot.stop();
    Ok(())
}

fn execute(autopilot: &Autopilot, command: ControlCommand, json: bool) -> anyhow::Result<()> {
    match command {
        ControlCommand::Set { role, slot, name } => {
            let choice = autopilot.set_champion(role, slot, &name)?;
            println!("{role} {slot}: {}", choice.label());
        }
        ControlCommand::Clear { role, slot } => {
            autopilot.clear_champion(role, slot);
            println!("{role} {slot}: None");
        }
        ControlCommand::Toggle(ToggleTarget::Role(role)) => {
            let enabled = autopilot.toggle(role)?;
            println!("{role}: {}", on_off(enabled));
        }
        ControlCommand::Toggle(ToggleTarget::PreHover) => {
            println!("pre-hover: {}", on_off(autopilot.toggle_pre_hover()));
        }
        ControlCommand::Toggle(ToggleTarget::AvoidAllyHovers) => {
            println!("avoid ally hovers: {}", on_off(autopilot.toggle_avoid_ally_hovers()));
        }
        ControlCommand::Status => print_status(autopilot, json)?,
        ControlCommand::Reload => {
            let count = autopilot.reload_champions()?;
            println!("loaded {count} champions");
            for (role, slot, name) in autopilot.reconcile_names() {
                println!("{role} {slot}: '{name}' does not match any champion, slot cleared");
            }
        }
        ControlCommand::Start => {
            if autopilot.start()? {
                println!("autopilot started");
            } else {
                println!("autopilot already running");
            }
        }
        ControlCommand::Stop => {
            if autopilot.stop() {
                println!("autopilot stopped");
            } else {
                println!("autopilot not running");
            }
        }
        ControlCommand::Help => println!("{HELP}"),
        ControlCommand::Quit => {}
    }
    Ok(())
}

fn print_status(autopilot: &Autopilot, json: bool) -> anyhow::Result<()> {
    let status = autopilot.status();
    if json {
        return print_json(&status);
    }

    let state = if status.running { "running" } else { "stopped" };
    println!("autopilot: {state} ({})", status.phase);
    println!("pick: {:<3}  {}", on_off(status.pick.enabled), status.pick.display);
    println!("ban:  {:<3}  {}", on_off(status.ban.enabled), status.ban.display);
    println!(
        "pre-hover: {}  avoid ally hovers: {}",
        on_off(status.options.pre_hover_enabled),
        on_off(status.options.avoid_ally_hovers)
    );
    println!("champions loaded: {}", status.champions_loaded);
    if status.consecutive_errors > 0 {
        println!("consecutive errors: {}", status.consecutive_errors);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ControlCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn set_with_slot_and_multiword_name() {
        assert_eq!(
            parse("ban backup2 Miss Fortune"),
            ControlCommand::Set {
                role: Role::Ban,
                slot: Slot::Backup2,
                name: "Miss Fortune".into()
            }
        );
    }

    #[test]
    fn set_without_slot_targets_primary() {
        assert_eq!(
            parse("pick Lee Sin"),
            ControlCommand::Set {
                role: Role::Pick,
                slot: Slot::Primary,
                name: "Lee Sin".into()
            }
        );
        assert_eq!(
            parse("pick ahri"),
            ControlCommand::Set {
                role: Role::Pick,
                slot: Slot::Primary,
                name: "ahri".into()
            }
        );
    }

    #[test]
    fn numeric_disable_keyword_is_a_name() {
        assert_eq!(
            parse("ban 99"),
            ControlCommand::Set {
                role: Role::Ban,
                slot: Slot::Primary,
                name: "99".into()
            }
        );
        assert_eq!(
            parse("ban 3 off"),
            ControlCommand::Set {
                role: Role::Ban,
                slot: Slot::Backup3,
                name: "off".into()
            }
        );
    }

    #[test]
    fn slot_without_name_is_rejected() {
        assert!(parse_command("pick backup2").is_err());
        assert!(parse_command("pick 3").is_err());
        assert!(parse_command("ban").is_err());
    }

    #[test]
    fn clear_and_toggle() {
        assert_eq!(
            parse("clear ban backup3"),
            ControlCommand::Clear {
                role: Role::Ban,
                slot: Slot::Backup3
            }
        );
        assert_eq!(
            parse("clear pick"),
            ControlCommand::Clear {
                role: Role::Pick,
                slot: Slot::Primary
            }
        );
        assert_eq!(parse("toggle ban"), ControlCommand::Toggle(ToggleTarget::Role(Role::Ban)));
        assert_eq!(parse("toggle prehover"), ControlCommand::Toggle(ToggleTarget::PreHover));
        assert_eq!(
            parse("TOGGLE avoid"),
            ControlCommand::Toggle(ToggleTarget::AvoidAllyHovers)
        );
        assert!(parse_command("toggle nothing").is_err());
    }

    #[test]
    fn simple_commands_and_blanks() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse("status"), ControlCommand::Status);
        assert_eq!(parse("q"), ControlCommand::Quit);
        assert!(parse_command("launch").is_err());
    }
}
