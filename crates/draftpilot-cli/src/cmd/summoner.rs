use crate::output::print_json;
use anyhow::Context;
use draftpilot_core::summoner::current_summary;
use draftpilot_core::Gateway;

pub fn run(gateway: &dyn Gateway, json: bool) -> anyhow::Result<()> {
    let summary = current_summary(gateway).context("failed to read summoner")?;
    if json {
        return print_json(&summary);
    }
    println!("Riot ID: {}", summary.riot_id);
    println!("Region:  {}", summary.region);
    println!("Level:   {}", summary.level);
    println!("Rank:    {}", summary.rank);
    Ok(())
}
