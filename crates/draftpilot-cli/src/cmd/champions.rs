use crate::output::{print_json, print_table};
use anyhow::Context;
use draftpilot_core::registry::{ChampionRegistry, DEFAULT_SUGGESTIONS};
use draftpilot_core::{DraftError, Gateway};
use std::sync::Arc;

pub fn run(
    gateway: Arc<dyn Gateway>,
    search: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let registry = ChampionRegistry::new(gateway);
    registry.load().context("failed to load champion list")?;

    if let Some(query) = search {
        return search_one(&registry, query, json);
    }

    let mut entries = registry.entries();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    if json {
        return print_json(&entries);
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| vec![e.display.clone(), e.id.to_string()])
        .collect();
    print_table(&["NAME", "ID"], &rows);
    println!("\n{} champions", registry.len());
    Ok(())
}

fn search_one(registry: &ChampionRegistry, query: &str, json: bool) -> anyhow::Result<()> {
    let Some(entry) = registry.find(query) else {
        return Err(DraftError::ChampionNotFound {
            name: query.trim().to_string(),
            suggestions: registry.suggestions(query, DEFAULT_SUGGESTIONS),
        }
        .into());
    };
    if json {
        print_json(&entry)
    } else {
        println!("{} ({})", entry.display, entry.id);
        Ok(())
    }
}
