use std::fs;
use std::path::PathBuf;

use followcheck::{export, StateStore};
use tabled::Tabled;

use crate::HistoryAction;

pub(crate) fn handle_history(
    action: Option<HistoryAction>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = StateStore::open_default()
        .ok_or("could not determine the state directory for analysis history")?;

    match action.unwrap_or(HistoryAction::List) {
        HistoryAction::List => handle_list(&store),
        HistoryAction::Export { login, output } => handle_export(&store, &login, output),
        HistoryAction::Clear => {
            store.clear()?;
            println!("History cleared.");
            Ok(())
        }
    }
}

/// One row of the history table.
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Analyzed At")]
    analyzed_at: String,
    #[tabled(rename = "Followers")]
    followers: usize,
    #[tabled(rename = "Following")]
    following: usize,
    #[tabled(rename = "Mutual")]
    mutual: usize,
}

fn handle_list(store: &StateStore) -> Result<(), Box<dyn std::error::Error>> {
    let state = store.load();
    if state.analyses.is_empty() {
        println!("No stored analyses yet. Run: followcheck analyze <login>");
        return Ok(());
    }

    let rows: Vec<HistoryRow> = state
        .analyses
        .iter()
        .map(|a| HistoryRow {
            user: format!("@{}", a.target_login),
            analyzed_at: a.completed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            followers: a.stats.total_followers,
            following: a.stats.total_following,
            mutual: a.stats.mutual_count,
        })
        .collect();

    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{table}");
    Ok(())
}

fn handle_export(
    store: &StateStore,
    login: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = store
        .find(login)
        .ok_or_else(|| format!("no stored analysis for '{login}'"))?;

    let path = output.unwrap_or_else(|| PathBuf::from(export::export_file_name(&result)));
    fs::write(&path, export::to_document(&result)?)?;
    println!("Exported to {}", path.display());
    Ok(())
}
