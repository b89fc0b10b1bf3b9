use chrono::Utc;
use clap::Subcommand;
use focusos_core::stats::{mood_insights, mood_stats, weekly_mood_trend};
use focusos_core::storage::{Config, LocalStorage};
use focusos_core::store::{Mood, NewMoodEntry};
use serde_json::json;

use super::{open_store, print_json, split_list, CmdResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record how you feel
    Log {
        /// angry, sad, neutral, happy or excited
        mood: Mood,
        /// What's going on
        description: String,
        /// Comma-separated factors (e.g. "Work,Sleep")
        #[arg(long)]
        factors: Option<String>,
    },
    /// List entries, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete an entry
    Delete { id: String },
    /// Averages, streak, weekly trend and insights
    Stats,
}

pub fn run(action: MoodAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let config = Config::load()?;
    let mut store = open_store(&storage, &config)?;

    match action {
        MoodAction::Log {
            mood,
            description,
            factors,
        } => {
            let entry = store.add_mood_entry(NewMoodEntry {
                mood,
                description,
                factors: split_list(factors.as_deref()),
                timestamp: None,
            })?;
            print_json(&entry)?;
        }
        MoodAction::List { limit } => {
            let entries = &store.state().mood_entries;
            let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];
            print_json(shown)?;
        }
        MoodAction::Delete { id } => {
            store.delete_mood_entry(&id)?;
            println!("Mood entry deleted: {id}");
        }
        MoodAction::Stats => {
            let today = Utc::now().date_naive();
            let entries = &store.state().mood_entries;
            let stats = mood_stats(entries, today);
            print_json(&json!({
                "stats": stats,
                "weeklyTrend": weekly_mood_trend(entries, today),
                "insights": mood_insights(entries, &stats),
            }))?;
        }
    }
    Ok(())
}
