use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use focusos_core::stats::{dashboard, session_stats};
use focusos_core::storage::{Config, LocalStorage};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Overview across tasks, timer, mood, friends and courses
    Dashboard,
    /// Completed timer sessions for one day
    Sessions {
        /// Day to report (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let config = Config::load()?;
    let store = open_store(&storage, &config)?;

    match action {
        StatsAction::Dashboard => print_json(&dashboard(store.state()))?,
        StatsAction::Sessions { date } => {
            let day = date.unwrap_or_else(|| Utc::now().date_naive());
            print_json(&session_stats(&store.state().timer_sessions, day))?;
        }
    }
    Ok(())
}
