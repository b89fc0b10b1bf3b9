use clap::Subcommand;
use focusos_core::storage::{Config, LocalStorage};

use super::{open_store, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete all of your tasks, sessions, mood entries, friends and courses
    Reset {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let config = Config::load()?;

    match action {
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete data without --yes".into());
            }
            let mut store = open_store(&storage, &config)?;
            store.clear()?;
            println!("data cleared for {}", store.user_id());
        }
    }
    Ok(())
}
