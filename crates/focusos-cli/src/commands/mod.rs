pub mod auth;
pub mod config;
pub mod course;
pub mod data;
pub mod friend;
pub mod mood;
pub mod stats;
pub mod task;
pub mod timer;

use focusos_core::auth::{AuthProvider, LocalAuth, Session};
use focusos_core::storage::{Config, LocalStorage};
use focusos_core::store::DataStore;
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The signed-in user's session, or `Not signed in`.
pub fn require_session(storage: &LocalStorage) -> focusos_core::Result<Session> {
    Ok(LocalAuth::new(storage).require_session()?)
}

/// Open the signed-in user's data store.
pub fn open_store<'a>(
    storage: &'a LocalStorage,
    config: &Config,
) -> focusos_core::Result<DataStore<'a>> {
    let session = require_session(storage)?;
    Ok(DataStore::load(storage, &session.user.id, config.store.seed_samples)?)
}

/// Comma-separated list, trimmed, blanks dropped.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
