mod config;
mod local;

pub use config::{Config, MailConfig, NotificationsConfig, ServerConfig, StoreConfig};
pub use local::LocalStorage;

use std::path::PathBuf;

use crate::error::StorageError;

/// Resolve the data directory, creating it if needed.
///
/// `FOCUSOS_DATA_DIR` wins when set. Otherwise `~/.config/focusos[-dev]/`,
/// where `FOCUSOS_ENV=dev` selects the development directory.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FOCUSOS_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSOS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusos-dev")
            } else {
                base_dir.join("focusos")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
