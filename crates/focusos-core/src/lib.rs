//! # FocusOS Core Library
//!
//! Business logic for FocusOS, a personal productivity app: a Pomodoro
//! focus timer, task list, mood journal, friends list and learning
//! catalogue. The `focusos` CLI and the mail route server are thin layers
//! over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a wall-clock state machine; callers drive it with `tick()`
//!   and it reports every transition as an [`Event`]
//! - **Store**: per-user collections updated through a pure reducer and
//!   persisted as JSON blobs in [`LocalStorage`]
//! - **Auth**: demo-mode single-user accounts behind [`AuthProvider`]
//! - **Mail**: friend invitation emails over a Resend-compatible API
//! - **Stats**: derived numbers for the dashboard and the timer, mood and
//!   learning views
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`DataStore`]: reducer-backed data for one user
//! - [`Config`]: application configuration management
//! - [`MailClient`]: transactional email sender

pub mod auth;
pub mod error;
pub mod events;
pub mod mail;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;

pub use auth::{AuthProvider, LocalAuth, ProfileUpdate, Role, Session, UserProfile};
pub use error::{
    AuthError, ConfigError, CoreError, MailError, Result, StorageError, StoreError,
    ValidationError,
};
pub use events::Event;
pub use mail::{FriendInvite, InviteSigner, MailClient, MailOutcome, OutgoingEmail};
pub use storage::{data_dir, Config, LocalStorage};
pub use store::{Action, AppState, DataStore};
pub use timer::{TimerEngine, TimerMode, TimerRunner, TimerSettings, TimerState};
