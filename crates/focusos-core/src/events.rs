use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::TimerSession;
use crate::timer::{TimerMode, TimerSettings, TimerState};

/// Every timer state change produces an Event.
/// Front-ends print them; the runner reacts to `TimerExpired`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        session_id: String,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        mode: TimerMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// Interval abandoned; the session (if any) was not recorded.
    TimerStopped {
        discarded_session: Option<String>,
        at: DateTime<Utc>,
    },
    /// Interval ran out. Emitted once per interval.
    TimerExpired {
        mode: TimerMode,
        session: TimerSession,
        next_mode: TimerMode,
        /// The next interval is already running.
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        remaining_ms: u64,
        total_ms: u64,
        progress_pct: f64,
        completed_focus: u32,
        session_id: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The completed session carried by an expiry, if this is one.
    pub fn completed_session(&self) -> Option<&TimerSession> {
        match self {
            Event::TimerExpired { session, .. } => Some(session),
            _ => None,
        }
    }
}
