//! Focus timer engine.
//!
//! The engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |          |
//!            +-> Expired <+     (tick reaches zero, or expire())
//! Expired -> Running            (start, or auto-start of the next interval)
//! any     -> Idle               (stop)
//! ```
//!
//! Every command also exists as `*_at(now_ms)` so the clock can be supplied.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start(None);
//! // In a loop:
//! engine.tick(); // Returns Some(Event::TimerExpired) exactly once per interval
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::settings::{TimerMode, TimerSettings};
use crate::error::ValidationError;
use crate::events::Event;
use crate::store::{SessionStatus, TimerSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Interval ran out; the next mode is staged but not started.
    Expired,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
/// Serializable so callers can persist it between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: TimerSettings,
    state: TimerState,
    mode: TimerMode,
    /// Remaining time in milliseconds for the current interval.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last elapsed-time flush while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    /// Session for the interval in progress (running or paused).
    #[serde(default)]
    current: Option<TimerSession>,
    /// Focus intervals completed since the last stop.
    #[serde(default)]
    completed_focus: u32,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl TimerEngine {
    /// Create an idle engine with a full focus interval ready.
    pub fn new(settings: TimerSettings) -> Self {
        let remaining_ms = settings.duration_ms(TimerMode::Focus);
        Self {
            settings,
            state: TimerState::Idle,
            mode: TimerMode::Focus,
            remaining_ms,
            last_tick_epoch_ms: None,
            current: None,
            completed_focus: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn current_session(&self) -> Option<&TimerSession> {
        self.current.as_ref()
    }

    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    pub fn total_ms(&self) -> u64 {
        self.settings.duration_ms(self.mode)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 || self.state == TimerState::Idle {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms(),
            progress_pct: (self.progress() * 100.0).clamp(0.0, 100.0),
            completed_focus: self.completed_focus,
            session_id: self.current.as_ref().map(|s| s.id.clone()),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start an interval. `None` starts whatever mode is staged.
    pub fn start(&mut self, mode: Option<TimerMode>) -> Option<Event> {
        self.start_at(mode, now_ms())
    }

    pub fn start_at(&mut self, mode: Option<TimerMode>, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Expired => {
                let mode = mode.unwrap_or(self.mode);
                Some(self.begin(mode, now))
            }
            TimerState::Running | TimerState::Paused => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    pub fn pause_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_ms == 0 {
            // Ran out before anyone ticked; expiry wins over pause.
            return Some(self.finish(now));
        }
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        if let Some(session) = self.current.as_mut() {
            session.set_status(SessionStatus::Paused, to_datetime(now));
        }
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: to_datetime(now),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.resume_at(now_ms())
    }

    pub fn resume_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick_epoch_ms = Some(now);
        if let Some(session) = self.current.as_mut() {
            session.set_status(SessionStatus::InProgress, to_datetime(now));
        }
        Some(Event::TimerResumed {
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            at: to_datetime(now),
        })
    }

    /// Abandon the current interval and return to an idle focus interval.
    /// The abandoned session is not recorded.
    pub fn stop(&mut self) -> Option<Event> {
        self.stop_at(now_ms())
    }

    pub fn stop_at(&mut self, now: u64) -> Option<Event> {
        let discarded = self.current.take().map(|s| s.id);
        self.state = TimerState::Idle;
        self.mode = TimerMode::Focus;
        self.remaining_ms = self.settings.duration_ms(TimerMode::Focus);
        self.last_tick_epoch_ms = None;
        self.completed_focus = 0;
        Some(Event::TimerStopped {
            discarded_session: discarded,
            at: to_datetime(now),
        })
    }

    /// Call periodically. Returns `Some(Event::TimerExpired)` on the tick
    /// that takes the interval to zero, and never again for that interval.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_ms == 0 {
            return Some(self.finish(now));
        }
        None
    }

    /// End the current interval immediately, as if it ran out.
    pub fn expire(&mut self) -> Option<Event> {
        self.expire_at(now_ms())
    }

    pub fn expire_at(&mut self, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => Some(self.finish(now)),
            TimerState::Idle | TimerState::Expired => None,
        }
    }

    /// Replace the interval settings.
    ///
    /// Idle and expired engines pick up the new duration of the staged mode;
    /// a running or paused interval keeps its time, capped at the new length.
    pub fn update_settings(&mut self, settings: TimerSettings) -> Result<Event, ValidationError> {
        settings.validate()?;
        self.settings = settings;
        let total = self.total_ms();
        match self.state {
            TimerState::Idle | TimerState::Expired => self.remaining_ms = total,
            TimerState::Running | TimerState::Paused => {
                self.remaining_ms = self.remaining_ms.min(total);
            }
        }
        Ok(Event::SettingsUpdated {
            settings: self.settings.clone(),
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin(&mut self, mode: TimerMode, now: u64) -> Event {
        let duration_secs = self.settings.duration_secs(mode);
        let session = TimerSession::begin(mode, duration_secs, to_datetime(now));
        let session_id = session.id.clone();
        self.state = TimerState::Running;
        self.mode = mode;
        self.remaining_ms = self.settings.duration_ms(mode);
        self.last_tick_epoch_ms = Some(now);
        self.current = Some(session);
        Event::TimerStarted {
            mode,
            duration_secs,
            session_id,
            at: to_datetime(now),
        }
    }

    /// Single expiry path for natural expiry, pause-at-zero and expire().
    fn finish(&mut self, now: u64) -> Event {
        let at = to_datetime(now);
        let finished = self.mode;
        self.state = TimerState::Expired;
        self.remaining_ms = 0;
        self.last_tick_epoch_ms = None;

        let mut session = self.current.take().unwrap_or_else(|| {
            TimerSession::begin(finished, self.settings.duration_secs(finished), at)
        });
        session.complete(at);

        if finished == TimerMode::Focus {
            self.completed_focus = self.completed_focus.saturating_add(1);
        }
        let next = self.next_mode(finished);
        self.mode = next;
        self.remaining_ms = self.settings.duration_ms(next);

        let auto_started = self.settings.auto_starts(next);
        if auto_started {
            self.begin(next, now);
        }

        Event::TimerExpired {
            mode: finished,
            session,
            next_mode: next,
            auto_started,
            at,
        }
    }

    fn next_mode(&self, finished: TimerMode) -> TimerMode {
        match finished {
            TimerMode::Focus => {
                let interval = self.settings.long_break_interval.max(1);
                if self.completed_focus > 0 && self.completed_focus % interval == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        }
    }

    fn flush_elapsed(&mut self, now: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now.max(last));
        }
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub(crate) fn to_datetime(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}
