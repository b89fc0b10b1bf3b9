//! Drives a [`TimerEngine`] on a tokio interval and raises the expiry alert.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};

use super::engine::{now_ms, TimerEngine, TimerState};
use super::settings::TimerMode;
use crate::events::Event;

/// Receives the expiry alert (sound, notification, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, finished: TimerMode, next: TimerMode);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, finished: TimerMode, next: TimerMode) {
        (**self).notify(finished, next)
    }
}

/// Writes the alert to stderr, optionally ringing the terminal bell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier {
    pub bell: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, finished: TimerMode, next: TimerMode) {
        if self.bell {
            eprint!("\x07");
        }
        eprintln!("{} finished. Up next: {}", finished.label(), next.label());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _finished: TimerMode, _next: TimerMode) {}
}

/// Fire the alert for an expiry event. Returns whether `event` was one.
pub fn notify_expiry<N: Notifier + ?Sized>(notifier: &N, event: &Event) -> bool {
    let Event::TimerExpired { mode, next_mode, .. } = event else {
        return false;
    };
    tracing::info!(finished = mode.as_str(), next = next_mode.as_str(), "timer expired");
    notifier.notify(*mode, *next_mode);
    true
}

/// Owns an engine and ticks it until the running interval expires.
pub struct TimerRunner<N: Notifier> {
    engine: TimerEngine,
    notifier: N,
    period: Duration,
    epoch_ms: u64,
    origin: Instant,
}

impl<N: Notifier> TimerRunner<N> {
    pub fn new(engine: TimerEngine, notifier: N) -> Self {
        Self {
            engine,
            notifier,
            period: Duration::from_secs(1),
            epoch_ms: now_ms(),
            origin: Instant::now(),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Pin the wall-clock reading that corresponds to "now" on the tokio clock.
    pub fn with_epoch(mut self, epoch_ms: u64) -> Self {
        self.epoch_ms = epoch_ms;
        self.origin = Instant::now();
        self
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn into_engine(self) -> TimerEngine {
        self.engine
    }

    /// Tick until the running interval expires, calling `on_tick` after each
    /// tick. Returns the expiry event, or `None` if the engine was not running.
    pub async fn run_until_expired<F>(&mut self, mut on_tick: F) -> Option<Event>
    where
        F: FnMut(&TimerEngine),
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        while self.engine.state() == TimerState::Running {
            ticker.tick().await;
            let now = self.now();
            let event = self.engine.tick_at(now);
            on_tick(&self.engine);
            if let Some(event) = event {
                notify_expiry(&self.notifier, &event);
                return Some(event);
            }
        }
        None
    }

    fn now(&self) -> u64 {
        self.epoch_ms + self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerSettings;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<(TimerMode, TimerMode)>>);

    impl Notifier for Recording {
        fn notify(&self, finished: TimerMode, next: TimerMode) {
            self.0.lock().unwrap().push((finished, next));
        }
    }

    fn one_minute_focus() -> TimerSettings {
        TimerSettings {
            focus_minutes: 1,
            short_break_minutes: 1,
            auto_start_breaks: true,
            ..TimerSettings::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn alert_fires_once_per_expiry() {
        let epoch = 1_000_000;
        let mut engine = TimerEngine::new(one_minute_focus());
        engine.start_at(None, epoch);

        let notifier = Arc::new(Recording::default());
        let mut runner = TimerRunner::new(engine, notifier.clone()).with_epoch(epoch);

        let mut ticks = 0;
        let event = runner.run_until_expired(|_| ticks += 1).await.unwrap();
        assert!(matches!(event, Event::TimerExpired { mode: TimerMode::Focus, .. }));
        assert!(ticks >= 60);
        assert_eq!(
            *notifier.0.lock().unwrap(),
            vec![(TimerMode::Focus, TimerMode::ShortBreak)]
        );

        // Break was auto-started; running again expires it with one more alert.
        assert_eq!(runner.engine().state(), TimerState::Running);
        runner.run_until_expired(|_| {}).await.unwrap();
        assert_eq!(notifier.0.lock().unwrap().len(), 2);
        assert_eq!(runner.engine().state(), TimerState::Expired);
    }

    #[test]
    fn notify_expiry_ignores_other_events() {
        let notifier = Recording::default();
        let mut engine = TimerEngine::new(one_minute_focus());
        let started = engine.start_at(None, 0).unwrap();
        assert!(!notify_expiry(&notifier, &started));

        let expired = engine.expire_at(1_000).unwrap();
        assert!(notify_expiry(&notifier, &expired));
        assert_eq!(
            *notifier.0.lock().unwrap(),
            vec![(TimerMode::Focus, TimerMode::ShortBreak)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn idle_engine_returns_immediately() {
        let notifier = Arc::new(Recording::default());
        let mut runner = TimerRunner::new(TimerEngine::default(), notifier.clone());
        assert!(runner.run_until_expired(|_| {}).await.is_none());
        assert!(notifier.0.lock().unwrap().is_empty());
    }
}
