mod engine;
mod runner;
mod settings;

pub use engine::{TimerEngine, TimerState};
pub use runner::{notify_expiry, Notifier, NullNotifier, TerminalNotifier, TimerRunner};
pub use settings::{format_clock, TimerMode, TimerSettings};
