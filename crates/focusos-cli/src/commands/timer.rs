use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use focusos_core::storage::{Config, LocalStorage};
use focusos_core::store::DataStore;
use focusos_core::timer::{
    format_clock, notify_expiry, Notifier, NullNotifier, TerminalNotifier, TimerEngine, TimerMode, TimerRunner,
    TimerSettings, TimerState,
};
use focusos_core::Event;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start an interval (the staged one unless --mode is given)
    Start {
        /// focus, short-break or long-break
        #[arg(long)]
        mode: Option<TimerMode>,
    },
    /// Pause the running interval
    Pause,
    /// Resume a paused interval
    Resume,
    /// Abandon the interval and reset to focus
    Stop,
    /// Finish the current interval now and move on
    Skip,
    /// Print current timer state as JSON
    Status,
    /// Count down in the terminal until the interval ends
    Watch {
        /// Keep going through auto-started intervals
        #[arg(long)]
        follow: bool,
    },
    /// Show or change interval settings
    Settings {
        #[arg(long)]
        focus: Option<u32>,
        #[arg(long)]
        short_break: Option<u32>,
        #[arg(long)]
        long_break: Option<u32>,
        /// Focus intervals between long breaks
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        #[arg(long)]
        auto_start_focus: Option<bool>,
    },
}

fn engine_key(user_id: &str) -> String {
    format!("focusos-timer:{user_id}")
}

fn load_engine(storage: &LocalStorage, user_id: &str, settings: &TimerSettings) -> TimerEngine {
    let stored = storage
        .get(&engine_key(user_id))
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str::<TimerEngine>(&json).ok());
    let mut engine = stored.unwrap_or_else(|| TimerEngine::new(settings.clone()));
    if engine.settings() != settings {
        if let Err(err) = engine.update_settings(settings.clone()) {
            tracing::warn!(%err, "ignoring invalid timer settings");
        }
    }
    engine
}

fn save_engine(storage: &LocalStorage, user_id: &str, engine: &TimerEngine) -> CmdResult {
    let json = serde_json::to_string(engine)?;
    storage.set(&engine_key(user_id), &json)?;
    Ok(())
}

fn notifier(config: &Config) -> Arc<dyn Notifier> {
    if config.notifications.enabled {
        Arc::new(TerminalNotifier {
            bell: config.notifications.bell,
        })
    } else {
        Arc::new(NullNotifier)
    }
}

/// Record the session an expiry completed.
fn record(store: &mut DataStore<'_>, event: &Event) -> CmdResult {
    if let Some(session) = event.completed_session() {
        store.add_timer_session(session.clone())?;
    }
    Ok(())
}

/// Alert and record an expiry observed outside the runner.
fn settle(store: &mut DataStore<'_>, notifier: &dyn Notifier, event: &Event) -> CmdResult {
    notify_expiry(notifier, event);
    record(store, event)
}

fn emit(event: Option<Event>, refused: &str) -> Result<Event, Box<dyn std::error::Error>> {
    let event = event.ok_or(refused)?;
    print_json(&event)?;
    Ok(event)
}

pub fn run(action: TimerAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let mut config = Config::load()?;
    let mut store = open_store(&storage, &config)?;
    let user_id = store.user_id().to_string();
    let mut engine = load_engine(&storage, &user_id, &config.timer);
    let notifier = notifier(&config);

    // Catch up on an interval that ran out since the last invocation.
    if let Some(event) = engine.tick() {
        settle(&mut store, &*notifier, &event)?;
    }

    match action {
        TimerAction::Start { mode } => {
            emit(engine.start(mode), "timer is already running or paused")?;
        }
        TimerAction::Pause => {
            let event = emit(engine.pause(), "timer is not running")?;
            settle(&mut store, &*notifier, &event)?;
        }
        TimerAction::Resume => {
            emit(engine.resume(), "timer is not paused")?;
        }
        TimerAction::Stop => {
            emit(engine.stop(), "timer is idle")?;
        }
        TimerAction::Skip => {
            let event = emit(engine.expire(), "no interval in progress")?;
            settle(&mut store, &*notifier, &event)?;
        }
        TimerAction::Status => {
            print_json(&engine.snapshot())?;
        }
        TimerAction::Watch { follow } => {
            if engine.state() != TimerState::Running {
                return Err("timer is not running (use `focusos timer start`)".into());
            }
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let mut runner = TimerRunner::new(engine, notifier).with_period(Duration::from_secs(1));
            loop {
                let expired = runtime.block_on(runner.run_until_expired(|engine| {
                    eprint!(
                        "\r{} {}  ",
                        engine.mode().label(),
                        format_clock(engine.remaining_ms())
                    );
                }));
                eprintln!();
                let Some(event) = expired else { break };
                print_json(&event)?;
                record(&mut store, &event)?;
                save_engine(&storage, &user_id, runner.engine())?;
                if !follow || runner.engine().state() != TimerState::Running {
                    break;
                }
            }
            engine = runner.into_engine();
        }
        TimerAction::Settings {
            focus,
            short_break,
            long_break,
            interval,
            auto_start_breaks,
            auto_start_focus,
        } => {
            let mut settings = config.timer.clone();
            settings.focus_minutes = focus.unwrap_or(settings.focus_minutes);
            settings.short_break_minutes = short_break.unwrap_or(settings.short_break_minutes);
            settings.long_break_minutes = long_break.unwrap_or(settings.long_break_minutes);
            settings.long_break_interval = interval.unwrap_or(settings.long_break_interval);
            settings.auto_start_breaks = auto_start_breaks.unwrap_or(settings.auto_start_breaks);
            settings.auto_start_focus = auto_start_focus.unwrap_or(settings.auto_start_focus);

            if settings == config.timer {
                print_json(&config.timer)?;
            } else {
                let event = engine.update_settings(settings.clone())?;
                config.timer = settings;
                config.save()?;
                print_json(&event)?;
            }
        }
    }

    save_engine(&storage, &user_id, &engine)?;
    Ok(())
}
