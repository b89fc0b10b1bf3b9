use clap::{Parser, Subcommand};
use focusos_core::{AuthError, CoreError};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusos", version, about = "FocusOS: focus timer, tasks, mood, friends and learning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in and manage your profile
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Mood journal
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Friends and invitations
    Friend {
        #[command(subcommand)]
        action: commands::friend::FriendAction,
    },
    /// Learning courses
    Course {
        #[command(subcommand)]
        action: commands::course::CourseAction,
    },
    /// Dashboard and session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Local data maintenance
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Friend { action } => commands::friend::run(action),
        Commands::Course { action } => commands::course::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        if let Some(CoreError::Auth(AuthError::NotSignedIn)) = e.downcast_ref::<CoreError>() {
            eprintln!("hint: run `focusos auth signin <email>` first");
        }
        std::process::exit(1);
    }
}
