use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habit-tracker", version, about = "Habit Tracker CLI")]
struct Cli {
    /// Tracker owner; defaults to the logged-in user, else "local"
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Daily checks
    Check {
        #[command(subcommand)]
        action: commands::check::CheckAction,
    },
    /// Completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Set the chart window length in days (7-120)
    Window {
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    /// Delete all habits and checks for the user
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Export the tracker state as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Account management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Shared daily feed
    Feed {
        #[command(subcommand)]
        action: commands::feed::FeedAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let user = cli.user;
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(user, action),
        Commands::Check { action } => commands::check::run(user, action),
        Commands::Stats { action } => commands::stats::run(user, action),
        Commands::Window { days } => commands::tracker::window(user, days),
        Commands::Reset { yes } => commands::tracker::reset(user, yes),
        Commands::Export { output } => commands::tracker::export(user, output),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Feed { action } => commands::feed::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
