use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rollcall-cli", version, about = "Rollcall CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check in for today
    Checkin {
        /// User id to record
        user_id: String,
    },
    /// Today's attendees
    Today,
    /// Monthly top-10 ranking
    Ranking {
        /// Year of the month to rank (defaults to the current month)
        #[arg(long, requires = "month")]
        year: Option<i32>,
        /// Month to rank, 1-12
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
    /// Daily prompt control
    Prompt {
        #[command(subcommand)]
        action: commands::prompt::PromptAction,
    },
    /// Run the daily prompt scheduler in the foreground
    Serve,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Checkin { user_id } => commands::checkin::run(&user_id),
        Commands::Today => commands::today::run(),
        Commands::Ranking { year, month } => commands::ranking::run(year, month),
        Commands::Prompt { action } => commands::prompt::run(action),
        Commands::Serve => commands::serve::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
