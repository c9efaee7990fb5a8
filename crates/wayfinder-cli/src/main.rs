use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "wayfinder-cli", version, about = "Wayfinder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank actions and plan suggestion reveals for a route
    Suggest(commands::suggest::SuggestArgs),
    /// Explain the emergency-mode decision
    Emergency(commands::emergency::EmergencyArgs),
    /// Drive a live session and print events as they happen
    Session(commands::session::SessionArgs),
    /// List known site routes
    Routes,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("WAYFINDER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Emergency(args) => commands::emergency::run(args),
        Commands::Session(args) => commands::session::run(args),
        Commands::Routes => commands::routes::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
