use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "slotwise", version, about = "Slotwise calendar scheduling CLI")]
struct Cli {
    /// Preferences file (default: ~/.config/slotwise/preferences.toml)
    #[arg(long, global = true, value_name = "FILE")]
    prefs: Option<PathBuf>,

    /// Events as a JSON array (default: read from stdin)
    #[arg(long, global = true, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out overlapping events in lanes
    Layout(commands::layout::LayoutArgs),
    /// Detect scheduling conflicts
    Conflicts(commands::conflicts::ConflictsArgs),
    /// Search ranked meeting slots
    Search(commands::search::SearchArgs),
    /// Generate scheduling suggestions
    Suggest(commands::suggest::SuggestArgs),
    /// Preferences management
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = commands::Context {
        prefs_path: cli.prefs,
        events_path: cli.events,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Layout(args) => commands::layout::run(&ctx, args),
        Commands::Conflicts(args) => commands::conflicts::run(&ctx, args),
        Commands::Search(args) => commands::search::run(&ctx, args),
        Commands::Suggest(args) => commands::suggest::run(&ctx, args),
        Commands::Prefs { action } => commands::prefs::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
