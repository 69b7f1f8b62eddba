use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "foldcal", version, about = "Drag-to-expand calendar engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Monday-first week containing a date
    Week {
        /// Anchor date (YYYY-MM-DD)
        date: String,
    },
    /// Print the month grid for a date, one array per row
    Month {
        /// Anchor date (YYYY-MM-DD)
        date: String,
    },
    /// Print the calendar view snapshot at a given expansion
    View(commands::view::ViewArgs),
    /// Replay a drag on the handle and print the resulting events
    Drag(commands::drag::DragArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Week { date } => commands::dates::week(&date),
        Commands::Month { date } => commands::dates::month(&date),
        Commands::View(args) => commands::view::run(args),
        Commands::Drag(args) => commands::drag::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
