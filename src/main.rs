use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "purgify", version, about = "AI-powered writing enhancement")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fix grammar, spelling, and punctuation of the given text
    Fix { text: String },
    /// Rephrase the given text while keeping its meaning
    Rephrase { text: String },
    /// Check local engine connectivity and list installed models
    Probe {
        /// Override the configured local engine URL
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the configuration file path and current values
    Config,
    /// Open the TUI directly on the settings panel
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    purgify::logging::init()?;

    match cli.command {
        Some(Commands::Fix { text }) => purgify::fix(&text).await,
        Some(Commands::Rephrase { text }) => purgify::rephrase(&text).await,
        Some(Commands::Probe { host }) => purgify::probe(host).await,
        Some(Commands::Config) => purgify::config_info(),
        Some(Commands::Settings) => purgify::tui::run(true).await,
        None => purgify::tui::run(false).await,
    }
}
