//! TrialScout CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive conversation or single-message mode
//! - `reset`  — End the current conversation
//! - `status` — Show configuration and session state

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "trialscout",
    about = "TrialScout — conversational clinical trial search",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the trial search assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// End the current conversation
    Reset,

    /// Show configuration and session state
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Reset => commands::reset::run().await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
