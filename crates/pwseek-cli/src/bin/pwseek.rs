use clap::Parser;
use pwseek_cli::command::Commands;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// BestCrypt v4 (scrypt) format utility
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Commands
    #[command(subcommand)]
    pub command: Commands,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.command.run() {
        error!("CLI failed: {e}");
        std::process::exit(1);
    }
}
