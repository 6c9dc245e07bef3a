use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Bitcom OP_RETURN decoder (B, MAP, METANET, AIP)
#[derive(Parser)]
#[command(name = "bmap-decoder")]
#[command(about = "Decode bitcom OP_RETURN protocols from indexed transactions")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode indexed transactions read from a file or stdin
    Decode(commands::decode::DecodeCommand),
    /// List the protocols the decoder recognises
    Protocols(commands::protocols::ProtocolsCommand),
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())
        .map_err(|e| AppError::Config(format!("Failed to load configuration: {}", e)))?;

    // Uses RUST_LOG environment variable (falls back to logging.level, "error" by default).
    // Logs go to stderr so stdout stays valid JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Commands::Decode(command) => command.run(&config),
        Commands::Protocols(command) => command.run(&config),
    }
}
