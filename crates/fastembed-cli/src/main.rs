// crates/fastembed-cli/src/main.rs
//
// CLI entrypoint for the FastEmbed tools.
//
// Provides subcommands for hash-based and model-based embedding, single
// vector operations from JSON, and pairwise similarity of several texts.
// Results go to stdout; logs and errors go to stderr, errors as
// `{"error": "..."}` with exit code 1.

mod commands;
mod config;
mod error;
mod output;

use std::path::Path;

use clap::{Parser, Subcommand};
use commands::embed::EmbedCmd;
use commands::model::ModelCmd;
use commands::similarity::SimilarityCmd;
use commands::vector::VectorCmd;
use config::CliConfig;

/// FastEmbed CLI: text embeddings and vector math.
#[derive(Parser, Debug)]
#[command(
    name = "fastembed",
    version = "0.1.0",
    about = "FastEmbed CLI: deterministic text embeddings and vector operations"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.fastembed/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the hash-based embedding of a text.
    Embed(EmbedCmd),

    /// Print the embedding of a text produced by a model file.
    Model(ModelCmd),

    /// Run a vector operation described by a JSON request.
    Vector(VectorCmd),

    /// Print pairwise cosine similarities of several texts.
    Similarity(SimilarityCmd),
}

fn run(cli: &Cli, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Embed(cmd) => commands::embed::run(cmd, config)?,
        Commands::Model(cmd) => commands::model::run(cmd, config)?,
        Commands::Vector(cmd) => commands::vector::run(cmd, config)?,
        Commands::Similarity(cmd) => commands::similarity::run(cmd, config)?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // The log level comes from the config file, so load it before the
    // subscriber exists and report the outcome afterwards.
    let loaded = CliConfig::load(&cli.config);
    let log_level = match &loaded {
        Ok(cfg) => cfg.log_level.clone(),
        Err(_) => CliConfig::default().log_level,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    let config = match loaded {
        Ok(cfg) => {
            tracing::debug!("Loaded configuration from {}", cli.config);
            cfg
        }
        Err(e) => {
            if Path::new(&config::expand_tilde(&cli.config)).exists() {
                tracing::warn!("Could not load config from {}: {}. Using defaults.", cli.config, e);
            } else {
                tracing::debug!("No config at {}, using defaults", cli.config);
            }
            CliConfig::default()
        }
    };

    if let Err(e) = run(&cli, &config) {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        std::process::exit(1);
    }
}
