// crates/fastembed-cli/src/commands/embed.rs
//
// `fastembed embed [text]`: print the hash-based embedding of a text as a
// JSON array.

use clap::Args;
use fastembed_core::FastEmbed;

use crate::commands::read_input;
use crate::config::CliConfig;
use crate::output::format_vector;

/// Hash-based embedding command.
#[derive(Debug, Args)]
pub struct EmbedCmd {
    /// Text to embed. Read from stdin when omitted.
    #[arg()]
    pub text: Option<String>,

    /// Embedding dimension: 128, 256, 512, 768, 1024 or 2048 (0 = 128).
    #[arg(long, short)]
    pub dimension: Option<usize>,

    /// Decimal places per value.
    #[arg(long)]
    pub precision: Option<usize>,
}

/// Run the embed command.
pub fn run(cmd: &EmbedCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(cmd.text.as_deref())?;
    let dimension = cmd.dimension.unwrap_or(config.dimension);
    let precision = cmd.precision.unwrap_or(config.precision);

    let engine = FastEmbed::new();
    let embedding = engine.generate(&text, dimension)?;
    tracing::debug!("Generated {}-d hash embedding", embedding.len());

    println!("{}", format_vector(&embedding, precision));
    Ok(())
}
