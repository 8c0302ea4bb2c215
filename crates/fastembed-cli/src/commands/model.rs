// crates/fastembed-cli/src/commands/model.rs
//
// `fastembed model --model <file> [text]`: embed with a neural network model.
//
// This binary links no model runtime, so the engine serves the request from
// the hash path and a warning is written to stderr.

use clap::Args;
use fastembed_core::FastEmbed;

use crate::commands::read_input;
use crate::config::{expand_tilde, CliConfig};
use crate::error::CliError;
use crate::output::format_vector;

/// Model-based embedding command.
#[derive(Debug, Args)]
pub struct ModelCmd {
    /// Path to the model file. Defaults to `model_path` from the config.
    #[arg(long, short)]
    pub model: Option<String>,

    /// Text to embed. Read from stdin when omitted.
    #[arg()]
    pub text: Option<String>,

    /// Number of output values to keep.
    #[arg(long, short)]
    pub dimension: Option<usize>,

    /// Decimal places per value.
    #[arg(long)]
    pub precision: Option<usize>,
}

/// Run the model command.
pub fn run(cmd: &ModelCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let model_path = cmd
        .model
        .as_deref()
        .or(config.model_path.as_deref())
        .map(expand_tilde)
        .ok_or(CliError::MissingModelPath)?;
    let text = read_input(cmd.text.as_deref())?;
    let dimension = cmd.dimension.unwrap_or(config.dimension);
    let precision = cmd.precision.unwrap_or(config.precision);

    let engine = FastEmbed::new();
    if !engine.has_model_runtime() {
        eprintln!(
            "{}",
            serde_json::json!({
                "warning": "Model runtime not available, using hash-based embedding"
            })
        );
    }

    let embedding = engine.generate_model(&model_path, &text, dimension)?;
    tracing::debug!("Generated {}-d embedding for model {}", embedding.len(), model_path);

    println!("{}", format_vector(&embedding, precision));
    Ok(())
}
