use thiserror::Error;

use fastembed_core::EmbedError;

/// Errors raised by the CLI itself, on top of engine errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Invalid input format: {0}")]
    InvalidInput(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("No model path given (use --model or set model_path in the config)")]
    MissingModelPath,

    #[error(transparent)]
    Embed(#[from] EmbedError),
}
