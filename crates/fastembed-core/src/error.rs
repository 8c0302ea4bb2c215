use thiserror::Error;

/// Error type shared by the hash path, the model path and the vector kernels.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Input text was empty (or began with a NUL byte).
    #[error("Validation error: text is empty")]
    EmptyText,

    /// Input text exceeds the maximum supported length.
    #[error("Validation error: text length {length} exceeds maximum of {max}")]
    TextTooLong { length: usize, max: usize },

    /// Requested dimension is not supported on this path.
    #[error("Validation error: unsupported dimension {0}")]
    InvalidDimension(usize),

    /// Caller-provided output buffer cannot hold the requested dimension.
    #[error("Validation error: output buffer holds {actual} values, {required} required")]
    OutputTooSmall { required: usize, actual: usize },

    /// Two vectors passed to a binary vector operation differ in length.
    #[error("Validation error: vector length mismatch ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    /// A vector operation received a zero-length vector.
    #[error("Validation error: vector is empty")]
    EmptyVector,

    /// Batch call received no texts.
    #[error("Validation error: batch is empty")]
    EmptyBatch,

    /// Batch call received a different number of texts and output buffers.
    #[error("Validation error: {texts} texts but {outputs} output buffers")]
    BatchMismatch { texts: usize, outputs: usize },

    /// Model file is missing or its path cannot be resolved.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Failure reported by the model runtime (session, tensor, inference).
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The model runtime has not been used yet, so there is nothing to act on.
    #[error("Runtime error: model runtime not initialized")]
    RuntimeNotInitialized,

    /// Tokenizer rejected its input or configuration.
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// The session cache lock was poisoned by a panicking caller.
    #[error("Lock error: {0}")]
    Lock(String),
}

impl EmbedError {
    /// Whether this error was raised by input validation, before any work ran.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EmbedError::EmptyText
                | EmbedError::TextTooLong { .. }
                | EmbedError::InvalidDimension(_)
                | EmbedError::OutputTooSmall { .. }
                | EmbedError::DimensionMismatch { .. }
                | EmbedError::EmptyVector
                | EmbedError::EmptyBatch
                | EmbedError::BatchMismatch { .. }
        )
    }
}
