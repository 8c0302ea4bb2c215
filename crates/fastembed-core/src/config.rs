// crates/fastembed-core/src/config.rs
//
// Limits shared by every embedding path, the validated `Dimension` type for
// the hash path, and the tunables of the model path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EmbedError;

/// Dimensions accepted by the hash-based generator.
pub const SUPPORTED_DIMENSIONS: [usize; 6] = [128, 256, 512, 768, 1024, 2048];

/// Dimension substituted when a caller asks for `0`.
pub const DEFAULT_DIMENSION: usize = 128;

/// Largest vector any operation accepts from the command-line tools.
pub const MAX_DIMENSION: usize = 2048;

/// Maximum input text length, in bytes.
pub const MAX_TEXT_LENGTH: usize = 8192;

/// Maximum number of floats copied out of a model output tensor.
pub const MAX_OUTPUT_DIM: usize = 2048;

/// Maximum token sequence length handed to the model runtime.
pub const MAX_SEQUENCE_LENGTH: usize = 8192;

/// Vocabulary size of the placeholder tokenizer (BERT base).
pub const VOCAB_SIZE: u32 = 30528;

/// A hash-path embedding dimension that passed whitelist validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Dimension(usize);

impl Dimension {
    /// Validate a requested dimension. `0` selects [`DEFAULT_DIMENSION`].
    pub fn resolve(requested: usize) -> Result<Self, EmbedError> {
        if requested == 0 {
            return Ok(Self(DEFAULT_DIMENSION));
        }
        if SUPPORTED_DIMENSIONS.contains(&requested) {
            Ok(Self(requested))
        } else {
            Err(EmbedError::InvalidDimension(requested))
        }
    }

    /// Number of floats in an embedding of this dimension.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self(DEFAULT_DIMENSION)
    }
}

impl TryFrom<usize> for Dimension {
    type Error = EmbedError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::resolve(value)
    }
}

impl From<Dimension> for usize {
    fn from(dimension: Dimension) -> Self {
        dimension.0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tunables of the model-based embedding path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Token sequence cap passed to the tokenizer (longer input is truncated).
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,

    /// Largest dimension that may be copied out of the output tensor.
    #[serde(default = "default_max_output_dim")]
    pub max_output_dim: usize,

    /// Input name of the token id tensor.
    #[serde(default = "default_input_ids_name")]
    pub input_ids_name: String,

    /// Input name of the token type id tensor.
    #[serde(default = "default_token_type_ids_name")]
    pub token_type_ids_name: String,

    /// Input name of the attention mask tensor.
    #[serde(default = "default_attention_mask_name")]
    pub attention_mask_name: String,

    /// Output vectors with an L2 norm at or below this stay unnormalized.
    #[serde(default = "default_norm_epsilon")]
    pub norm_epsilon: f64,
}

fn default_max_sequence_length() -> usize {
    MAX_SEQUENCE_LENGTH
}

fn default_max_output_dim() -> usize {
    MAX_OUTPUT_DIM
}

fn default_input_ids_name() -> String {
    "input_ids".to_string()
}

fn default_token_type_ids_name() -> String {
    "token_type_ids".to_string()
}

fn default_attention_mask_name() -> String {
    "attention_mask".to_string()
}

fn default_norm_epsilon() -> f64 {
    1e-8
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_sequence_length: default_max_sequence_length(),
            max_output_dim: default_max_output_dim(),
            input_ids_name: default_input_ids_name(),
            token_type_ids_name: default_token_type_ids_name(),
            attention_mask_name: default_attention_mask_name(),
            norm_epsilon: default_norm_epsilon(),
        }
    }
}
