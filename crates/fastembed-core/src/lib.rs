// crates/fastembed-core/src/lib.rs
//
// fastembed-core: Embedding engine for FastEmbed.
//
// Generates fixed-dimension embeddings two ways: a deterministic hash path
// that needs no model, and a model path that runs an external neural network
// through a pluggable runtime behind a single-slot session cache. Also
// provides the vector kernels used to compare embeddings.

pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod hash;
pub mod normalizer;
pub mod runtime;
pub mod session;
pub mod text;
pub mod tokenizer;
pub mod vector;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use fastembed_core::FastEmbed;`

// Entry point
pub use api::FastEmbed;

// Configuration
pub use config::{Dimension, ModelConfig, DEFAULT_DIMENSION, MAX_DIMENSION, SUPPORTED_DIMENSIONS};

// Generators
pub use generator::EmbeddingGenerator;
pub use session::{CacheState, ModelSessionCache, SessionInfo, SessionStats};

// Collaborator contracts
pub use runtime::ModelRuntime;
pub use tokenizer::{SimpleTokenizer, Tokenizer};

// Error type
pub use error::EmbedError;
