// crates/fastembed-core/src/api.rs
//
// Public entry point. Dispatches to the hash generator, the model session
// cache and the vector kernels; validation lives in those components.
//
// Model support is optional. A `FastEmbed` built without a runtime serves
// `generate_model` from the hash path, which is the documented fallback
// rather than an error.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::EmbedError;
use crate::generator::EmbeddingGenerator;
use crate::runtime::ModelRuntime;
use crate::session::{CacheState, ModelSessionCache, SessionInfo, SessionStats};
use crate::vector;

/// Message reported by `last_error` when no model runtime is attached.
pub const RUNTIME_UNAVAILABLE: &str = "model runtime not available";

/// Embedding engine: hash path, optional model path, vector operations.
#[derive(Debug)]
pub struct FastEmbed {
    generator: EmbeddingGenerator,
    models: Option<Mutex<ModelSessionCache>>,
}

impl FastEmbed {
    /// Engine with the hash path only.
    pub fn new() -> Self {
        Self {
            generator: EmbeddingGenerator::new(),
            models: None,
        }
    }

    /// Engine whose model path runs on `runtime`, with the default tokenizer
    /// and limits.
    pub fn with_runtime(runtime: Box<dyn ModelRuntime>) -> Self {
        Self::with_model_cache(ModelSessionCache::with_runtime(runtime))
    }

    pub fn with_model_cache(cache: ModelSessionCache) -> Self {
        Self {
            generator: EmbeddingGenerator::new(),
            models: Some(Mutex::new(cache)),
        }
    }

    pub fn has_model_runtime(&self) -> bool {
        self.models.is_some()
    }

    fn lock_models(
        cache: &Mutex<ModelSessionCache>,
    ) -> Result<MutexGuard<'_, ModelSessionCache>, EmbedError> {
        cache
            .lock()
            .map_err(|e| EmbedError::Lock(format!("Mutex poisoned: {}", e)))
    }

    // --- Hash path ---

    pub fn generate(&self, text: &str, dimension: usize) -> Result<Vec<f32>, EmbedError> {
        self.generator.generate(text, dimension)
    }

    pub fn generate_into(
        &self,
        text: &str,
        output: &mut [f32],
        dimension: usize,
    ) -> Result<(), EmbedError> {
        self.generator.generate_into(text, output, dimension)?;
        Ok(())
    }

    pub fn generate_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        dimension: usize,
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.generator.generate_batch(texts, dimension)
    }

    pub fn generate_batch_into<S: AsRef<str>>(
        &self,
        texts: &[S],
        outputs: &mut [&mut [f32]],
        dimension: usize,
    ) -> Result<(), EmbedError> {
        self.generator.generate_batch_into(texts, outputs, dimension)
    }

    // --- Model path ---

    /// Embed `text` with the model at `model_path`.
    ///
    /// Without a runtime this is [`generate`](Self::generate), so the hash
    /// dimension whitelist applies.
    pub fn generate_model(
        &self,
        model_path: impl AsRef<Path>,
        text: &str,
        dimension: usize,
    ) -> Result<Vec<f32>, EmbedError> {
        let Some(models) = &self.models else {
            tracing::debug!("No model runtime attached, using hash embedding");
            return self.generate(text, dimension);
        };

        let mut cache = Self::lock_models(models)?;
        let capacity = dimension.min(cache.config().max_output_dim);
        let mut output = vec![0.0f32; capacity];
        cache.generate(model_path.as_ref(), text, &mut output, dimension)?;
        Ok(output)
    }

    pub fn generate_model_into(
        &self,
        model_path: impl AsRef<Path>,
        text: &str,
        output: &mut [f32],
        dimension: usize,
    ) -> Result<(), EmbedError> {
        match &self.models {
            Some(models) => {
                Self::lock_models(models)?.generate(model_path.as_ref(), text, output, dimension)
            }
            None => {
                tracing::debug!("No model runtime attached, using hash embedding");
                self.generate_into(text, output, dimension)
            }
        }
    }

    /// Release the cached model session. A no-op without a runtime.
    pub fn unload_model(&self) -> Result<(), EmbedError> {
        match &self.models {
            Some(models) => Self::lock_models(models)?.unload(),
            None => Ok(()),
        }
    }

    /// Message of the most recent model-path failure.
    pub fn last_error(&self) -> Option<String> {
        let Some(models) = &self.models else {
            return Some(RUNTIME_UNAVAILABLE.to_string());
        };
        match Self::lock_models(models) {
            Ok(cache) => cache.last_error().map(str::to_string),
            Err(e) => Some(e.to_string()),
        }
    }

    pub fn session_stats(&self) -> Option<SessionStats> {
        let models = self.models.as_ref()?;
        Self::lock_models(models).ok().map(|cache| cache.stats())
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        let models = self.models.as_ref()?;
        Self::lock_models(models).ok()?.session_info()
    }

    pub fn cache_state(&self) -> Option<CacheState> {
        let models = self.models.as_ref()?;
        Self::lock_models(models).ok().map(|cache| cache.state())
    }

    // --- Vector operations (length-checked) ---

    pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32, EmbedError> {
        vector::check_pair(a, b)?;
        Ok(vector::dot_product(a, b))
    }

    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbedError> {
        vector::check_pair(a, b)?;
        Ok(vector::cosine_similarity(a, b))
    }

    pub fn vector_norm(v: &[f32]) -> Result<f32, EmbedError> {
        vector::check_single(v)?;
        Ok(vector::vector_norm(v))
    }

    pub fn normalize(v: &mut [f32]) -> Result<(), EmbedError> {
        vector::check_single(v)?;
        vector::normalize(v);
        Ok(())
    }

    pub fn add_vectors(a: &[f32], b: &[f32]) -> Result<Vec<f32>, EmbedError> {
        let len = vector::check_pair(a, b)?;
        let mut result = vec![0.0f32; len];
        vector::add_vectors(a, b, &mut result);
        Ok(result)
    }

    pub fn add_vectors_into(a: &[f32], b: &[f32], result: &mut [f32]) -> Result<(), EmbedError> {
        let len = vector::check_pair(a, b)?;
        if result.len() < len {
            return Err(EmbedError::OutputTooSmall {
                required: len,
                actual: result.len(),
            });
        }
        vector::add_vectors(a, b, &mut result[..len]);
        Ok(())
    }
}

impl Default for FastEmbed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_falls_back_to_hash() {
        let engine = FastEmbed::new();
        assert!(!engine.has_model_runtime());
        let via_model = engine
            .generate_model("/no/such/model.onnx", "fallback text", 768)
            .unwrap();
        assert_eq!(via_model, engine.generate("fallback text", 768).unwrap());
    }

    #[test]
    fn test_fallback_applies_hash_validation() {
        let engine = FastEmbed::new();
        assert!(matches!(
            engine.generate_model("model.onnx", "text", 300),
            Err(EmbedError::InvalidDimension(300))
        ));
    }

    #[test]
    fn test_without_runtime_unload_succeeds() {
        let engine = FastEmbed::new();
        assert!(engine.unload_model().is_ok());
        assert_eq!(engine.last_error().as_deref(), Some(RUNTIME_UNAVAILABLE));
        assert!(engine.session_stats().is_none());
        assert!(engine.cache_state().is_none());
    }

    #[test]
    fn test_checked_vector_ops() {
        assert_eq!(FastEmbed::dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0);
        assert_eq!(FastEmbed::vector_norm(&[3.0, 4.0, 0.0]).unwrap(), 5.0);
        assert_eq!(
            FastEmbed::add_vectors(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(),
            vec![5.0, 7.0, 9.0]
        );
        assert_eq!(FastEmbed::cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap(), -1.0);
    }

    #[test]
    fn test_vector_ops_reject_misuse() {
        assert!(matches!(
            FastEmbed::dot_product(&[1.0], &[1.0, 2.0]),
            Err(EmbedError::DimensionMismatch { .. })
        ));
        assert!(matches!(FastEmbed::vector_norm(&[]), Err(EmbedError::EmptyVector)));
        let mut small = [0.0f32; 1];
        assert!(matches!(
            FastEmbed::add_vectors_into(&[1.0, 2.0], &[3.0, 4.0], &mut small),
            Err(EmbedError::OutputTooSmall { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_normalize_checked() {
        let mut v = [3.0f32, 4.0, 0.0];
        FastEmbed::normalize(&mut v).unwrap();
        assert!((FastEmbed::vector_norm(&v).unwrap() - 1.0).abs() < 1e-6);
        let mut empty: [f32; 0] = [];
        assert!(FastEmbed::normalize(&mut empty).is_err());
    }
}
