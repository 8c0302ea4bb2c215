// crates/fastembed-core/src/session.rs
//
// Single-slot model session cache for the model-based embedding path.
//
// States:
//   Empty -> Loaded(path)          first load
//   Loaded(path) -> Loaded(path)   same resolved path, session reused
//   Loaded(path) -> Loaded(other)  old session torn down, then new load
//   Loaded(path) -> Empty          explicit unload
//
// Long-lived handles are released in dependency order: output name,
// session, session options, memory info. The runtime environment is created
// once and survives swaps and unloads; it is released only when the cache
// is dropped. A failed load releases whatever that attempt created and
// leaves the cache Empty. Tensors created for one inference are released
// before the call returns, whatever the outcome.
//
// The cache is not synchronized. `FastEmbed` wraps it in a mutex so the
// whole load-or-reuse-and-infer sequence runs as one critical section.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ModelConfig;
use crate::error::EmbedError;
use crate::runtime::{
    EnvironmentHandle, MemoryInfoHandle, ModelRuntime, OutputName, SessionHandle,
    SessionOptionsHandle, TensorHandle,
};
use crate::text::until_nul;
use crate::tokenizer::{SimpleTokenizer, Tokenizer};
use crate::vector::l2_normalize_precise;

/// Observable state of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// No session is loaded.
    Empty,
    /// A session for this canonical path is loaded.
    Loaded(PathBuf),
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheState::Empty => write!(f, "Empty"),
            CacheState::Loaded(path) => write!(f, "Loaded({})", path.display()),
        }
    }
}

/// Counters for cache behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Sessions created.
    pub loads: u64,
    /// Calls served by the already-loaded session.
    pub reuses: u64,
    /// Sessions torn down, by path swap or explicit unload.
    pub unloads: u64,
    /// Load attempts that failed after path resolution.
    pub failed_loads: u64,
}

/// Description of the loaded session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub model_path: PathBuf,
    pub output_name: String,
    pub loaded_at: DateTime<Utc>,
}

struct LoadedSession {
    path: PathBuf,
    memory_info: MemoryInfoHandle,
    options: SessionOptionsHandle,
    session: SessionHandle,
    output_name: OutputName,
    loaded_at: DateTime<Utc>,
}

/// Owns the handles of a load in progress and releases them if the load
/// does not complete.
struct PendingSession<'a> {
    runtime: &'a mut dyn ModelRuntime,
    memory_info: Option<MemoryInfoHandle>,
    options: Option<SessionOptionsHandle>,
    session: Option<SessionHandle>,
}

impl<'a> PendingSession<'a> {
    fn new(runtime: &'a mut dyn ModelRuntime) -> Self {
        Self {
            runtime,
            memory_info: None,
            options: None,
            session: None,
        }
    }

    /// The load completed; ownership of the handles moves to the caller.
    fn disarm(mut self) {
        self.memory_info = None;
        self.options = None;
        self.session = None;
    }
}

impl Drop for PendingSession<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.runtime.release_session(session);
        }
        if let Some(options) = self.options.take() {
            self.runtime.release_session_options(options);
        }
        if let Some(memory_info) = self.memory_info.take() {
            self.runtime.release_memory_info(memory_info);
        }
    }
}

/// Tensors created during one inference call, released on drop.
struct TensorScope<'a> {
    runtime: &'a mut dyn ModelRuntime,
    tensors: Vec<TensorHandle>,
}

impl<'a> TensorScope<'a> {
    fn new(runtime: &'a mut dyn ModelRuntime) -> Self {
        Self {
            runtime,
            tensors: Vec::with_capacity(4),
        }
    }

    fn create(
        &mut self,
        memory_info: MemoryInfoHandle,
        data: &[i64],
        shape: &[i64],
    ) -> Result<TensorHandle, EmbedError> {
        let tensor = self.runtime.create_tensor(memory_info, data, shape)?;
        self.tensors.push(tensor);
        Ok(tensor)
    }

    fn run(
        &mut self,
        session: SessionHandle,
        input_names: &[&str],
        inputs: &[TensorHandle],
        output_names: &[&str],
    ) -> Result<Vec<TensorHandle>, EmbedError> {
        let outputs = self
            .runtime
            .run(session, input_names, inputs, output_names)?;
        self.tensors.extend_from_slice(&outputs);
        Ok(outputs)
    }
}

impl Drop for TensorScope<'_> {
    fn drop(&mut self) {
        for tensor in self.tensors.drain(..) {
            self.runtime.release_tensor(tensor);
        }
    }
}

fn load_session(
    runtime: &mut dyn ModelRuntime,
    env: EnvironmentHandle,
    path: PathBuf,
) -> Result<LoadedSession, EmbedError> {
    let mut pending = PendingSession::new(runtime);

    let memory_info = pending.runtime.create_memory_info()?;
    pending.memory_info = Some(memory_info);

    let options = pending.runtime.create_session_options()?;
    pending.options = Some(options);

    let session = pending.runtime.create_session(env, &path, options)?;
    pending.session = Some(session);

    let output_name = pending.runtime.output_name(session)?;
    pending.disarm();

    Ok(LoadedSession {
        path,
        memory_info,
        options,
        session,
        output_name,
        loaded_at: Utc::now(),
    })
}

/// Resolve `path` to a canonical path naming an existing file.
pub fn resolve_model_path(path: &Path) -> Result<PathBuf, EmbedError> {
    if path.as_os_str().is_empty() {
        return Err(EmbedError::ModelNotFound("empty model path".to_string()));
    }
    let resolved = fs::canonicalize(path)
        .map_err(|e| EmbedError::ModelNotFound(format!("{}: {}", path.display(), e)))?;
    if !resolved.is_file() {
        return Err(EmbedError::ModelNotFound(format!(
            "{} is not a file",
            resolved.display()
        )));
    }
    Ok(resolved)
}

/// Holds at most one loaded model session and runs inference through it.
pub struct ModelSessionCache {
    runtime: Box<dyn ModelRuntime>,
    tokenizer: Box<dyn Tokenizer>,
    config: ModelConfig,
    environment: Option<EnvironmentHandle>,
    initialized: bool,
    loaded: Option<LoadedSession>,
    stats: SessionStats,
    last_error: Option<String>,
}

impl ModelSessionCache {
    pub fn new(
        runtime: Box<dyn ModelRuntime>,
        tokenizer: Box<dyn Tokenizer>,
        config: ModelConfig,
    ) -> Self {
        Self {
            runtime,
            tokenizer,
            config,
            environment: None,
            initialized: false,
            loaded: None,
            stats: SessionStats::default(),
            last_error: None,
        }
    }

    /// Cache using the placeholder tokenizer and default limits.
    pub fn with_runtime(runtime: Box<dyn ModelRuntime>) -> Self {
        Self::new(runtime, Box::new(SimpleTokenizer::new()), ModelConfig::default())
    }

    /// Embed `text` with the model at `model_path`, writing `dimension`
    /// L2-normalized floats into `output`.
    ///
    /// Loads the model on first use or when the resolved path changes;
    /// otherwise reuses the loaded session. Failures are also recorded for
    /// [`last_error`](Self::last_error).
    pub fn generate(
        &mut self,
        model_path: &Path,
        text: &str,
        output: &mut [f32],
        dimension: usize,
    ) -> Result<(), EmbedError> {
        let result = self.generate_inner(model_path, text, output, dimension);
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }
        result
    }

    fn generate_inner(
        &mut self,
        model_path: &Path,
        text: &str,
        output: &mut [f32],
        dimension: usize,
    ) -> Result<(), EmbedError> {
        let text = until_nul(text);
        if text.is_empty() {
            return Err(EmbedError::EmptyText);
        }
        if dimension == 0 || dimension > self.config.max_output_dim {
            return Err(EmbedError::InvalidDimension(dimension));
        }
        if output.len() < dimension {
            return Err(EmbedError::OutputTooSmall {
                required: dimension,
                actual: output.len(),
            });
        }
        self.initialized = true;

        let resolved = resolve_model_path(model_path)?;
        self.load_or_reuse(resolved)?;

        // until_nul cuts at a byte boundary before a NUL, so this stays UTF-8.
        let text = String::from_utf8_lossy(text);
        self.infer(&text, &mut output[..dimension])
    }

    fn load_or_reuse(&mut self, resolved: PathBuf) -> Result<(), EmbedError> {
        if let Some(loaded) = &self.loaded {
            if loaded.path == resolved {
                self.stats.reuses += 1;
                tracing::debug!("Reusing model session for {}", resolved.display());
                return Ok(());
            }
        }

        self.teardown();

        match self.create_session(resolved) {
            Ok(loaded) => {
                self.stats.loads += 1;
                tracing::info!(
                    "Loaded model session for {} (output '{}')",
                    loaded.path.display(),
                    loaded.output_name.name
                );
                self.loaded = Some(loaded);
                Ok(())
            }
            Err(e) => {
                self.stats.failed_loads += 1;
                tracing::warn!("Failed to load model session: {}", e);
                Err(e)
            }
        }
    }

    fn create_session(&mut self, resolved: PathBuf) -> Result<LoadedSession, EmbedError> {
        let env = match self.environment {
            Some(env) => env,
            None => {
                let env = self.runtime.create_environment()?;
                self.environment = Some(env);
                env
            }
        };
        load_session(self.runtime.as_mut(), env, resolved)
    }

    fn infer(&mut self, text: &str, output: &mut [f32]) -> Result<(), EmbedError> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| EmbedError::Runtime("no model session loaded".to_string()))?;
        let session = loaded.session;
        let memory_info = loaded.memory_info;
        let output_name = loaded.output_name.name.clone();

        let input_ids = self
            .tokenizer
            .tokenize(text, self.config.max_sequence_length)?;
        let sequence_length = input_ids.len();
        let token_type_ids = vec![0i64; sequence_length];
        let attention_mask = vec![1i64; sequence_length];
        let shape = [1, sequence_length as i64];

        let mut scope = TensorScope::new(self.runtime.as_mut());
        let inputs = [
            scope.create(memory_info, &input_ids, &shape)?,
            scope.create(memory_info, &token_type_ids, &shape)?,
            scope.create(memory_info, &attention_mask, &shape)?,
        ];
        let input_names = [
            self.config.input_ids_name.as_str(),
            self.config.token_type_ids_name.as_str(),
            self.config.attention_mask_name.as_str(),
        ];
        let outputs = scope.run(session, &input_names, &inputs, &[output_name.as_str()])?;
        let first = outputs
            .first()
            .copied()
            .ok_or_else(|| EmbedError::Runtime("inference returned no outputs".to_string()))?;

        let data = scope.runtime.tensor_data(first)?;
        if data.len() < output.len() {
            return Err(EmbedError::Runtime(format!(
                "output tensor holds {} values, {} requested",
                data.len(),
                output.len()
            )));
        }
        output.copy_from_slice(&data[..output.len()]);
        drop(scope);

        if !l2_normalize_precise(output, self.config.norm_epsilon) {
            tracing::debug!("Model output norm below epsilon, left unnormalized");
        }
        Ok(())
    }

    /// Release the loaded session, if any. The environment is kept.
    fn teardown(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            self.runtime.release_output_name(loaded.output_name);
            self.runtime.release_session(loaded.session);
            self.runtime.release_session_options(loaded.options);
            self.runtime.release_memory_info(loaded.memory_info);
            self.stats.unloads += 1;
            tracing::info!("Released model session for {}", loaded.path.display());
        }
    }

    /// Release the loaded session and return to Empty.
    ///
    /// Unloading an empty cache succeeds. Fails only when no generate call
    /// has passed argument validation yet.
    pub fn unload(&mut self) -> Result<(), EmbedError> {
        if !self.initialized {
            let err = EmbedError::RuntimeNotInitialized;
            self.last_error = Some(err.to_string());
            return Err(err);
        }
        self.teardown();
        Ok(())
    }

    pub fn state(&self) -> CacheState {
        match &self.loaded {
            Some(loaded) => CacheState::Loaded(loaded.path.clone()),
            None => CacheState::Empty,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded.as_ref().map(|loaded| loaded.path.as_path())
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        self.loaded.as_ref().map(|loaded| SessionInfo {
            model_path: loaded.path.clone(),
            output_name: loaded.output_name.name.clone(),
            loaded_at: loaded.loaded_at,
        })
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Message of the most recent failure. Not cleared by later successes.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl Drop for ModelSessionCache {
    fn drop(&mut self) {
        self.teardown();
        if let Some(env) = self.environment.take() {
            self.runtime.release_environment(env);
        }
    }
}

impl fmt::Debug for ModelSessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSessionCache")
            .field("state", &self.state())
            .field("stats", &self.stats)
            .field("last_error", &self.last_error)
            .finish()
    }
}
