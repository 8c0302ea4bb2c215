// crates/fastembed-core/src/runtime.rs
//
// Contract between the session cache and the neural network runtime that
// executes model files. The runtime itself is external; the cache only
// creates, uses and releases the handles described here.

use std::path::Path;

use crate::error::EmbedError;

/// Process-wide runtime environment. Created once per cache and released
/// only when the cache is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentHandle(pub u64);

/// CPU memory descriptor used to build input tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryInfoHandle(pub u64);

/// Options the session was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionOptionsHandle(pub u64);

/// A model file loaded into the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub u64);

/// An input or output tensor owned by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorHandle(pub u64);

/// Output tensor name, allocated by the runtime and released with
/// [`ModelRuntime::release_output_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    pub handle: u64,
    pub name: String,
}

/// Model execution backend.
///
/// Every `create_*` call that succeeds hands ownership of the returned handle
/// to the caller, which must give it back through the matching `release_*`.
pub trait ModelRuntime: Send {
    /// Create the runtime environment.
    fn create_environment(&mut self) -> Result<EnvironmentHandle, EmbedError>;

    /// Describe CPU memory for input tensors.
    fn create_memory_info(&mut self) -> Result<MemoryInfoHandle, EmbedError>;

    /// Create default session options.
    fn create_session_options(&mut self) -> Result<SessionOptionsHandle, EmbedError>;

    /// Load the model at `path` (already canonicalized).
    fn create_session(
        &mut self,
        env: EnvironmentHandle,
        path: &Path,
        options: SessionOptionsHandle,
    ) -> Result<SessionHandle, EmbedError>;

    /// Name of the session's first output.
    fn output_name(&mut self, session: SessionHandle) -> Result<OutputName, EmbedError>;

    /// Build an int64 tensor of the given shape over `data`.
    fn create_tensor(
        &mut self,
        memory: MemoryInfoHandle,
        data: &[i64],
        shape: &[i64],
    ) -> Result<TensorHandle, EmbedError>;

    /// Run inference, returning one tensor per requested output name.
    fn run(
        &mut self,
        session: SessionHandle,
        input_names: &[&str],
        inputs: &[TensorHandle],
        output_names: &[&str],
    ) -> Result<Vec<TensorHandle>, EmbedError>;

    /// Float contents of an output tensor.
    fn tensor_data(&self, tensor: TensorHandle) -> Result<&[f32], EmbedError>;

    fn release_output_name(&mut self, name: OutputName);
    fn release_session(&mut self, session: SessionHandle);
    fn release_session_options(&mut self, options: SessionOptionsHandle);
    fn release_memory_info(&mut self, memory: MemoryInfoHandle);
    fn release_tensor(&mut self, tensor: TensorHandle);
    fn release_environment(&mut self, env: EnvironmentHandle);
}
