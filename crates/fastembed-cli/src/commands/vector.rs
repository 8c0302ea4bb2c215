// crates/fastembed-cli/src/commands/vector.rs
//
// `fastembed vector [json]`: run one vector operation described by a JSON
// request and print `{"result": ...}`.
//
// Request: {"op": "cosine|dot|norm|normalize|add", "vec1": [...],
//           "vec2": [...], "dim": n}
// `vec2` is required by the binary operations. `dim` defaults to the length
// of `vec1` and must be in 1..=2048; only the first `dim` values of each
// vector are used.

use std::str::FromStr;

use clap::Args;
use serde::Deserialize;

use fastembed_core::{FastEmbed, MAX_DIMENSION};

use crate::commands::read_input;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::{format_scalar, format_vector};

/// Vector operation command.
#[derive(Debug, Args)]
pub struct VectorCmd {
    /// JSON request. Read from stdin when omitted.
    #[arg()]
    pub request: Option<String>,

    /// Decimal places per value.
    #[arg(long)]
    pub precision: Option<usize>,
}

/// Parsed JSON request.
#[derive(Debug, Deserialize)]
pub struct VectorRequest {
    pub op: String,
    pub vec1: Vec<f32>,
    #[serde(default)]
    pub vec2: Option<Vec<f32>>,
    #[serde(default)]
    pub dim: Option<usize>,
}

/// Supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorOp {
    Cosine,
    Dot,
    Norm,
    Normalize,
    Add,
}

impl VectorOp {
    fn is_binary(self) -> bool {
        matches!(self, VectorOp::Cosine | VectorOp::Dot | VectorOp::Add)
    }
}

impl FromStr for VectorOp {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(VectorOp::Cosine),
            "dot" => Ok(VectorOp::Dot),
            "norm" => Ok(VectorOp::Norm),
            "normalize" => Ok(VectorOp::Normalize),
            "add" => Ok(VectorOp::Add),
            other => Err(CliError::UnknownOperation(other.to_string())),
        }
    }
}

/// Result of an operation: a number or a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorOutput {
    Scalar(f32),
    Vector(Vec<f32>),
}

impl VectorOutput {
    /// Render as `{"result": ...}` with fixed decimal places.
    pub fn to_json(&self, precision: usize) -> String {
        let value = match self {
            VectorOutput::Scalar(v) => format_scalar(*v, precision),
            VectorOutput::Vector(v) => format_vector(v, precision),
        };
        format!("{{\"result\":{}}}", value)
    }
}

fn prefix<'a>(name: &str, v: &'a [f32], dim: usize) -> Result<&'a [f32], CliError> {
    v.get(..dim).ok_or_else(|| {
        CliError::InvalidInput(format!("{} has {} values, dim is {}", name, v.len(), dim))
    })
}

/// Validate a request and run it.
pub fn execute(request: &VectorRequest) -> Result<VectorOutput, CliError> {
    let op = VectorOp::from_str(&request.op)?;

    let dim = match request.dim {
        Some(d) if d != 0 => d,
        _ => request.vec1.len(),
    };
    if dim == 0 || dim > MAX_DIMENSION {
        return Err(CliError::InvalidInput(format!(
            "dim must be between 1 and {}, got {}",
            MAX_DIMENSION, dim
        )));
    }

    let a = prefix("vec1", &request.vec1, dim)?;
    let b: &[f32] = if op.is_binary() {
        let vec2 = request
            .vec2
            .as_deref()
            .ok_or_else(|| CliError::InvalidInput(format!("'{}' requires vec2", request.op)))?;
        prefix("vec2", vec2, dim)?
    } else {
        &[]
    };

    let output = match op {
        VectorOp::Cosine => VectorOutput::Scalar(FastEmbed::cosine_similarity(a, b)?),
        VectorOp::Dot => VectorOutput::Scalar(FastEmbed::dot_product(a, b)?),
        VectorOp::Norm => VectorOutput::Scalar(FastEmbed::vector_norm(a)?),
        VectorOp::Normalize => {
            let mut v = a.to_vec();
            FastEmbed::normalize(&mut v)?;
            VectorOutput::Vector(v)
        }
        VectorOp::Add => VectorOutput::Vector(FastEmbed::add_vectors(a, b)?),
    };
    Ok(output)
}

/// Run the vector command.
pub fn run(cmd: &VectorCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(cmd.request.as_deref())?;
    let request: VectorRequest =
        serde_json::from_str(&input).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let output = execute(&request)?;
    println!("{}", output.to_json(cmd.precision.unwrap_or(config.precision)));
    Ok(())
}
