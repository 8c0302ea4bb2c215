// crates/fastembed-cli/src/output.rs
//
// Output formatting utilities for the FastEmbed CLI.
// Floats are printed with a fixed number of decimal places so output is
// stable across runs and platforms.

use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for tabular commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Format a single float with `precision` decimal places.
pub fn format_scalar(value: f32, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Format floats as a compact JSON array with `precision` decimal places.
pub fn format_vector(values: &[f32], precision: usize) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format_scalar(*v, precision))
        .collect();
    format!("[{}]", items.join(","))
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
