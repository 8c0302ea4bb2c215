// crates/fastembed-cli/src/config.rs
//
// Configuration for the FastEmbed CLI.
// Loaded from a TOML file or populated with defaults.

use serde::Deserialize;
use std::fs;

/// CLI settings. Command-line flags override these values.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log level when RUST_LOG is unset: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Embedding dimension used when `--dimension` is not given.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Model file used by `fastembed model` when `--model` is not given.
    #[serde(default)]
    pub model_path: Option<String>,

    /// Decimal places printed for each float.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_dimension() -> usize {
    768
}

fn default_precision() -> usize {
    6
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dimension: default_dimension(),
            model_path: None,
            precision: default_precision(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path (`~` expanded).
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(expand_tilde(path))?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
