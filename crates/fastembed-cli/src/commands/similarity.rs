// crates/fastembed-cli/src/commands/similarity.rs
//
// `fastembed similarity <text>...`: embed every text with the hash path and
// print the cosine similarity of each pair.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use fastembed_core::FastEmbed;

use crate::config::CliConfig;
use crate::output::{format_json, format_scalar, format_table, OutputFormat};

/// Pairwise similarity command.
#[derive(Debug, Args)]
pub struct SimilarityCmd {
    /// Texts to compare (at least two).
    #[arg(required = true, num_args = 2..)]
    pub texts: Vec<String>,

    /// Embedding dimension.
    #[arg(long, short)]
    pub dimension: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// One compared pair.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SimilarityRow {
    #[tabled(rename = "Text A")]
    pub left: String,
    #[tabled(rename = "Text B")]
    pub right: String,
    #[tabled(rename = "Cosine", display_with = "display_cosine")]
    pub cosine: f32,
}

fn display_cosine(cosine: &f32) -> String {
    format_scalar(*cosine, 4)
}

/// Cosine similarity of every unordered pair, in input order.
pub fn pairwise(
    engine: &FastEmbed,
    texts: &[String],
    dimension: usize,
) -> Result<Vec<SimilarityRow>, Box<dyn std::error::Error>> {
    let embeddings = engine.generate_batch(texts, dimension)?;
    let mut rows = Vec::with_capacity(texts.len() * texts.len().saturating_sub(1) / 2);
    for i in 0..texts.len() {
        for j in (i + 1)..texts.len() {
            rows.push(SimilarityRow {
                left: texts[i].clone(),
                right: texts[j].clone(),
                cosine: FastEmbed::cosine_similarity(&embeddings[i], &embeddings[j])?,
            });
        }
    }
    Ok(rows)
}

/// Run the similarity command.
pub fn run(cmd: &SimilarityCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dimension = cmd.dimension.unwrap_or(config.dimension);
    let engine = FastEmbed::new();
    let rows = pairwise(&engine, &cmd.texts, dimension)?;

    match cmd.format {
        OutputFormat::Table => println!("{}", format_table(&rows)),
        OutputFormat::Json => println!("{}", format_json(&rows)),
    }
    Ok(())
}
