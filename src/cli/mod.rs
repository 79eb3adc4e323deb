//! Command-line interface.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::domain::models::{CompositeResult, Role, SectionMap};
use crate::domain::ports::ScoreStore;
use crate::infrastructure::{ConfigLoader, FilePromptSource, JsonScoreStore, LlamaHttpEngine};
use crate::services::Orchestrator;

#[derive(Parser)]
#[command(name = "resilens", about = "Digital resilience scoring of 10-K filings", version)]
pub struct Cli {
    /// Path to a config file (defaults to resilens.yaml + RESILENS_* env).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one extracted filing and persist the composite result.
    Score {
        /// JSON file mapping section identifiers to section text.
        sections: PathBuf,

        /// Subject identifier (e.g. ticker).
        #[arg(long)]
        subject: String,

        /// Reporting period (e.g. fiscal year).
        #[arg(long)]
        period: i32,

        /// Print the result without persisting it.
        #[arg(long)]
        no_save: bool,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    crate::infrastructure::logging::init(&config.logging)?;

    match cli.command {
        Command::Score { sections, subject, period, no_save } => {
            let raw = std::fs::read_to_string(&sections)
                .context(format!("failed to read {}", sections.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&raw).context("section map is not valid JSON")?;
            let section_map = SectionMap::from_json_value(&value);
            anyhow::ensure!(!section_map.is_empty(), "section map contains no sections");

            let engine = Arc::new(LlamaHttpEngine::new(config.engine.clone()));
            let prompts = Arc::new(FilePromptSource::new(config.prompts_dir.clone()));
            let orchestrator = Orchestrator::new(engine, prompts, config.clone());

            let result = orchestrator.score(&section_map, &subject, period).await;
            print_summary(&result);

            if !no_save {
                let store = JsonScoreStore::new(config.scores_dir);
                let path = store.save(&result)?;
                println!("\nSaved to {}", path.display());
            }
            Ok(())
        }
    }
}

fn print_summary(result: &CompositeResult) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Dimension", "Score", "Confidence", "Evidence", "Audit"]);

    for role in Role::ALL {
        match result.slot(role) {
            Some(dim) => {
                let audit = dim
                    .verdict
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |v| format!("{:?}", v.status));
                table.add_row(vec![
                    Cell::new(role.as_str()),
                    Cell::new(format!("{:.1}", dim.score)),
                    Cell::new(dim.confidence),
                    Cell::new(dim.evidence.len()),
                    Cell::new(audit),
                ]);
            }
            None => {
                table.add_row(vec![
                    Cell::new(role.as_str()),
                    Cell::new("N/A"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    println!("{table}");
    println!(
        "\nOverall: {:.1}/100 (confidence {:.2}, {:.1}s)",
        result.overall_score, result.overall_confidence, result.processing_time_secs
    );
}
