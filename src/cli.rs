use crate::discovery::DiscoverySelector;
use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "test-discovery")]
#[command(about = "Test discovery engine - resolve selectors into a descriptor tree", long_about = None)]
pub struct Args {
    /// Path to the element model file (JSON format)
    #[arg(long, value_name = "FILE")]
    pub model: PathBuf,

    /// Selector to resolve (class:<fqn>, method:<fqn>#<name>, uid:<id>).
    /// Can be specified multiple times.
    #[arg(long, value_name = "SELECTOR")]
    pub select: Vec<String>,

    /// Identifier of the engine root
    #[arg(long, default_value = "test-engine")]
    pub engine_id: String,

    /// Display name of the engine root
    #[arg(long, default_value = "Test Engine")]
    pub engine_name: String,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: OutputFormat,

    /// Skip removal of branches that contain no tests
    #[arg(long)]
    pub no_prune: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        validate_model_path(&self.model)?;
        if self.select.is_empty() {
            anyhow::bail!("At least one --select is required");
        }
        Ok(())
    }

    pub fn parse_selectors(&self) -> Result<Vec<DiscoverySelector>> {
        self.select
            .iter()
            .map(|raw| {
                DiscoverySelector::parse(raw)
                    .with_context(|| format!("Invalid selector: {raw}"))
            })
            .collect()
    }
}

pub fn validate_model_path(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Model file does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Model path is not a file: {}", path.display());
    }
    std::fs::metadata(path)
        .with_context(|| format!("Cannot read model file: {}", path.display()))?;
    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}
