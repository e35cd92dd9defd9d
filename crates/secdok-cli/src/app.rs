//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::batch::{run_batch, BatchReport};
use crate::config::Settings;

/// Output format for the batch summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-file notices as the batch runs
    #[default]
    Text,
    /// A single JSON report at the end
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "secdok")]
#[command(author, version, about = "Extract one section from every DOCX in a tree", long_about = None)]
pub struct Cli {
    /// Input directory, walked recursively
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory, mirrors the input tree
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Header text of the section to keep
    #[arg(long)]
    pub header: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep the source formatting of the extracted paragraphs
    #[arg(long)]
    pub no_restyle: bool,

    /// Output format (text or json)
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    /// Settings from the config file, overridden by the command line
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(input) = &self.input {
            settings.input_root = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output_root = output.clone();
        }
        if let Some(header) = &self.header {
            settings.target_header = header.clone();
        }
        if self.no_restyle {
            settings.restyle = false;
        }
        Ok(settings)
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    extract_command(&settings, cli.format)?;
    Ok(())
}

/// Run the batch and print its report in `format`
pub fn extract_command(settings: &Settings, format: OutputFormat) -> Result<BatchReport> {
    let report = match format {
        OutputFormat::Text => run_batch(settings, &mut io::stdout().lock())?,
        OutputFormat::Json => {
            let report = run_batch(settings, &mut io::sink())?;
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
            report
        }
    };
    Ok(report)
}
