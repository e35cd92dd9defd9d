//! secdok CLI - Command-line interface library
//!
//! Extracts one named section from every DOCX file in a directory tree and
//! writes the results to a mirrored tree.
//!
//! # Library Usage
//!
//! ```ignore
//! use secdok_cli::{run_batch, Settings};
//!
//! let settings = Settings::default();
//! let report = run_batch(&settings, &mut std::io::stdout())?;
//! println!("{} saved", report.saved);
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Defaults: ./input -> ./output, header "Cost Sharing Features"
//! secdok
//!
//! # Another tree and header, machine-readable summary
//! secdok --input plans --output trimmed --header "Exclusions" --format json
//! ```

pub mod app;
pub mod batch;
pub mod config;

// Re-export main entry point and types
pub use app::{extract_command, run_cli, Cli, OutputFormat};
pub use batch::{is_docx, process_file, run_batch, BatchReport, FileOutcome, FileReport};
pub use config::{Settings, TocSettings};
