//! Batch processing of a document tree
//!
//! Walks the input root, mirrors its directories under the output root and
//! writes the extracted section of every DOCX file to the same relative
//! path. Failures are reported per file; the walk always runs to the end.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use serde::Serialize;
use tracing::{debug, warn};

use secdok_ooxml::{SectionExtractor, WordDocument};

use crate::config::Settings;

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The section was written to `output`
    Saved { output: PathBuf },
    /// The target header does not occur in the document
    HeaderNotFound,
    /// The file could not be read as a DOCX package
    OpenFailed { error: String },
    /// The trimmed document could not be written
    SaveFailed { error: String },
}

/// Outcome for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// DOCX files seen
    pub processed: usize,
    pub saved: usize,
    pub not_found: usize,
    pub open_failures: usize,
    pub save_failures: usize,
    /// Per-file outcomes in walk order
    pub files: Vec<FileReport>,
}

impl BatchReport {
    fn record(&mut self, input: PathBuf, outcome: FileOutcome) {
        self.processed += 1;
        match outcome {
            FileOutcome::Saved { .. } => self.saved += 1,
            FileOutcome::HeaderNotFound => self.not_found += 1,
            FileOutcome::OpenFailed { .. } => self.open_failures += 1,
            FileOutcome::SaveFailed { .. } => self.save_failures += 1,
        }
        self.files.push(FileReport { input, outcome });
    }

    /// Number of files that did not produce an output
    pub fn failures(&self) -> usize {
        self.not_found + self.open_failures + self.save_failures
    }
}

/// Whether `path` names a DOCX file (extension compared case-insensitively)
pub fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// Process every DOCX file under `settings.input_root`.
///
/// Per-file notices are written to `notices`. Only problems with the tree
/// itself (missing input root, uncreatable output directory) are errors.
pub fn run_batch<W: Write>(settings: &Settings, notices: &mut W) -> Result<BatchReport> {
    let input_root = settings.input_root.as_path();
    let output_root = settings.output_root.as_path();
    if !input_root.is_dir() {
        anyhow::bail!("Input directory not found: {}", input_root.display());
    }
    fs::create_dir_all(output_root)
        .with_context(|| format!("Failed to create directory: {}", output_root.display()))?;

    // An output tree nested in the input tree is never walked
    let input_canonical = fs::canonicalize(input_root)
        .with_context(|| format!("Failed to resolve directory: {}", input_root.display()))?;
    let output_canonical = fs::canonicalize(output_root)
        .with_context(|| format!("Failed to resolve directory: {}", output_root.display()))?;
    let nested_output = (output_canonical != input_canonical
        && output_canonical.starts_with(&input_canonical))
    .then_some(output_canonical);

    let extractor = settings.extractor();
    let mut report = BatchReport::default();

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&input_root.display().to_string())
    );
    for entry in glob(&pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if let Some(nested) = &nested_output {
            if fs::canonicalize(&path).is_ok_and(|p| p.starts_with(nested)) {
                debug!(path = %path.display(), "skipping output tree");
                continue;
            }
        }
        let Ok(relative) = path.strip_prefix(input_root) else {
            continue;
        };
        let out_path = output_root.join(relative);

        if path.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create directory: {}", out_path.display()))?;
            continue;
        }
        if !is_docx(&path) {
            debug!(path = %path.display(), "skipping non-docx file");
            continue;
        }

        writeln!(notices, "Processing: {}", path.display())?;
        let outcome = process_file(&path, &out_path, &extractor);
        write_notice(notices, &path, &settings.target_header, &outcome)?;
        report.record(path, outcome);
    }

    writeln!(notices)?;
    writeln!(notices, "✓ All documents processed!")?;
    Ok(report)
}

/// Extract the section of one document and write it to `output`
pub fn process_file(input: &Path, output: &Path, extractor: &SectionExtractor) -> FileOutcome {
    let mut doc = match WordDocument::open(input) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(path = %input.display(), "open failed: {}", e);
            return FileOutcome::OpenFailed {
                error: e.to_string(),
            };
        }
    };

    match extractor.extract(doc.document_mut()) {
        Ok(Some(range)) => {
            debug!(path = %input.display(), start = range.start, end = range.end, "trimmed");
        }
        Ok(None) => return FileOutcome::HeaderNotFound,
        Err(e) => {
            warn!(path = %input.display(), "extraction failed: {}", e);
            return FileOutcome::SaveFailed {
                error: e.to_string(),
            };
        }
    }

    match save(&mut doc, output) {
        Ok(()) => FileOutcome::Saved {
            output: output.to_path_buf(),
        },
        Err(e) => {
            warn!(path = %output.display(), "save failed: {:#}", e);
            FileOutcome::SaveFailed {
                error: format!("{:#}", e),
            }
        }
    }
}

fn save(doc: &mut WordDocument, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    doc.save(output)?;
    Ok(())
}

fn write_notice<W: Write>(
    out: &mut W,
    input: &Path,
    header: &str,
    outcome: &FileOutcome,
) -> std::io::Result<()> {
    let file = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    match outcome {
        FileOutcome::Saved { output } => {
            writeln!(out, "   ✓ Saved section to: {}", output.display())
        }
        FileOutcome::HeaderNotFound => {
            writeln!(out, "   ✗ Header '{}' not found in: {}", header, file)
        }
        FileOutcome::OpenFailed { error } => {
            writeln!(out, "✗ Could not open {}: {}", file, error)
        }
        FileOutcome::SaveFailed { error } => {
            writeln!(out, "   ✗ Could not save {}: {}", file, error)
        }
    }
}
