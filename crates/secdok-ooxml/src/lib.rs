//! # secdok-ooxml
//!
//! Section extraction for DOCX documents.
//!
//! This crate provides functionality to:
//! - Read and write DOCX packages
//! - Locate a section by its header text and heading level
//! - Trim a document down to that section
//! - Restyle the remaining paragraphs with a fixed profile
//! - Prepend a table of contents field
//!
//! ## Example: Extracting a Section
//!
//! ```no_run
//! use secdok_ooxml::{SectionExtractor, WordDocument};
//!
//! let mut doc = WordDocument::open("plan.docx")?;
//! let extractor = SectionExtractor::new("Cost Sharing Features");
//!
//! if extractor.extract(doc.document_mut())?.is_some() {
//!     doc.save("plan-section.docx")?;
//! }
//! # Ok::<(), secdok_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod extract;
pub mod package;
pub mod restyle;
pub mod section;
pub mod styles;
pub mod toc;
pub mod trim;
mod xml;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use archive::OoxmlArchive;
pub use document::{
    Alignment, Block, BodyChild, Document, LineSpacing, Paragraph, ParagraphFormat, Run, Table,
};
pub use error::{OoxmlError, Result};
pub use extract::{SectionExtractor, DEFAULT_TARGET_HEADER};
pub use package::WordDocument;
pub use restyle::{restyle, restyle_document, RoleStyle, StyleProfile};
pub use section::{locate, normalize_header, ParagraphRole, SectionRange};
pub use styles::{Style, StyleSheet, StyleType};
pub use toc::TocField;
pub use trim::{trim, trim_to_section};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
