//! Section extraction pipeline
//!
//! Locates the target section, trims the document to it, restyles the
//! remaining paragraphs and prepends a table of contents field.

use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::restyle::{restyle_document, StyleProfile};
use crate::section::SectionRange;
use crate::toc::TocField;
use crate::trim::trim_to_section;

/// Header extracted when none is configured
pub const DEFAULT_TARGET_HEADER: &str = "Cost Sharing Features";

/// Extracts one named section from a document
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    /// Header text of the section to keep
    pub target_header: String,
    /// Profile applied to the kept paragraphs; `None` keeps their formatting
    pub style: Option<StyleProfile>,
    /// Field prepended to the result; `None` adds nothing
    pub toc: Option<TocField>,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self {
            target_header: DEFAULT_TARGET_HEADER.to_string(),
            style: Some(StyleProfile::default()),
            toc: Some(TocField::default()),
        }
    }
}

impl SectionExtractor {
    /// Create an extractor for `target_header` with the default profile and TOC
    pub fn new(target_header: impl Into<String>) -> Self {
        Self {
            target_header: target_header.into(),
            ..Self::default()
        }
    }

    /// Set the style profile (`None` disables restyling)
    pub fn with_style(mut self, style: Option<StyleProfile>) -> Self {
        self.style = style;
        self
    }

    /// Set the TOC field (`None` disables it)
    pub fn with_toc(mut self, toc: Option<TocField>) -> Self {
        self.toc = toc;
        self
    }

    /// Reduce `document` to the target section.
    ///
    /// Returns `Ok(None)` with the document untouched when the header is
    /// not found.
    pub fn extract(&self, document: &mut Document) -> Result<Option<SectionRange>> {
        let Some(range) = trim_to_section(document, &self.target_header) else {
            return Ok(None);
        };

        if let Some(profile) = &self.style {
            let restyled = restyle_document(document, profile);
            debug!(paragraphs = restyled, "restyled section");
        }
        if let Some(toc) = &self.toc {
            toc.insert_into(document)?;
        }

        Ok(Some(range))
    }
}
