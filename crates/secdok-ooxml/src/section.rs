//! Section location by heading level
//!
//! A section starts at the paragraph whose text matches the target header
//! and runs until the next heading of the same or a higher level.

use crate::document::{Block, Paragraph};

/// Style name prefix that marks a heading paragraph
pub const HEADING_PREFIX: &str = "Heading";

/// Role of a paragraph, derived once from its style name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    /// A heading, with its level (1 = highest)
    Heading(u32),
    /// Anything else
    Body,
}

impl ParagraphRole {
    /// Classify a style name.
    ///
    /// Names starting with `Heading` (case-sensitive) are headings. The level
    /// is the number after the prefix; a missing or non-numeric suffix is
    /// level 1.
    pub fn classify(style_name: Option<&str>) -> Self {
        match style_name.and_then(|name| name.strip_prefix(HEADING_PREFIX)) {
            Some(suffix) => ParagraphRole::Heading(suffix.trim().parse().unwrap_or(1)),
            None => ParagraphRole::Body,
        }
    }

    /// Classify a paragraph by its resolved style name
    pub fn of(paragraph: &Paragraph) -> Self {
        Self::classify(paragraph.style_name.as_deref())
    }

    /// Heading level, if this is a heading
    pub fn heading_level(self) -> Option<u32> {
        match self {
            ParagraphRole::Heading(level) => Some(level),
            ParagraphRole::Body => None,
        }
    }
}

/// Inclusive range of block indices forming a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    /// Index of the header block
    pub start: usize,
    /// Index of the last block in the section
    pub end: usize,
}

impl SectionRange {
    /// Whether `index` falls inside the range
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Number of blocks in the range
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a range holds at least its header
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Normalize header text for comparison: trim, lowercase, drop colons.
pub fn normalize_header(text: &str) -> String {
    text.trim().to_lowercase().replace(':', "")
}

/// Find the section headed by `target_header`.
///
/// Only paragraphs are considered as headers or terminators; tables are
/// content. Returns `None` when no paragraph matches.
pub fn locate<'a, I>(blocks: I, target_header: &str) -> Option<SectionRange>
where
    I: IntoIterator<Item = Block<'a>>,
{
    let target = normalize_header(target_header);
    let blocks: Vec<Block<'a>> = blocks.into_iter().collect();

    let (start, header) = blocks.iter().enumerate().find_map(|(i, block)| {
        block
            .as_paragraph()
            .filter(|p| normalize_header(&p.text()) == target)
            .map(|p| (i, p))
    })?;
    // A matching paragraph that is not a heading behaves as level 1
    let level = ParagraphRole::of(header).heading_level().unwrap_or(1);

    let end = blocks
        .iter()
        .enumerate()
        .skip(start + 1)
        .find_map(|(i, block)| {
            let para = block.as_paragraph()?;
            match ParagraphRole::of(para) {
                ParagraphRole::Heading(l) if l <= level => Some(i - 1),
                _ => None,
            }
        })
        .unwrap_or(blocks.len() - 1);

    Some(SectionRange { start, end })
}
