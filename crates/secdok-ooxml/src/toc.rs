//! Table of contents field
//!
//! The field is inserted unevaluated; Word fills it in when the reader
//! updates fields.

use serde::{Deserialize, Serialize};

use crate::document::{BodyChild, Document, Paragraph};
use crate::error::Result;
use crate::xml::escape_xml;

/// A `TOC` field instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocField {
    /// Outline levels to collect (`\o "1-3"`)
    pub levels: String,
    /// Make entries hyperlinks (`\h`)
    pub hyperlinks: bool,
    /// Hide tab leaders and page numbers in web layout (`\z`)
    pub hide_in_web_layout: bool,
    /// Use paragraph outline levels (`\u`)
    pub use_outline_levels: bool,
}

impl Default for TocField {
    fn default() -> Self {
        Self {
            levels: "1-3".to_string(),
            hyperlinks: true,
            hide_in_web_layout: true,
            use_outline_levels: true,
        }
    }
}

impl TocField {
    /// The field instruction text, e.g. `TOC \o "1-3" \h \z \u`
    pub fn instruction(&self) -> String {
        let mut instr = format!("TOC \\o \"{}\"", self.levels);
        if self.hyperlinks {
            instr.push_str(" \\h");
        }
        if self.hide_in_web_layout {
            instr.push_str(" \\z");
        }
        if self.use_outline_levels {
            instr.push_str(" \\u");
        }
        instr
    }

    /// A paragraph holding the field as `<w:fldSimple>`
    pub fn paragraph(&self) -> Result<Paragraph> {
        let xml = format!(
            "<w:p><w:fldSimple w:instr=\"{}\"/></w:p>",
            escape_xml(&self.instruction())
        );
        Paragraph::parse(&xml)
    }

    /// Insert the field paragraph as the first body element
    pub fn insert_into(&self, document: &mut Document) -> Result<()> {
        document.prepend(BodyChild::Paragraph(self.paragraph()?));
        Ok(())
    }
}
