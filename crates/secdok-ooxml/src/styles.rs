//! Style definitions parsing (word/styles.xml)
//!
//! Paragraphs reference styles by ID (`Heading1`), while heading detection
//! works on the user-visible style name (`Heading 1`). The [`StyleSheet`]
//! bridges the two.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::attr;

/// Collection of styles from a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Name as stored in styles.xml
    pub name: String,
    /// Style type
    pub style_type: StyleType,
    /// Base style ID (for inheritance)
    pub based_on: Option<String>,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleType {
    /// Paragraph style
    #[default]
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

/// Built-in styles whose stored names are lower case, with the names Word
/// shows for them.
const BUILTIN_UI_NAMES: &[(&str, &str)] = &[
    ("caption", "Caption"),
    ("footer", "Footer"),
    ("header", "Header"),
    ("heading 1", "Heading 1"),
    ("heading 2", "Heading 2"),
    ("heading 3", "Heading 3"),
    ("heading 4", "Heading 4"),
    ("heading 5", "Heading 5"),
    ("heading 6", "Heading 6"),
    ("heading 7", "Heading 7"),
    ("heading 8", "Heading 8"),
    ("heading 9", "Heading 9"),
    ("normal", "Normal"),
    ("title", "Title"),
    ("subtitle", "Subtitle"),
    ("toc 1", "TOC 1"),
    ("toc 2", "TOC 2"),
    ("toc 3", "TOC 3"),
];

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"style" => {
                        let style_type = match attr(e, b"type").as_deref() {
                            Some("character") => StyleType::Character,
                            Some("table") => StyleType::Table,
                            Some("numbering") => StyleType::Numbering,
                            _ => StyleType::Paragraph,
                        };
                        current = Some(StyleBuilder {
                            id: attr(e, b"styleId"),
                            style_type,
                            is_default: matches!(
                                attr(e, b"default").as_deref(),
                                Some("1") | Some("true")
                            ),
                            ..Default::default()
                        });
                    }
                    b"name" => {
                        if let Some(builder) = current.as_mut() {
                            builder.name = attr(e, b"val");
                        }
                    }
                    b"basedOn" => {
                        if let Some(builder) = current.as_mut() {
                            builder.based_on = attr(e, b"val");
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => {
                    if let Some(builder) = current.take() {
                        let is_default = builder.is_default;
                        if let Some(style) = builder.build() {
                            if is_default && style.style_type == StyleType::Paragraph {
                                stylesheet.default_paragraph = Some(style.id.clone());
                            }
                            stylesheet.styles.insert(style.id.clone(), style);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(stylesheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Number of styles defined
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the sheet defines no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Resolve the name a paragraph style is shown under.
    ///
    /// `None` means the paragraph has no `w:pStyle` and takes the default
    /// paragraph style, as does an ID the sheet does not define. With no
    /// styles at all the ID itself is the name.
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> Option<String> {
        if self.is_empty() {
            return style_id.map(str::to_string);
        }
        let style = style_id
            .and_then(|id| self.get(id))
            .filter(|style| style.style_type == StyleType::Paragraph)
            .or_else(|| self.default_paragraph.as_deref().and_then(|id| self.get(id)))?;
        Some(ui_name(&style.name))
    }
}

/// Map a stored built-in style name to its UI name (`heading 1` → `Heading 1`)
pub fn ui_name(stored: &str) -> String {
    BUILTIN_UI_NAMES
        .iter()
        .find(|(internal, _)| *internal == stored)
        .map(|(_, ui)| ui.to_string())
        .unwrap_or_else(|| stored.to_string())
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: StyleType,
    based_on: Option<String>,
    is_default: bool,
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            style_type: self.style_type,
            based_on: self.based_on,
        })
    }
}
