//! Document body model (word/document.xml)
//!
//! The body is split into its direct children. Paragraphs are parsed into
//! runs and formatting so they can be located and restyled; every child
//! keeps its source XML, so anything the tool does not touch (tables,
//! section properties, bookmarks, drawings) is written back unchanged.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{OoxmlError, Result};
use crate::styles::StyleSheet;
use crate::xml::{attr, escape_xml, toggle};

/// A parsed Word document body
#[derive(Debug, Clone)]
pub struct Document {
    /// Source XML up to and including the `<w:body>` start tag
    head: String,
    /// Direct children of `<w:body>`, in document order
    pub(crate) children: Vec<BodyChild>,
    /// Source XML from the `</w:body>` end tag onwards
    tail: String,
}

/// A direct child of the document body
#[derive(Debug, Clone)]
pub enum BodyChild {
    /// `<w:p>`
    Paragraph(Paragraph),
    /// `<w:tbl>`
    Table(Table),
    /// `<w:sectPr>`, page size and margins for the final section
    SectionProperties(RawElement),
    /// Anything else (`<w:bookmarkStart>`, `<w:sdt>`, ...)
    Other(RawElement),
}

/// Borrowed view of a top-level block, as seen by section location
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    /// A paragraph
    Paragraph(&'a Paragraph),
    /// A table
    Table(&'a Table),
}

/// An element carried through verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    /// Local element name (`sectPr`, `bookmarkStart`, ...)
    pub name: String,
    /// Source XML of the element
    pub xml: String,
}

/// A table, kept as source XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    xml: String,
}

/// A paragraph with its runs and paragraph-level formatting
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Style ID (references styles.xml)
    pub style_id: Option<String>,
    /// Resolved style name (`Heading 1`), see [`StyleSheet::paragraph_style_name`]
    pub style_name: Option<String>,
    /// Paragraph properties
    pub format: ParagraphFormat,
    /// Text runs, in order
    pub runs: Vec<Run>,
    /// Source XML; `None` once the paragraph has been rebuilt
    pub(crate) source: Option<String>,
}

/// Paragraph-level formatting (`<w:pPr>`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphFormat {
    /// Horizontal alignment
    pub alignment: Option<Alignment>,
    /// Left indent in twips
    pub indent_left: Option<i32>,
    /// Right indent in twips
    pub indent_right: Option<i32>,
    /// Space before in twips
    pub space_before: Option<u32>,
    /// Space after in twips
    pub space_after: Option<u32>,
    /// Line spacing, copied as found
    pub line_spacing: Option<LineSpacing>,
}

/// Paragraph alignment (`<w:jc>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Line spacing as stored in `<w:spacing w:line=".." w:lineRule=".."/>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpacing {
    /// `w:line` value (240ths of a line, or twips for exact/atLeast rules)
    pub line: String,
    /// `w:lineRule` value (`auto`, `exact`, `atLeast`)
    pub rule: Option<String>,
}

/// A text run with its character formatting.
///
/// Flags are tri-state: `None` inherits from the paragraph or document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// The text content (tabs as `\t`, breaks as `\n`)
    pub text: String,
    /// Bold
    pub bold: Option<bool>,
    /// Italic
    pub italic: Option<bool>,
    /// Underline style (`single`, `double`, ...; `none` turns it off)
    pub underline: Option<String>,
    /// Font family
    pub font: Option<String>,
    /// Font size in half-points
    pub size: Option<u32>,
    /// Explicit RGB color as hex (`FF0000`)
    pub color: Option<String>,
}

impl Document {
    /// Parse a document from XML bytes, using style IDs as style names
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_styles(xml, &StyleSheet::default())
    }

    /// Parse a document from XML bytes, resolving style names through `styles`
    pub fn parse_with_styles(xml: &[u8], styles: &StyleSheet) -> Result<Self> {
        let text = std::str::from_utf8(xml).map_err(|e| {
            OoxmlError::InvalidStructure(format!("document.xml is not UTF-8: {e}"))
        })?;
        let layout = BodyLayout::scan(xml)?;

        let mut children = Vec::with_capacity(layout.spans.len());
        for span in &layout.spans {
            let fragment = &text[span.start..span.end];
            let child = match span.name.as_str() {
                "p" => {
                    let mut para = Paragraph::parse(fragment)?;
                    para.style_name = styles.paragraph_style_name(para.style_id.as_deref());
                    BodyChild::Paragraph(para)
                }
                "tbl" => BodyChild::Table(Table {
                    xml: fragment.to_string(),
                }),
                "sectPr" => BodyChild::SectionProperties(RawElement {
                    name: span.name.clone(),
                    xml: fragment.to_string(),
                }),
                _ => BodyChild::Other(RawElement {
                    name: span.name.clone(),
                    xml: fragment.to_string(),
                }),
            };
            children.push(child);
        }

        let (head, tail) = match layout.body {
            BodyBounds::Open { head_end, tail_start } => {
                (text[..head_end].to_string(), text[tail_start..].to_string())
            }
            BodyBounds::SelfClosing { start, end, ref qname } => (
                format!("{}<{}>", &text[..start], qname),
                format!("</{}>{}", qname, &text[end..]),
            ),
        };

        Ok(Document {
            head,
            children,
            tail,
        })
    }

    /// Iterate the top-level blocks (paragraphs and tables) in document order.
    ///
    /// Each call starts a fresh pass over the current body.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'_>> + '_ {
        self.children.iter().filter_map(BodyChild::as_block)
    }

    /// Number of top-level blocks
    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Direct children of the body, including non-block elements
    pub fn children(&self) -> &[BodyChild] {
        &self.children
    }

    /// Mutable access to every top-level paragraph
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> + '_ {
        self.children.iter_mut().filter_map(|child| match child {
            BodyChild::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Insert a child at the very start of the body
    pub fn prepend(&mut self, child: BodyChild) {
        self.children.insert(0, child);
    }

    /// Whether the last body child is a section properties record
    pub fn has_section_properties(&self) -> bool {
        matches!(self.children.last(), Some(BodyChild::SectionProperties(_)))
    }

    /// Serialize the document back to XML
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(self.head.len() + self.tail.len() + 1024);
        out.push_str(&self.head);
        for child in &self.children {
            child.write_xml(&mut out);
        }
        out.push_str(&self.tail);
        out
    }
}

impl BodyChild {
    /// View this child as a block, if it is one
    pub fn as_block(&self) -> Option<Block<'_>> {
        match self {
            BodyChild::Paragraph(p) => Some(Block::Paragraph(p)),
            BodyChild::Table(t) => Some(Block::Table(t)),
            BodyChild::SectionProperties(_) | BodyChild::Other(_) => None,
        }
    }

    /// Append this child's XML to `out`
    pub fn write_xml(&self, out: &mut String) {
        match self {
            BodyChild::Paragraph(p) => p.write_xml(out),
            BodyChild::Table(t) => out.push_str(&t.xml),
            BodyChild::SectionProperties(raw) | BodyChild::Other(raw) => out.push_str(&raw.xml),
        }
    }
}

impl<'a> Block<'a> {
    /// The paragraph, if this block is one
    pub fn as_paragraph(&self) -> Option<&'a Paragraph> {
        match *self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }
}

impl Table {
    /// Source XML of the table
    pub fn xml(&self) -> &str {
        &self.xml
    }
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single `<w:p>` element
    pub fn parse(fragment: &str) -> Result<Self> {
        let mut reader = Reader::from_str(fragment);
        // Don't trim text - preserve whitespace in runs
        reader.config_mut().trim_text(false);

        let mut para = Paragraph {
            source: Some(fragment.to_string()),
            ..Default::default()
        };
        let mut skip = 0usize;
        let mut in_ppr = false;
        let mut in_mark_rpr = false;
        let mut in_run_rpr = false;
        let mut in_text = false;
        let mut current_run: Option<Run> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    if skip > 0 {
                        skip += 1;
                        continue;
                    }
                    match e.local_name().as_ref() {
                        // Tracked changes hold the previous properties
                        b"drawing" | b"pict" | b"object" | b"AlternateContent"
                        | b"txbxContent" | b"pPrChange" | b"rPrChange" => skip = 1,
                        b"pPr" if current_run.is_none() => in_ppr = true,
                        b"rPr" if current_run.is_some() => in_run_rpr = true,
                        b"rPr" if in_ppr => in_mark_rpr = true,
                        b"r" if !in_ppr => current_run = Some(Run::default()),
                        b"t" if current_run.is_some() && !in_run_rpr => in_text = true,
                        _ => para.apply_property(e, in_ppr && !in_mark_rpr, in_run_rpr, &mut current_run),
                    }
                }
                Event::Empty(ref e) => {
                    if skip > 0 {
                        continue;
                    }
                    match e.local_name().as_ref() {
                        b"tab" if current_run.is_some() && !in_run_rpr => {
                            push_text(&mut current_run, "\t");
                        }
                        b"br" if current_run.is_some() && !in_run_rpr => {
                            // Page and column breaks carry no text
                            if matches!(attr(e, b"type").as_deref(), None | Some("textWrapping")) {
                                push_text(&mut current_run, "\n");
                            }
                        }
                        b"cr" if current_run.is_some() && !in_run_rpr => {
                            push_text(&mut current_run, "\n");
                        }
                        _ => para.apply_property(e, in_ppr && !in_mark_rpr, in_run_rpr, &mut current_run),
                    }
                }
                Event::End(ref e) => {
                    if skip > 0 {
                        skip -= 1;
                        continue;
                    }
                    match e.local_name().as_ref() {
                        b"pPr" => in_ppr = false,
                        b"rPr" if in_run_rpr => in_run_rpr = false,
                        b"rPr" => in_mark_rpr = false,
                        b"t" => in_text = false,
                        b"r" => {
                            if let Some(run) = current_run.take() {
                                para.runs.push(run);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(ref e) if in_text && skip == 0 => {
                    let text = e.unescape()?;
                    push_text(&mut current_run, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(para)
    }

    /// Plain text of the paragraph (concatenation of run texts)
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether the paragraph was rebuilt rather than parsed
    pub fn is_rebuilt(&self) -> bool {
        self.source.is_none()
    }

    /// Append this paragraph's XML to `out`.
    ///
    /// Parsed paragraphs are written back exactly as read.
    pub fn write_xml(&self, out: &mut String) {
        match &self.source {
            Some(xml) => out.push_str(xml),
            None => self.render(out),
        }
    }

    /// Serialize this paragraph to an XML string
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn render(&self, out: &mut String) {
        out.push_str("<w:p>");

        let mut ppr = String::new();
        if let Some(style) = &self.style_id {
            ppr.push_str(&format!("<w:pStyle w:val=\"{}\"/>", escape_xml(style)));
        }
        let f = &self.format;
        let mut spacing = String::new();
        if let Some(before) = f.space_before {
            spacing.push_str(&format!(" w:before=\"{before}\""));
        }
        if let Some(after) = f.space_after {
            spacing.push_str(&format!(" w:after=\"{after}\""));
        }
        if let Some(ls) = &f.line_spacing {
            spacing.push_str(&format!(" w:line=\"{}\"", escape_xml(&ls.line)));
            if let Some(rule) = &ls.rule {
                spacing.push_str(&format!(" w:lineRule=\"{}\"", escape_xml(rule)));
            }
        }
        if !spacing.is_empty() {
            ppr.push_str(&format!("<w:spacing{spacing}/>"));
        }
        let mut ind = String::new();
        if let Some(left) = f.indent_left {
            ind.push_str(&format!(" w:left=\"{left}\""));
        }
        if let Some(right) = f.indent_right {
            ind.push_str(&format!(" w:right=\"{right}\""));
        }
        if !ind.is_empty() {
            ppr.push_str(&format!("<w:ind{ind}/>"));
        }
        if let Some(alignment) = f.alignment {
            ppr.push_str(&format!("<w:jc w:val=\"{}\"/>", alignment.as_str()));
        }
        if !ppr.is_empty() {
            out.push_str("<w:pPr>");
            out.push_str(&ppr);
            out.push_str("</w:pPr>");
        }

        for run in &self.runs {
            run.render(out);
        }
        out.push_str("</w:p>");
    }

    /// Record a formatting element met while scanning the paragraph
    fn apply_property(
        &mut self,
        e: &BytesStart,
        in_ppr: bool,
        in_run_rpr: bool,
        current_run: &mut Option<Run>,
    ) {
        if in_run_rpr {
            if let Some(run) = current_run.as_mut() {
                run.apply_property(e);
            }
            return;
        }
        if !in_ppr {
            return;
        }
        let f = &mut self.format;
        match e.local_name().as_ref() {
            b"pStyle" => self.style_id = attr(e, b"val"),
            b"jc" => f.alignment = attr(e, b"val").as_deref().and_then(Alignment::from_val),
            b"ind" => {
                if let Some(left) = attr(e, b"left").or_else(|| attr(e, b"start")) {
                    f.indent_left = left.parse().ok();
                }
                if let Some(right) = attr(e, b"right").or_else(|| attr(e, b"end")) {
                    f.indent_right = right.parse().ok();
                }
            }
            b"spacing" => {
                if let Some(before) = attr(e, b"before") {
                    f.space_before = before.parse().ok();
                }
                if let Some(after) = attr(e, b"after") {
                    f.space_after = after.parse().ok();
                }
                if let Some(line) = attr(e, b"line") {
                    f.line_spacing = Some(LineSpacing {
                        line,
                        rule: attr(e, b"lineRule"),
                    });
                }
            }
            _ => {}
        }
    }
}

impl Run {
    /// Create a run holding `text` with no explicit formatting
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            ..Default::default()
        }
    }

    fn apply_property(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"b" => self.bold = Some(toggle(e)),
            b"i" => self.italic = Some(toggle(e)),
            b"u" => self.underline = Some(attr(e, b"val").unwrap_or_else(|| "single".to_string())),
            b"rFonts" => {
                if let Some(font) = attr(e, b"ascii").or_else(|| attr(e, b"hAnsi")) {
                    self.font = Some(font);
                }
            }
            b"sz" => self.size = attr(e, b"val").and_then(|v| v.parse().ok()),
            b"color" => {
                self.color = attr(e, b"val").filter(|v| !v.eq_ignore_ascii_case("auto"));
            }
            _ => {}
        }
    }

    fn render(&self, out: &mut String) {
        out.push_str("<w:r>");

        let mut rpr = String::new();
        if let Some(font) = &self.font {
            let font = escape_xml(font);
            rpr.push_str(&format!(
                "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:eastAsia=\"{font}\" w:cs=\"{font}\"/>"
            ));
        }
        match self.bold {
            Some(true) => rpr.push_str("<w:b/>"),
            Some(false) => rpr.push_str("<w:b w:val=\"0\"/>"),
            None => {}
        }
        match self.italic {
            Some(true) => rpr.push_str("<w:i/>"),
            Some(false) => rpr.push_str("<w:i w:val=\"0\"/>"),
            None => {}
        }
        if let Some(color) = &self.color {
            rpr.push_str(&format!("<w:color w:val=\"{}\"/>", escape_xml(color)));
        }
        if let Some(size) = self.size {
            rpr.push_str(&format!("<w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>"));
        }
        if let Some(underline) = &self.underline {
            rpr.push_str(&format!("<w:u w:val=\"{}\"/>", escape_xml(underline)));
        }
        if !rpr.is_empty() {
            out.push_str("<w:rPr>");
            out.push_str(&rpr);
            out.push_str("</w:rPr>");
        }

        let mut segment = String::new();
        for ch in self.text.chars() {
            match ch {
                '\t' | '\n' => {
                    flush_text(out, &mut segment);
                    out.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
                }
                _ => segment.push(ch),
            }
        }
        flush_text(out, &mut segment);
        out.push_str("</w:r>");
    }
}

impl Alignment {
    fn from_val(val: &str) -> Option<Self> {
        match val {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// The `w:jc` value for this alignment
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

fn push_text(run: &mut Option<Run>, text: &str) {
    if let Some(run) = run.as_mut() {
        run.text.push_str(text);
    }
}

fn flush_text(out: &mut String, segment: &mut String) {
    if !segment.is_empty() {
        out.push_str("<w:t xml:space=\"preserve\">");
        out.push_str(&escape_xml(segment));
        out.push_str("</w:t>");
        segment.clear();
    }
}

/// Byte layout of the body: where it opens and closes, and the span of
/// each direct child.
struct BodyLayout {
    body: BodyBounds,
    spans: Vec<ChildSpan>,
}

enum BodyBounds {
    Open { head_end: usize, tail_start: usize },
    SelfClosing { start: usize, end: usize, qname: String },
}

struct ChildSpan {
    name: String,
    start: usize,
    end: usize,
}

impl BodyLayout {
    fn scan(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        // Depth at which the body's children open, while inside the body
        let mut child_depth: Option<usize> = None;
        let mut head_end = None;
        let mut body = None;
        let mut spans = Vec::new();
        let mut open: Option<(String, usize)> = None;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event_into(&mut buf)?;
            let after = reader.buffer_position() as usize;
            match event {
                Event::Start(ref e) => {
                    let local = local_name(e);
                    if child_depth == Some(depth) {
                        open = Some((local, before));
                    } else if body.is_none() && child_depth.is_none() && local == "body" {
                        child_depth = Some(depth + 1);
                        head_end = Some(after);
                    }
                    depth += 1;
                }
                Event::Empty(ref e) => {
                    let local = local_name(e);
                    if child_depth == Some(depth) {
                        spans.push(ChildSpan {
                            name: local,
                            start: before,
                            end: after,
                        });
                    } else if body.is_none() && child_depth.is_none() && local == "body" {
                        body = Some(BodyBounds::SelfClosing {
                            start: before,
                            end: after,
                            qname: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        });
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if child_depth == Some(depth) {
                        if let Some((name, start)) = open.take() {
                            spans.push(ChildSpan {
                                name,
                                start,
                                end: after,
                            });
                        }
                    } else if child_depth == Some(depth + 1) {
                        if let Some(head_end) = head_end {
                            body = Some(BodyBounds::Open {
                                head_end,
                                tail_start: before,
                            });
                        }
                        child_depth = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let body = body.ok_or_else(|| {
            OoxmlError::InvalidStructure("document.xml has no <w:body>".to_string())
        })?;
        Ok(BodyLayout { body, spans })
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}
